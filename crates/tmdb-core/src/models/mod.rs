//! Data models for The Movie Database API.
//!
//! Field names follow the API's snake_case JSON schema so the wire format
//! and the Rust structs line up without renames.

mod movie;
mod status;

pub use movie::*;
pub use status::*;

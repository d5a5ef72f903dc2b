//! API implementation submodules.
//!
//! Each submodule contains `impl TmdbApi` blocks that extend the public API
//! with domain-specific methods. The struct definition remains in `lib.rs`.

mod builder;
mod movies;
mod network;

pub use builder::TmdbApiBuilder;

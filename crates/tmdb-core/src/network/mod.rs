//! Offline-aware request machinery.
//!
//! This module provides:
//! - Connectivity monitoring fed by a path-update source
//! - Logical endpoint requests and their canonical identities
//! - The HTTP transport boundary and its reqwest implementation
//! - The request pipeline tying connectivity, cache and transport together

mod connectivity;
mod endpoint;
mod pipeline;
mod transport;

pub use connectivity::{
    ConnectivityMonitor, ConnectivityState, PathMonitor, PathStatus, ProbePathMonitor,
};
pub use endpoint::{EndpointRequest, ResponseShape};
pub use pipeline::RequestPipeline;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

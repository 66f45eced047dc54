//! Transport layer for upstream API communication.
//!
//! This module provides the underlying transport implementations:
//!
//! - REST transport (via reqwest) - authenticated, with retries
//! - Mock transport - for testing without network
//!
//! Everything above this layer sees only [`HttpTransport`]; swapping the
//! REST transport for the mock is how the sync drivers are tested.

mod mock;
mod rest;
mod traits;

pub use mock::MockTransport;
pub use rest::{RestTransport, RestTransportBuilder};
pub use traits::{HttpMethod, HttpTransport, TransportStats, UpstreamRequest, UpstreamResponse};

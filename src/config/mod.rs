//! Configuration types for the connector.
//!
//! This module provides:
//! - [`ConnectorConfig`]: Credentials, endpoints, page size and timeout
//! - [`RetryConfig`]: Retry behavior of the REST transport

mod connector;
mod retry;

pub use connector::{ConnectorConfig, DEFAULT_AUTH_URL, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use retry::RetryConfig;

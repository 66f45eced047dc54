//! Error types for the connector.
//!
//! Every fallible operation returns [`Error`], categorized by [`ErrorKind`].
//!
//! ## Key Invariant
//!
//! Errors from a list or grants page are fatal to that page: no resources
//! and no cursor are returned alongside them, so the orchestrator never
//! believes a page was consumed when it was not.
//!
//! Rate-limit header parsing never produces an error; see
//! [`ratelimit`](crate::ratelimit).

mod core;
mod kind;

pub use self::core::Error;
pub use self::kind::ErrorKind;

/// A specialized `Result` type for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

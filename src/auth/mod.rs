//! Authentication for upstream requests.
//!
//! - [`TokenProvider`]: Trait for anything that can hand out a bearer token
//! - [`StaticToken`]: A pre-issued bearer token
//! - [`AccountCredentialsProvider`]: Account-credentials OAuth grant with caching
//! - [`Secret`]: Zeroizing, redacted string for client secrets
//!
//! ## Production: Account Credentials
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zoomsync::{ConnectorConfig, auth::AccountCredentialsProvider};
//!
//! let config = ConnectorConfig::from_env()?;
//! let provider = Arc::new(AccountCredentialsProvider::new(&config)?);
//! ```
//!
//! ## Development: Static Token
//!
//! ```rust
//! use zoomsync::auth::StaticToken;
//!
//! let provider = StaticToken::new("your-api-token");
//! ```

mod account;
mod credentials;
mod provider;

pub use account::AccountCredentialsProvider;
pub use credentials::{Secret, StaticToken};
pub use provider::{TokenFuture, TokenProvider};

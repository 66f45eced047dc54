//! # zoomsync
//!
//! Identity-governance connector for Zoom. Syncs users, groups, roles and
//! contact groups, their entitlements and grants, and provisions group
//! membership and user accounts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zoomsync::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connector = Connector::from_config(&ConnectorConfig::from_env()?)?;
//!     connector.validate().await?;
//!
//!     for syncer in connector.syncers() {
//!         let page = syncer.list(None, "").await?;
//!         println!("{}: {} resources", syncer.descriptor().display_name, page.items.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **One page per call**: every list and grants call fetches exactly one
//!   upstream page; continuation lives in the returned opaque cursor.
//! - **Empty cursor is terminal**: a page whose `next_cursor` is empty ends
//!   the listing.
//! - **Errors carry no cursor**: a failed page returns `Err`, never a
//!   partial page.
//! - **Validation before I/O**: unsupported principals, unknown
//!   entitlements and incomplete account profiles fail without any
//!   upstream request.
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod types;

// Sync plumbing
pub mod cursor;
pub mod mapping;
pub mod membership;
pub mod ratelimit;

// Transport layer
pub mod transport;

mod user_agent;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::{ConnectorConfig, RetryConfig};
pub use connector::Connector;
pub use error::{Error, ErrorKind, Result};

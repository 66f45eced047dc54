//! End-to-end sync tests.
//!
//! Drivers run against either the in-memory [`MockTransport`] or a real
//! `RestTransport` pointed at a local wiremock server, so the full path
//! from driver through client, transport, cursor and rate-limit parsing is
//! exercised without network access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test sync
//!
//! # With driver logs
//! RUST_LOG=zoomsync=debug cargo test --test sync -- --nocapture
//! ```
//!
//! [`MockTransport`]: zoomsync::transport::MockTransport

mod common;
mod grants_tests;
mod listing_tests;
mod provisioning_tests;

//! Prelude module for convenient imports.
//!
//! ```rust
//! use zoomsync::prelude::*;
//! ```
//!
//! This provides access to:
//! - The connector facade and driver traits
//! - Configuration
//! - Error types
//! - Sync data types

pub use crate::{
    config::{ConnectorConfig, RetryConfig},
    connector::{
        AccountManager, Catalog, Connector, GrantProvisioner, ResourceSyncer, SyncPage,
    },
    error::{Error, ErrorKind, Result},
    ratelimit::RateLimitDescriptor,
    types::{
        AccountProfile, Annotation, Annotations, CreateAccountResult, CredentialOption,
        Entitlement, EntitlementKind, Grant, Profile, Resource, ResourceId, ResourceType,
        UserStatus,
    },
};

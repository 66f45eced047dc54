//! Core types of the resource graph.
//!
//! - [`Resource`]: A synchronized user, group, role or contact group
//! - [`Entitlement`]: A grantable capability on a resource
//! - [`Grant`]: A principal holding an entitlement
//! - [`Annotations`]: Metadata returned with each result
//! - [`AccountProfile`]: Input for account provisioning

mod account;
mod annotation;
mod entitlement;
mod resource;

pub use account::{AccountProfile, CreateAccountResult, CredentialOption, ValidatedAccount};
pub use annotation::{Annotation, Annotations};
pub use entitlement::{Entitlement, EntitlementKind, Grant};
pub use resource::{
    GroupProfile, Profile, Resource, ResourceId, ResourceType, RoleProfile, UserProfile, UserStatus,
    UserTrait,
};

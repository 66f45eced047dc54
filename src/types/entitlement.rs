//! Entitlements and grants.

use serde::{Deserialize, Serialize};

use super::{ResourceId, ResourceType};

/// How an entitlement is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementKind {
    /// Membership-style assignment (group member/admin).
    Assignment,
    /// Permission-style entitlement (role member).
    Permission,
}

/// A grantable capability attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entitlement {
    /// Resource the entitlement is attached to.
    pub resource: ResourceId,
    /// Short name, e.g. `member` or `admin`.
    pub slug: String,
    /// Assignment or permission.
    pub kind: EntitlementKind,
    /// Human-readable name.
    pub display_name: String,
    /// Human-readable description.
    pub description: String,
    /// Principal types that may hold this entitlement.
    pub grantable_to: Vec<ResourceType>,
}

impl Entitlement {
    /// Returns the entitlement identifier, `type:id:slug`.
    ///
    /// ```rust
    /// use zoomsync::types::{Entitlement, EntitlementKind, ResourceId};
    ///
    /// let ent = Entitlement {
    ///     resource: ResourceId::group("g1"),
    ///     slug: "admin".into(),
    ///     kind: EntitlementKind::Assignment,
    ///     display_name: String::new(),
    ///     description: String::new(),
    ///     grantable_to: vec![],
    /// };
    /// assert_eq!(ent.id(), "group:g1:admin");
    /// ```
    pub fn id(&self) -> String {
        format!("{}:{}", self.resource, self.slug)
    }

    /// Returns `true` if a principal of `principal_type` may hold this.
    pub fn is_grantable_to(&self, principal_type: ResourceType) -> bool {
        self.grantable_to.contains(&principal_type)
    }
}

/// An edge asserting that `principal` holds `entitlement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    /// Entitlement held.
    pub entitlement: Entitlement,
    /// User or group holding it.
    pub principal: ResourceId,
}

impl Grant {
    /// Creates a grant.
    pub fn new(entitlement: Entitlement, principal: ResourceId) -> Self {
        Self {
            entitlement,
            principal,
        }
    }

    /// Returns the grant identifier, `entitlement-id:principal`.
    pub fn id(&self) -> String {
        format!("{}:{}", self.entitlement.id(), self.principal)
    }
}

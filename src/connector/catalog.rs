//! Static description of the resource types the connector exposes.

use serde::Serialize;

use crate::types::ResourceType;

/// Entitlement held by members of a group, contact group or role.
pub const MEMBER_ENTITLEMENT: &str = "member";

/// Entitlement held by group admins.
pub const ADMIN_ENTITLEMENT: &str = "admin";

/// Behavioural trait of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTrait {
    /// An identity that can sign in.
    User,
    /// A collection of principals.
    Group,
    /// A role carrying permissions.
    Role,
}

/// Descriptor of one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceTypeDescriptor {
    /// Resource type.
    pub resource_type: ResourceType,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Behavioural traits.
    pub traits: Vec<ResourceTrait>,
    /// Whether the platform should skip entitlement and grant listing.
    pub skip_entitlements_and_grants: bool,
}

/// Immutable resource-type and entitlement tables.
///
/// Built once at startup and shared by every driver through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    descriptors: [ResourceTypeDescriptor; 4],
    group_entitlements: Vec<&'static str>,
}

impl Catalog {
    /// Creates the catalog.
    pub fn new() -> Self {
        let descriptor = |resource_type, display_name, traits: ResourceTrait, skip| {
            ResourceTypeDescriptor {
                resource_type,
                display_name,
                traits: vec![traits],
                skip_entitlements_and_grants: skip,
            }
        };

        Self {
            descriptors: [
                descriptor(ResourceType::User, "User", ResourceTrait::User, true),
                descriptor(ResourceType::Group, "Group", ResourceTrait::Group, false),
                descriptor(ResourceType::Role, "Role", ResourceTrait::Role, false),
                descriptor(
                    ResourceType::ContactGroup,
                    "Contact Group",
                    ResourceTrait::Group,
                    false,
                ),
            ],
            group_entitlements: vec![MEMBER_ENTITLEMENT, ADMIN_ENTITLEMENT],
        }
    }

    /// Returns the descriptor of `resource_type`.
    pub fn descriptor(&self, resource_type: ResourceType) -> &ResourceTypeDescriptor {
        let slot = match resource_type {
            ResourceType::User => 0,
            ResourceType::Group => 1,
            ResourceType::Role => 2,
            ResourceType::ContactGroup => 3,
        };
        &self.descriptors[slot]
    }

    /// Returns every descriptor.
    pub fn descriptors(&self) -> &[ResourceTypeDescriptor] {
        &self.descriptors
    }

    /// Returns the entitlement slugs every group carries.
    pub fn group_entitlements(&self) -> &[&'static str] {
        &self.group_entitlements
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

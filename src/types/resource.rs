//! Synchronized resources and their type-specific profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The kinds of resource the connector synchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    /// An account user.
    User,
    /// A user group.
    Group,
    /// An administrative role.
    Role,
    /// An address-book contact group.
    ContactGroup,
}

impl ResourceType {
    /// All resource types, in sync order.
    pub const ALL: [ResourceType; 4] = [
        ResourceType::User,
        ResourceType::Group,
        ResourceType::Role,
        ResourceType::ContactGroup,
    ];

    /// Returns the stable identifier used on the wire and in cursors.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "user",
            ResourceType::Group => "group",
            ResourceType::Role => "role",
            ResourceType::ContactGroup => "contactGroup",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_response(format!("unknown resource type: {}", s)))
    }
}

/// Identifies a single resource: its type plus the upstream identifier.
///
/// Displays as `type:id`.
///
/// ```rust
/// use zoomsync::types::{ResourceId, ResourceType};
///
/// let id = ResourceId::new(ResourceType::ContactGroup, "cg1");
/// assert_eq!(id.to_string(), "contactGroup:cg1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource type.
    pub resource_type: ResourceType,
    /// Upstream identifier.
    pub resource: String,
}

impl ResourceId {
    /// Creates a resource identifier.
    pub fn new(resource_type: ResourceType, resource: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource: resource.into(),
        }
    }

    /// Shorthand for a user identifier.
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(ResourceType::User, id)
    }

    /// Shorthand for a group identifier.
    pub fn group(id: impl Into<String>) -> Self {
        Self::new(ResourceType::Group, id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// Normalized user status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Unknown or not yet activated.
    #[default]
    Unspecified,
    /// Active account.
    Enabled,
    /// Deactivated account.
    Disabled,
}

/// Profile fields of a user resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login, which is the email address.
    pub login: String,
    /// Upstream user id.
    pub user_id: String,
}

/// Profile fields of a group or contact-group resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    /// Group name.
    pub group_name: String,
    /// Upstream group id.
    pub group_id: String,
}

/// Profile fields of a role resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    /// Role name.
    pub role_name: String,
    /// Upstream role id.
    pub role_id: String,
}

/// Type-specific profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Profile {
    /// User profile.
    User(UserProfile),
    /// Group or contact-group profile.
    Group(GroupProfile),
    /// Role profile.
    Role(RoleProfile),
}

/// User-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrait {
    /// Primary email address.
    pub email: String,
    /// Normalized status.
    pub status: UserStatus,
}

/// A synchronized entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Type and upstream identifier.
    pub id: ResourceId,
    /// Human-readable name.
    pub display_name: String,
    /// Owning resource when listed in a scoped context.
    pub parent: Option<ResourceId>,
    /// Type-specific profile.
    pub profile: Profile,
    /// Present on user resources only.
    pub user: Option<UserTrait>,
}

impl Resource {
    /// Returns the resource type.
    pub fn resource_type(&self) -> ResourceType {
        self.id.resource_type
    }

    /// Returns the upstream identifier.
    pub fn upstream_id(&self) -> &str {
        &self.id.resource
    }
}

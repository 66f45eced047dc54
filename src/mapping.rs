//! Mapping of upstream records into [`Resource`]s.
//!
//! One pure function per resource type. Each takes the owning resource when
//! the record was listed in a scoped context (a group's members, say) and
//! records it as the resource's parent.

use crate::client::{ContactGroup, Group, Role, User};
use crate::types::{
    GroupProfile, Profile, Resource, ResourceId, ResourceType, RoleProfile, UserProfile,
    UserStatus, UserTrait,
};

/// Normalizes an upstream user status.
///
/// Unknown values map to [`UserStatus::Unspecified`].
pub fn user_status(status: &str) -> UserStatus {
    match status {
        "active" => UserStatus::Enabled,
        "inactive" => UserStatus::Disabled,
        "pending" => UserStatus::Unspecified,
        _ => UserStatus::Unspecified,
    }
}

/// Maps an upstream user.
pub fn user_resource(user: &User, parent: Option<&ResourceId>) -> Resource {
    Resource {
        id: ResourceId::new(ResourceType::User, &user.id),
        display_name: user.display_name.clone(),
        parent: parent.cloned(),
        profile: Profile::User(UserProfile {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            login: user.email.clone(),
            user_id: user.id.clone(),
        }),
        user: Some(UserTrait {
            email: user.email.clone(),
            status: user_status(&user.status),
        }),
    }
}

/// Maps an upstream group.
pub fn group_resource(group: &Group, parent: Option<&ResourceId>) -> Resource {
    named_group(ResourceType::Group, &group.id, &group.name, parent)
}

/// Maps an upstream contact group.
pub fn contact_group_resource(group: &ContactGroup, parent: Option<&ResourceId>) -> Resource {
    named_group(ResourceType::ContactGroup, &group.id, &group.name, parent)
}

/// Maps an upstream role.
pub fn role_resource(role: &Role, parent: Option<&ResourceId>) -> Resource {
    Resource {
        id: ResourceId::new(ResourceType::Role, &role.id),
        display_name: role.name.clone(),
        parent: parent.cloned(),
        profile: Profile::Role(RoleProfile {
            role_name: role.name.clone(),
            role_id: role.id.clone(),
        }),
        user: None,
    }
}

fn named_group(
    resource_type: ResourceType,
    id: &str,
    name: &str,
    parent: Option<&ResourceId>,
) -> Resource {
    Resource {
        id: ResourceId::new(resource_type, id),
        display_name: name.to_string(),
        parent: parent.cloned(),
        profile: Profile::Group(GroupProfile {
            group_name: name.to_string(),
            group_id: id.to_string(),
        }),
        user: None,
    }
}

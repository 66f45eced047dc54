//! Upstream wire models.
//!
//! Every field defaults when absent so that sparse records (for example a
//! role member without a status) still decode.

use serde::{Deserialize, Serialize};

/// An account user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// User id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Name of the user's account role.
    pub role_name: String,
    /// License type.
    #[serde(rename = "type")]
    pub user_type: i64,
    /// Display name.
    pub display_name: String,
    /// Id of the user's account role.
    pub role_id: String,
    /// Raw status string (`active`, `inactive`, `pending`).
    pub status: String,
}

/// A user group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Group id.
    pub id: String,
    /// Group name.
    pub name: String,
}

/// An address-book contact group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactGroup {
    /// Group id.
    #[serde(rename = "group_id")]
    pub id: String,
    /// Group name.
    #[serde(rename = "group_name")]
    pub name: String,
    /// Privacy level.
    #[serde(rename = "group_privacy")]
    pub privacy: i64,
    /// Free-text description.
    pub description: String,
}

/// An administrative role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    /// Role id.
    pub id: String,
    /// Role name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Role type.
    #[serde(rename = "type")]
    pub role_type: String,
}

/// A member of a contact group; either a user or a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactGroupMember {
    /// Member id.
    pub id: String,
    /// Member name.
    pub name: String,
    /// Principal discriminant: `1` user, `2` group.
    #[serde(rename = "type")]
    pub member_type: i64,
}

/// Pagination echo returned by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Token for the next page; empty when exhausted.
    pub next_page_token: String,
    /// Page size used.
    pub page_size: i64,
    /// Total number of records.
    pub total_records: i64,
}

/// How a new user is provisioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateAction {
    /// Confirmation email with an activation link.
    #[default]
    #[serde(rename = "create")]
    Create,
    /// Email login on a managed domain.
    #[serde(rename = "autoCreate")]
    AutoCreate,
    /// Passwordless user without portal access.
    #[serde(rename = "custCreate")]
    CustCreate,
    /// Pre-provisioned SSO user.
    #[serde(rename = "ssoCreate")]
    SsoCreate,
}

/// License type of a newly created user.
pub const BASIC_USER_TYPE: i64 = 1;

/// User details sent when creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInfo {
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Display name.
    pub display_name: String,
    /// License type.
    #[serde(rename = "type")]
    pub user_type: i64,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Provisioning mode.
    pub action: CreateAction,
    /// User details.
    pub user_info: CreateUserInfo,
}

/// Reply to `POST /users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedUser {
    /// New user id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// License type.
    #[serde(rename = "type")]
    pub user_type: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UsersPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub users: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GroupsPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub groups: Vec<Group>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ContactGroupsPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub groups: Vec<ContactGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RolesPage {
    pub roles: Vec<Role>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MembersPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub members: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminsPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub admins: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ContactGroupMembersPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub group_members: Vec<ContactGroupMember>,
}

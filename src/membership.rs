//! Resolution of mixed-type membership records.
//!
//! A contact group's members may be users or groups. The upstream record
//! carries an integer discriminant; it is resolved once into [`MemberKind`]
//! and never carried further as a raw number.

use tracing::warn;

use crate::client::ContactGroupMember;
use crate::types::{Entitlement, Grant, ResourceId, ResourceType};

/// Upstream discriminant for a user member.
const USER_MEMBER: i64 = 1;

/// Upstream discriminant for a group member.
const GROUP_MEMBER: i64 = 2;

/// The principal kind of a membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// The member is a user.
    User,
    /// The member is a group.
    Group,
}

impl MemberKind {
    /// Resolves an upstream discriminant; `None` for unknown values.
    pub fn from_discriminant(value: i64) -> Option<Self> {
        match value {
            USER_MEMBER => Some(MemberKind::User),
            GROUP_MEMBER => Some(MemberKind::Group),
            _ => None,
        }
    }

    /// Returns the resource type of a principal of this kind.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            MemberKind::User => ResourceType::User,
            MemberKind::Group => ResourceType::Group,
        }
    }
}

/// A membership record whose principal kind has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    /// Principal kind.
    pub kind: MemberKind,
    /// Principal identifier.
    pub principal: ResourceId,
    /// Principal name as reported upstream.
    pub name: String,
}

/// Resolves a contact-group member. Returns `None` if the discriminant is
/// neither user nor group.
pub fn resolve(member: &ContactGroupMember) -> Option<ResolvedMember> {
    let kind = MemberKind::from_discriminant(member.member_type)?;
    Some(ResolvedMember {
        kind,
        principal: ResourceId::new(kind.resource_type(), &member.id),
        name: member.name.clone(),
    })
}

/// Builds one grant of `entitlement` per resolvable member, in input order.
/// Members with an unknown discriminant are skipped with a warning.
pub fn grants_for(entitlement: &Entitlement, members: &[ContactGroupMember]) -> Vec<Grant> {
    members
        .iter()
        .filter_map(|member| {
            let resolved = resolve(member);
            if resolved.is_none() {
                warn!(
                    member_id = %member.id,
                    member_type = member.member_type,
                    group = %entitlement.resource,
                    "skipping member with unknown type"
                );
            }
            resolved
        })
        .map(|resolved| Grant::new(entitlement.clone(), resolved.principal))
        .collect()
}

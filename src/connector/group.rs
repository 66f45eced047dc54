//! Group driver.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::catalog::{ADMIN_ENTITLEMENT, Catalog, MEMBER_ENTITLEMENT, ResourceTypeDescriptor};
use super::{GrantProvisioner, ResourceSyncer, SyncPage};
use crate::client::ZoomClient;
use crate::mapping::{group_resource, user_resource};
use crate::types::{
    Annotation, Annotations, Entitlement, EntitlementKind, Grant, Resource, ResourceId,
    ResourceType,
};
use crate::{Error, cursor};

/// Which group list a grant targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupRole {
    Member,
    Admin,
}

/// Syncs groups, their member/admin grants, and provisions both.
#[derive(Debug, Clone)]
pub struct GroupSyncer {
    client: ZoomClient,
    catalog: Arc<Catalog>,
}

impl GroupSyncer {
    /// Creates the driver.
    pub fn new(client: ZoomClient, catalog: Arc<Catalog>) -> Self {
        Self { client, catalog }
    }

    fn entitlement(&self, resource: &Resource, slug: &str) -> Entitlement {
        Entitlement {
            resource: resource.id.clone(),
            slug: slug.to_string(),
            kind: EntitlementKind::Assignment,
            display_name: format!("{} group {}", resource.display_name, slug),
            description: format!("Zoom {} group", resource.display_name),
            grantable_to: vec![ResourceType::User],
        }
    }

    /// Validates a grant/revoke request before anything is sent upstream.
    fn check_request(
        &self,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> Result<GroupRole, Error> {
        if principal.resource_type != ResourceType::User {
            warn!(principal = %principal, "only users can be added to a group");
            return Err(Error::principal_type(format!(
                "only users can be granted group entitlements, got {}",
                principal.resource_type
            )));
        }
        if entitlement.resource.resource_type != ResourceType::Group {
            return Err(Error::invalid_entitlement(format!(
                "entitlement {} is not on a group",
                entitlement.id()
            )));
        }
        match entitlement.slug.as_str() {
            MEMBER_ENTITLEMENT => Ok(GroupRole::Member),
            ADMIN_ENTITLEMENT => Ok(GroupRole::Admin),
            other => Err(Error::invalid_entitlement(format!(
                "unknown group entitlement: {}",
                other
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ResourceSyncer for GroupSyncer {
    fn descriptor(&self) -> &ResourceTypeDescriptor {
        self.catalog.descriptor(ResourceType::Group)
    }

    #[instrument(skip(self, parent))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        cursor: &str,
    ) -> Result<SyncPage<Resource>, Error> {
        let (state, page_token) = cursor::decode(cursor, ResourceType::Group)?;
        let page = self.client.get_groups(&page_token).await?;

        let items = page.items.iter().map(|g| group_resource(g, parent)).collect();
        Ok(SyncPage {
            items,
            next_cursor: cursor::encode(state, &page.next_page_token)?,
            annotations: Annotations::with_rate_limit(page.rate_limit),
        })
    }

    fn entitlements(&self, resource: &Resource) -> Vec<Entitlement> {
        self.catalog
            .group_entitlements()
            .iter()
            .map(|slug| self.entitlement(resource, slug))
            .collect()
    }

    /// Drains every member page and then every admin page; the result is
    /// always the last page.
    #[instrument(skip(self, resource, cursor), fields(group = %resource.id))]
    async fn grants(&self, resource: &Resource, cursor: &str) -> Result<SyncPage<Grant>, Error> {
        cursor::decode(cursor, ResourceType::Group)?;
        let group_id = resource.upstream_id();
        let (members, members_rate_limit) = self.client.get_group_members(group_id).await?;
        let (admins, admins_rate_limit) = self.client.get_group_admins(group_id).await?;
        debug!(members = members.len(), admins = admins.len(), "fetched group membership");

        let member = self.entitlement(resource, MEMBER_ENTITLEMENT);
        let admin = self.entitlement(resource, ADMIN_ENTITLEMENT);

        let mut grants = Vec::with_capacity(members.len() + admins.len());
        for user in &members {
            let principal = user_resource(user, Some(&resource.id));
            grants.push(Grant::new(member.clone(), principal.id));
        }
        for user in &admins {
            let principal = user_resource(user, Some(&resource.id));
            grants.push(Grant::new(admin.clone(), principal.id));
        }

        let mut annotations = Annotations::with_rate_limit(members_rate_limit);
        annotations.push(Annotation::RateLimit(admins_rate_limit));

        Ok(SyncPage {
            items: grants,
            next_cursor: String::new(),
            annotations,
        })
    }

    fn provisioner(&self) -> Option<&dyn GrantProvisioner> {
        Some(self)
    }
}

#[async_trait::async_trait]
impl GrantProvisioner for GroupSyncer {
    #[instrument(skip(self, entitlement), fields(entitlement = %entitlement.id()))]
    async fn grant(
        &self,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> Result<Annotations, Error> {
        let role = self.check_request(principal, entitlement)?;
        let group_id = &entitlement.resource.resource;
        let rate_limit = match role {
            GroupRole::Member => {
                self.client
                    .add_group_member(group_id, &principal.resource)
                    .await?
            }
            GroupRole::Admin => {
                self.client
                    .add_group_admin(group_id, &principal.resource)
                    .await?
            }
        };
        Ok(Annotations::with_rate_limit(rate_limit))
    }

    #[instrument(skip(self, grant), fields(grant = %grant.id()))]
    async fn revoke(&self, grant: &Grant) -> Result<Annotations, Error> {
        let role = self.check_request(&grant.principal, &grant.entitlement)?;
        let group_id = &grant.entitlement.resource.resource;
        let user_id = &grant.principal.resource;
        let rate_limit = match role {
            GroupRole::Member => self.client.remove_group_member(group_id, user_id).await?,
            GroupRole::Admin => self.client.remove_group_admin(group_id, user_id).await?,
        };
        Ok(Annotations::with_rate_limit(rate_limit))
    }
}

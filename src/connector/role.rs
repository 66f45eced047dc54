//! Role driver.

use std::sync::Arc;

use tracing::instrument;

use super::catalog::{Catalog, MEMBER_ENTITLEMENT, ResourceTypeDescriptor};
use super::{ResourceSyncer, SyncPage};
use crate::client::ZoomClient;
use crate::mapping::{role_resource, user_resource};
use crate::types::{
    Annotations, Entitlement, EntitlementKind, Grant, Resource, ResourceId, ResourceType,
};
use crate::{Error, cursor};

/// Syncs roles and their members.
#[derive(Debug, Clone)]
pub struct RoleSyncer {
    client: ZoomClient,
    catalog: Arc<Catalog>,
}

impl RoleSyncer {
    /// Creates the driver.
    pub fn new(client: ZoomClient, catalog: Arc<Catalog>) -> Self {
        Self { client, catalog }
    }

    fn member_entitlement(resource: &Resource) -> Entitlement {
        Entitlement {
            resource: resource.id.clone(),
            slug: MEMBER_ENTITLEMENT.to_string(),
            kind: EntitlementKind::Permission,
            display_name: format!("{} role {}", resource.display_name, MEMBER_ENTITLEMENT),
            description: format!("Role {} in zoom", resource.display_name),
            grantable_to: vec![ResourceType::User],
        }
    }
}

#[async_trait::async_trait]
impl ResourceSyncer for RoleSyncer {
    fn descriptor(&self) -> &ResourceTypeDescriptor {
        self.catalog.descriptor(ResourceType::Role)
    }

    /// Roles are not paginated upstream; the cursor is ignored and the
    /// returned cursor is always empty.
    #[instrument(skip(self, parent, _cursor))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        _cursor: &str,
    ) -> Result<SyncPage<Resource>, Error> {
        let (roles, rate_limit) = self.client.get_roles().await?;
        Ok(SyncPage {
            items: roles.iter().map(|r| role_resource(r, parent)).collect(),
            next_cursor: String::new(),
            annotations: Annotations::with_rate_limit(rate_limit),
        })
    }

    fn entitlements(&self, resource: &Resource) -> Vec<Entitlement> {
        vec![Self::member_entitlement(resource)]
    }

    /// Role members are always users.
    #[instrument(skip(self, resource), fields(role = %resource.id))]
    async fn grants(&self, resource: &Resource, cursor: &str) -> Result<SyncPage<Grant>, Error> {
        let (state, page_token) = cursor::decode(cursor, ResourceType::Role)?;
        let page = self
            .client
            .get_role_members(resource.upstream_id(), &page_token)
            .await?;

        let entitlement = Self::member_entitlement(resource);
        let items = page
            .items
            .iter()
            .map(|user| {
                let principal = user_resource(user, Some(&resource.id));
                Grant::new(entitlement.clone(), principal.id)
            })
            .collect();

        Ok(SyncPage {
            items,
            next_cursor: cursor::encode(state, &page.next_page_token)?,
            annotations: Annotations::with_rate_limit(page.rate_limit),
        })
    }
}

//! Contact-group driver.

use std::sync::Arc;

use tracing::instrument;

use super::catalog::{Catalog, MEMBER_ENTITLEMENT, ResourceTypeDescriptor};
use super::{ResourceSyncer, SyncPage};
use crate::client::ZoomClient;
use crate::mapping::contact_group_resource;
use crate::membership;
use crate::types::{
    Annotations, Entitlement, EntitlementKind, Grant, Resource, ResourceId, ResourceType,
};
use crate::{Error, cursor};

/// Syncs contact groups, whose members may be users or groups.
#[derive(Debug, Clone)]
pub struct ContactGroupSyncer {
    client: ZoomClient,
    catalog: Arc<Catalog>,
}

impl ContactGroupSyncer {
    /// Creates the driver.
    pub fn new(client: ZoomClient, catalog: Arc<Catalog>) -> Self {
        Self { client, catalog }
    }

    fn member_entitlement(resource: &Resource) -> Entitlement {
        Entitlement {
            resource: resource.id.clone(),
            slug: MEMBER_ENTITLEMENT.to_string(),
            kind: EntitlementKind::Assignment,
            display_name: format!("{} group {}", resource.display_name, MEMBER_ENTITLEMENT),
            description: format!("Zoom {} group", resource.display_name),
            grantable_to: vec![ResourceType::User, ResourceType::Group],
        }
    }
}

#[async_trait::async_trait]
impl ResourceSyncer for ContactGroupSyncer {
    fn descriptor(&self) -> &ResourceTypeDescriptor {
        self.catalog.descriptor(ResourceType::ContactGroup)
    }

    #[instrument(skip(self, parent))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        cursor: &str,
    ) -> Result<SyncPage<Resource>, Error> {
        let (state, page_token) = cursor::decode(cursor, ResourceType::ContactGroup)?;
        let page = self.client.get_contact_groups(&page_token).await?;

        let items = page
            .items
            .iter()
            .map(|g| contact_group_resource(g, parent))
            .collect();
        Ok(SyncPage {
            items,
            next_cursor: cursor::encode(state, &page.next_page_token)?,
            annotations: Annotations::with_rate_limit(page.rate_limit),
        })
    }

    fn entitlements(&self, resource: &Resource) -> Vec<Entitlement> {
        vec![Self::member_entitlement(resource)]
    }

    #[instrument(skip(self, resource), fields(contact_group = %resource.id))]
    async fn grants(&self, resource: &Resource, cursor: &str) -> Result<SyncPage<Grant>, Error> {
        let (state, page_token) = cursor::decode(cursor, ResourceType::ContactGroup)?;
        let page = self
            .client
            .get_contact_group_members(resource.upstream_id(), &page_token)
            .await?;

        let entitlement = Self::member_entitlement(resource);
        Ok(SyncPage {
            items: membership::grants_for(&entitlement, &page.items),
            next_cursor: cursor::encode(state, &page.next_page_token)?,
            annotations: Annotations::with_rate_limit(page.rate_limit),
        })
    }
}

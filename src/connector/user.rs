//! User driver: listing plus account provisioning.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::catalog::{Catalog, ResourceTypeDescriptor};
use super::{AccountManager, ResourceSyncer, SyncPage};
use crate::client::{
    BASIC_USER_TYPE, CreateAction, CreateUserInfo, CreateUserRequest, User, ZoomClient,
};
use crate::mapping::user_resource;
use crate::types::{
    AccountProfile, Annotations, CreateAccountResult, CredentialOption, Entitlement, Grant,
    Resource, ResourceId, ResourceType,
};
use crate::{Error, ErrorKind, cursor};

/// Syncs users and manages their accounts.
#[derive(Debug, Clone)]
pub struct UserSyncer {
    client: ZoomClient,
    catalog: Arc<Catalog>,
}

impl UserSyncer {
    /// Creates the driver.
    pub fn new(client: ZoomClient, catalog: Arc<Catalog>) -> Self {
        Self { client, catalog }
    }
}

#[async_trait::async_trait]
impl ResourceSyncer for UserSyncer {
    fn descriptor(&self) -> &ResourceTypeDescriptor {
        self.catalog.descriptor(ResourceType::User)
    }

    #[instrument(skip(self, parent))]
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        cursor: &str,
    ) -> Result<SyncPage<Resource>, Error> {
        let (state, page_token) = cursor::decode(cursor, ResourceType::User)?;
        let page = self.client.get_users(&page_token).await?;

        let items = page.items.iter().map(|u| user_resource(u, parent)).collect();
        Ok(SyncPage {
            items,
            next_cursor: cursor::encode(state, &page.next_page_token)?,
            annotations: Annotations::with_rate_limit(page.rate_limit),
        })
    }

    fn entitlements(&self, _resource: &Resource) -> Vec<Entitlement> {
        Vec::new()
    }

    async fn grants(&self, _resource: &Resource, _cursor: &str) -> Result<SyncPage<Grant>, Error> {
        Ok(SyncPage::last(Vec::new()))
    }

    fn account_manager(&self) -> Option<&dyn AccountManager> {
        Some(self)
    }
}

#[async_trait::async_trait]
impl AccountManager for UserSyncer {
    fn credential_options(&self) -> Vec<CredentialOption> {
        vec![CredentialOption::NoPassword]
    }

    #[instrument(skip(self, profile))]
    async fn create_account(&self, profile: &AccountProfile) -> Result<CreateAccountResult, Error> {
        let account = profile.validate()?;
        let request = CreateUserRequest {
            action: CreateAction::Create,
            user_info: CreateUserInfo {
                email: account.email,
                first_name: account.first_name,
                last_name: account.last_name,
                display_name: account.display_name,
                user_type: BASIC_USER_TYPE,
            },
        };

        let (created, rate_limit) = self.client.create_user(&request).await?;
        debug!(user_id = %created.id, "created user");

        let user = User {
            id: created.id,
            email: created.email,
            first_name: created.first_name,
            last_name: created.last_name,
            user_type: created.user_type,
            ..User::default()
        };
        Ok(CreateAccountResult {
            resource: user_resource(&user, None),
            annotations: Annotations::with_rate_limit(rate_limit),
        })
    }

    /// Deletes the user, then fetches it again; only a not-found reply
    /// confirms the deletion.
    #[instrument(skip(self), fields(principal = %principal))]
    async fn delete(&self, principal: &ResourceId) -> Result<Annotations, Error> {
        if principal.resource_type != ResourceType::User {
            return Err(Error::principal_type(format!(
                "only users can be deleted, got {}",
                principal.resource_type
            )));
        }

        let user_id = &principal.resource;
        let rate_limit = self.client.delete_user(user_id).await?;

        match self.client.get_user(user_id).await {
            Ok(_) => {
                warn!(user_id = %user_id, "user still present after delete");
                Err(Error::deletion_not_confirmed(format!(
                    "user {} still exists",
                    user_id
                )))
            }
            Err(err) if err.is_not_found() => Ok(Annotations::with_rate_limit(rate_limit)),
            Err(err) if err.kind() == ErrorKind::UpstreamStatus => {
                Err(Error::deletion_not_confirmed(format!(
                    "could not confirm deletion of user {}",
                    user_id
                ))
                .with_source(err))
            }
            Err(err) => Err(err),
        }
    }
}

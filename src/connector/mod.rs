//! Sync drivers and the connector facade.
//!
//! The governance platform drives synchronization per resource type through
//! [`ResourceSyncer`]: list resources, list entitlements of a resource, list
//! grants of a resource. Groups additionally accept grant/revoke through
//! [`GrantProvisioner`]; users accept account creation and deletion through
//! [`AccountManager`].
//!
//! Every paginated call handles exactly one upstream page. Continuation is
//! carried entirely by the returned cursor; an empty cursor means the
//! listing is exhausted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use zoomsync::prelude::*;
//!
//! let connector = Connector::from_config(&ConnectorConfig::from_env()?)?;
//! connector.validate().await?;
//!
//! for syncer in connector.syncers() {
//!     let mut cursor = String::new();
//!     loop {
//!         let page = syncer.list(None, &cursor).await?;
//!         // persist page.items ...
//!         if page.next_cursor.is_empty() {
//!             break;
//!         }
//!         cursor = page.next_cursor;
//!     }
//! }
//! ```

mod catalog;
mod contact_group;
mod group;
mod role;
mod user;

pub use catalog::{
    ADMIN_ENTITLEMENT, Catalog, MEMBER_ENTITLEMENT, ResourceTrait, ResourceTypeDescriptor,
};
pub use contact_group::ContactGroupSyncer;
pub use group::GroupSyncer;
pub use role::RoleSyncer;
pub use user::UserSyncer;

use std::sync::Arc;

use tracing::instrument;

use crate::auth::AccountCredentialsProvider;
use crate::client::ZoomClient;
use crate::config::ConnectorConfig;
use crate::transport::RestTransport;
use crate::types::{
    AccountProfile, Annotations, CreateAccountResult, CredentialOption, Entitlement, Grant,
    Resource, ResourceId,
};
use crate::Error;

// ============================================================================
// Driver contract
// ============================================================================

/// One page of sync results.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPage<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Opaque cursor for the next call; empty when exhausted.
    pub next_cursor: String,
    /// Rate-limit and other metadata.
    pub annotations: Annotations,
}

impl<T> SyncPage<T> {
    /// Creates an exhausted page with no annotations.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: String::new(),
            annotations: Annotations::new(),
        }
    }

    /// Returns `true` if no further pages remain.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty()
    }
}

/// Sync driver for one resource type.
///
/// Drivers hold no mutable state between calls. Callers must not invoke
/// the same driver with the same cursor concurrently.
#[async_trait::async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// Returns the descriptor of the resource type this driver handles.
    fn descriptor(&self) -> &ResourceTypeDescriptor;

    /// Lists one page of resources.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCursor` for an unparseable cursor, or the error of
    /// the upstream call. A failed page never yields a cursor.
    async fn list(
        &self,
        parent: Option<&ResourceId>,
        cursor: &str,
    ) -> Result<SyncPage<Resource>, Error>;

    /// Lists the entitlements of `resource`. Derived, no upstream call.
    fn entitlements(&self, resource: &Resource) -> Vec<Entitlement>;

    /// Lists one page of grants on `resource`.
    ///
    /// # Errors
    ///
    /// As for [`list`](Self::list).
    async fn grants(&self, resource: &Resource, cursor: &str) -> Result<SyncPage<Grant>, Error>;

    /// Returns the grant/revoke capability, if the type supports it.
    fn provisioner(&self) -> Option<&dyn GrantProvisioner> {
        None
    }

    /// Returns the account capability, if the type supports it.
    fn account_manager(&self) -> Option<&dyn AccountManager> {
        None
    }
}

/// Grants and revokes entitlements on a resource type.
#[async_trait::async_trait]
pub trait GrantProvisioner: Send + Sync {
    /// Grants `entitlement` to `principal`.
    ///
    /// # Errors
    ///
    /// Returns `PrincipalType` or `InvalidEntitlement` without calling
    /// upstream when the request is not supported.
    async fn grant(
        &self,
        principal: &ResourceId,
        entitlement: &Entitlement,
    ) -> Result<Annotations, Error>;

    /// Revokes `grant`.
    ///
    /// # Errors
    ///
    /// As for [`grant`](Self::grant).
    async fn revoke(&self, grant: &Grant) -> Result<Annotations, Error>;
}

/// Provisions and deletes accounts.
#[async_trait::async_trait]
pub trait AccountManager: Send + Sync {
    /// Credential handling supported for new accounts.
    fn credential_options(&self) -> Vec<CredentialOption>;

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns `MissingProfileField` without calling upstream if a required
    /// profile field is absent.
    async fn create_account(&self, profile: &AccountProfile) -> Result<CreateAccountResult, Error>;

    /// Deletes an account and confirms it is gone.
    ///
    /// # Errors
    ///
    /// Returns `DeletionNotConfirmed` if the account can still be fetched
    /// after the delete call.
    async fn delete(&self, principal: &ResourceId) -> Result<Annotations, Error>;
}

// ============================================================================
// Connector facade
// ============================================================================

/// Connector display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorMetadata {
    /// Display name.
    pub display_name: &'static str,
    /// Description.
    pub description: &'static str,
}

/// Role name of accounts without admin scopes.
const MEMBER_ROLE_NAME: &str = "member";

/// Entry point: owns the upstream client and the catalog, hands out drivers.
#[derive(Debug, Clone)]
pub struct Connector {
    client: ZoomClient,
    catalog: Arc<Catalog>,
}

impl Connector {
    /// Creates a connector over an existing client.
    pub fn new(client: ZoomClient, catalog: Arc<Catalog>) -> Self {
        Self { client, catalog }
    }

    /// Creates a connector talking to the upstream API with
    /// account-credentials authentication.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self, Error> {
        config.validate()?;
        let provider = Arc::new(AccountCredentialsProvider::new(config)?);
        let transport = RestTransport::from_config(config, provider)?;
        let client = ZoomClient::new(Arc::new(transport), config.page_size);
        Ok(Self::new(client, Arc::new(Catalog::new())))
    }

    /// Returns display metadata.
    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Zoom",
            description: "Connector syncing users, groups, roles and contact groups from Zoom.",
        }
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Checks that the credentials belong to an admin account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the calling account's role is `member`,
    /// or the error of the upstream call.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> Result<Annotations, Error> {
        let (me, rate_limit) = self.client.get_user("me").await?;
        if me.role_name == MEMBER_ROLE_NAME {
            return Err(Error::unauthorized("user is not an admin"));
        }
        Ok(Annotations::with_rate_limit(rate_limit))
    }

    /// Returns one driver per resource type.
    pub fn syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::new(UserSyncer::new(self.client.clone(), Arc::clone(&self.catalog))),
            Arc::new(GroupSyncer::new(self.client.clone(), Arc::clone(&self.catalog))),
            Arc::new(RoleSyncer::new(self.client.clone(), Arc::clone(&self.catalog))),
            Arc::new(ContactGroupSyncer::new(self.client.clone(), Arc::clone(&self.catalog))),
        ]
    }
}

//! Typed client for the upstream REST API.
//!
//! [`ZoomClient`] shapes requests, sends them through an
//! [`HttpTransport`] and decodes the replies. Every call also returns the
//! [`RateLimitDescriptor`] read from its (last) response.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zoomsync::client::ZoomClient;
//!
//! let client = ZoomClient::new(transport, 50);
//! let page = client.get_users("").await?;
//! for user in &page.items {
//!     println!("{} <{}>", user.display_name, user.email);
//! }
//! ```

mod models;

pub use models::{
    BASIC_USER_TYPE, ContactGroup, ContactGroupMember, CreateAction, CreateUserInfo,
    CreateUserRequest, CreatedUser, Group, Pagination, Role, User,
};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use self::models::{
    AdminsPage, ContactGroupMembersPage, ContactGroupsPage, GroupsPage, MembersPage,
    RolesPage, UsersPage,
};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::ratelimit::{self, RateLimitDescriptor};
use crate::transport::{HttpTransport, UpstreamRequest};
use crate::Error;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Token for the next page; empty when exhausted.
    pub next_page_token: String,
    /// Quota state of the response.
    pub rate_limit: RateLimitDescriptor,
}

impl<T> Page<T> {
    /// Returns `true` if there are more pages available.
    pub fn has_next(&self) -> bool {
        !self.next_page_token.is_empty()
    }
}

/// Client for the upstream REST API.
///
/// `ZoomClient` is `Clone` and cheap to share; it holds only the transport
/// handle and the page size.
#[derive(Clone)]
pub struct ZoomClient {
    transport: Arc<dyn HttpTransport>,
    page_size: u32,
}

impl std::fmt::Debug for ZoomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomClient")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl ZoomClient {
    /// Creates a client over `transport` requesting `page_size` records
    /// per page. A page size of zero falls back to the default.
    pub fn new(transport: Arc<dyn HttpTransport>, page_size: u32) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            transport,
            page_size,
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// Fetches one page of users.
    #[instrument(skip(self))]
    pub async fn get_users(&self, page_token: &str) -> Result<Page<User>, Error> {
        let (page, rate_limit) = self
            .fetch::<UsersPage>(self.paged("/users".to_string(), page_token))
            .await?;
        Ok(into_page(page.users, page.pagination, rate_limit))
    }

    /// Fetches one page of groups.
    #[instrument(skip(self))]
    pub async fn get_groups(&self, page_token: &str) -> Result<Page<Group>, Error> {
        let (page, rate_limit) = self
            .fetch::<GroupsPage>(self.paged("/groups".to_string(), page_token))
            .await?;
        Ok(into_page(page.groups, page.pagination, rate_limit))
    }

    /// Fetches one page of contact groups.
    #[instrument(skip(self))]
    pub async fn get_contact_groups(&self, page_token: &str) -> Result<Page<ContactGroup>, Error> {
        let (page, rate_limit) = self
            .fetch::<ContactGroupsPage>(self.paged("/contacts/groups".to_string(), page_token))
            .await?;
        Ok(into_page(page.groups, page.pagination, rate_limit))
    }

    /// Fetches every role. The endpoint is not paginated.
    #[instrument(skip(self))]
    pub async fn get_roles(&self) -> Result<(Vec<Role>, RateLimitDescriptor), Error> {
        let (page, rate_limit) = self.fetch::<RolesPage>(UpstreamRequest::get("/roles")).await?;
        Ok((page.roles, rate_limit))
    }

    /// Fetches every member of a group, following pages sequentially.
    #[instrument(skip(self))]
    pub async fn get_group_members(
        &self,
        group_id: &str,
    ) -> Result<(Vec<User>, RateLimitDescriptor), Error> {
        let path = format!("/groups/{}/members", segment(group_id));
        self.drain(path, |page: MembersPage| (page.pagination, page.members))
            .await
    }

    /// Fetches every admin of a group, following pages sequentially.
    #[instrument(skip(self))]
    pub async fn get_group_admins(
        &self,
        group_id: &str,
    ) -> Result<(Vec<User>, RateLimitDescriptor), Error> {
        let path = format!("/groups/{}/admins", segment(group_id));
        self.drain(path, |page: AdminsPage| (page.pagination, page.admins))
            .await
    }

    /// Fetches one page of a contact group's members.
    #[instrument(skip(self))]
    pub async fn get_contact_group_members(
        &self,
        group_id: &str,
        page_token: &str,
    ) -> Result<Page<ContactGroupMember>, Error> {
        let path = format!("/contacts/groups/{}/members", segment(group_id));
        let (page, rate_limit) = self
            .fetch::<ContactGroupMembersPage>(self.paged(path, page_token))
            .await?;
        Ok(into_page(page.group_members, page.pagination, rate_limit))
    }

    /// Fetches one page of a role's members.
    #[instrument(skip(self))]
    pub async fn get_role_members(
        &self,
        role_id: &str,
        page_token: &str,
    ) -> Result<Page<User>, Error> {
        let path = format!("/roles/{}/members", segment(role_id));
        let (page, rate_limit) = self.fetch::<MembersPage>(self.paged(path, page_token)).await?;
        Ok(into_page(page.members, page.pagination, rate_limit))
    }

    /// Fetches a single user. `me` resolves to the calling account.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<(User, RateLimitDescriptor), Error> {
        let path = format!("/users/{}", segment(user_id));
        self.fetch(UpstreamRequest::get(path)).await
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Adds a user to a group.
    #[instrument(skip(self))]
    pub async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<RateLimitDescriptor, Error> {
        let path = format!("/groups/{}/members", segment(group_id));
        let body = serde_json::json!({ "members": [{ "id": user_id }] });
        let (_, rate_limit) = self
            .fetch::<serde_json::Value>(UpstreamRequest::post(path, &body)?)
            .await?;
        Ok(rate_limit)
    }

    /// Makes a user an admin of a group.
    #[instrument(skip(self))]
    pub async fn add_group_admin(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<RateLimitDescriptor, Error> {
        let path = format!("/groups/{}/admins", segment(group_id));
        let body = serde_json::json!({ "admins": [{ "id": user_id }] });
        let (_, rate_limit) = self
            .fetch::<serde_json::Value>(UpstreamRequest::post(path, &body)?)
            .await?;
        Ok(rate_limit)
    }

    /// Removes a user from a group.
    #[instrument(skip(self))]
    pub async fn remove_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<RateLimitDescriptor, Error> {
        let path = format!("/groups/{}/members/{}", segment(group_id), segment(user_id));
        self.send(UpstreamRequest::delete(path))
            .await
            .map(|(_, rate_limit)| rate_limit)
    }

    /// Removes a user's admin role in a group.
    #[instrument(skip(self))]
    pub async fn remove_group_admin(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<RateLimitDescriptor, Error> {
        let path = format!("/groups/{}/admins/{}", segment(group_id), segment(user_id));
        self.send(UpstreamRequest::delete(path))
            .await
            .map(|(_, rate_limit)| rate_limit)
    }

    /// Creates a user.
    #[instrument(skip(self, request), fields(action = ?request.action))]
    pub async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<(CreatedUser, RateLimitDescriptor), Error> {
        self.fetch(UpstreamRequest::post("/users", request)?).await
    }

    /// Deletes a user.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> Result<RateLimitDescriptor, Error> {
        let path = format!("/users/{}", segment(user_id));
        self.send(UpstreamRequest::delete(path))
            .await
            .map(|(_, rate_limit)| rate_limit)
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn paged(&self, path: String, page_token: &str) -> UpstreamRequest {
        UpstreamRequest::get(path)
            .with_query("next_page_token", page_token)
            .with_query("page_size", self.page_size.to_string())
    }

    /// Sends a request and maps statuses of 400 and above to errors.
    async fn send(
        &self,
        request: UpstreamRequest,
    ) -> Result<(bytes::Bytes, RateLimitDescriptor), Error> {
        let response = self.transport.execute(request).await?;
        let rate_limit = ratelimit::extract(&response.headers);

        if response.status >= 400 {
            let mut err = Error::upstream_status(response.status, response.text());
            if response.status == 429
                && let Some(reset_at) = rate_limit.reset_at
            {
                let wait = (reset_at - chrono::Utc::now()).to_std().unwrap_or_default();
                err = err.with_retry_after(wait);
            }
            return Err(err);
        }

        Ok((response.body, rate_limit))
    }

    /// Sends a request and decodes the JSON body. An empty body decodes to
    /// the default value.
    async fn fetch<R>(&self, request: UpstreamRequest) -> Result<(R, RateLimitDescriptor), Error>
    where
        R: DeserializeOwned + Default,
    {
        let (body, rate_limit) = self.send(request).await?;
        if body.is_empty() {
            return Ok((R::default(), rate_limit));
        }
        let value = serde_json::from_slice(&body).map_err(|e| {
            Error::invalid_response(format!("failed to decode upstream response: {}", e))
                .with_source(e)
        })?;
        Ok((value, rate_limit))
    }

    /// Follows `next_page_token` until exhausted, accumulating every page.
    async fn drain<P, T, F>(
        &self,
        path: String,
        split: F,
    ) -> Result<(Vec<T>, RateLimitDescriptor), Error>
    where
        P: DeserializeOwned + Default,
        F: Fn(P) -> (Pagination, Vec<T>),
    {
        let mut items = Vec::new();
        let mut token = String::new();
        let mut pages = 0_u32;

        loop {
            let (page, rate_limit) = self.fetch::<P>(self.paged(path.clone(), &token)).await?;
            let (pagination, mut batch) = split(page);
            pages += 1;
            debug!(path = %path, pages, batch = batch.len(), "fetched page");
            items.append(&mut batch);

            if pagination.next_page_token.is_empty() {
                return Ok((items, rate_limit));
            }
            if pagination.next_page_token == token {
                return Err(Error::invalid_response(format!(
                    "{} repeated next_page_token {:?}",
                    path, token
                )));
            }
            token = pagination.next_page_token;
        }
    }
}

fn into_page<T>(items: Vec<T>, pagination: Pagination, rate_limit: RateLimitDescriptor) -> Page<T> {
    Page {
        items,
        next_page_token: pagination.next_page_token,
        rate_limit,
    }
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

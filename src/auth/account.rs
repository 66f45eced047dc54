//! Server-to-server OAuth "account credentials" token provider.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use super::credentials::Secret;
use super::provider::{TokenFuture, TokenProvider};
use crate::config::ConnectorConfig;
use crate::user_agent;
use crate::Error;

/// Tokens are refreshed this long before the upstream-declared expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Longest lifetime honoured from `expires_in`.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Obtains bearer tokens with the account-credentials grant.
///
/// Issues `POST {auth_url}?grant_type=account_credentials&account_id=...`
/// authenticated with HTTP basic auth (client id and secret), and caches
/// the returned token until shortly before it expires.
///
/// ## Example
///
/// ```rust,ignore
/// use zoomsync::{ConnectorConfig, auth::AccountCredentialsProvider};
///
/// let config = ConnectorConfig::from_env()?;
/// let provider = AccountCredentialsProvider::new(&config)?;
/// ```
pub struct AccountCredentialsProvider {
    http_client: reqwest::Client,
    auth_url: String,
    account_id: String,
    client_id: String,
    client_secret: Secret,
    cached: RwLock<Option<CachedToken>>,
}

impl AccountCredentialsProvider {
    /// Creates a provider from the connector configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ConnectorConfig) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent::user_agent())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            auth_url: config.auth_url.clone(),
            account_id: config.account_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: RwLock::new(None),
        })
    }

    /// Drops the cached token so the next call requests a fresh one.
    pub fn invalidate(&self) {
        *self.cached.write() = None;
    }

    fn cached_token(&self) -> Option<String> {
        self.cached
            .read()
            .as_ref()
            .filter(|cached| Instant::now() < cached.refresh_at)
            .map(|cached| cached.token.clone())
    }

    async fn request_token(&self) -> Result<String, Error> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let url = format!(
            "{}?grant_type=account_credentials&account_id={}",
            self.auth_url,
            urlencoding::encode(&self.account_id)
        );
        debug!(auth_url = %self.auth_url, "requesting access token");

        let response = self
            .http_client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .basic_auth(&self.client_id, Some(self.client_secret.expose()))
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::transport(format!(
                "token endpoint unavailable: status {}: {}",
                status.as_u16(),
                body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::unauthorized(format!(
                "failed to get token: status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body = response.bytes().await?;
        let parsed: TokenResponse = serde_json::from_slice(&body)?;
        if parsed.access_token.is_empty() {
            return Err(Error::unauthorized("failed to get token: empty access token"));
        }

        let lifetime = parsed
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME)
            .min(MAX_TOKEN_LIFETIME);
        let refresh_at = Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN);

        *self.cached.write() = Some(CachedToken {
            token: parsed.access_token.clone(),
            refresh_at,
        });

        Ok(parsed.access_token)
    }
}

impl fmt::Debug for AccountCredentialsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentialsProvider")
            .field("auth_url", &self.auth_url)
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .finish_non_exhaustive()
    }
}

impl TokenProvider for AccountCredentialsProvider {
    fn get_token(&self) -> TokenFuture<'_> {
        Box::pin(self.request_token())
    }
}

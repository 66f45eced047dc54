//! Connector configuration.

use std::time::Duration;

use super::RetryConfig;
use crate::auth::Secret;
use crate::Error;

/// Default upstream API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.zoom.us/v2";

/// Default OAuth token endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://zoom.us/oauth/token";

/// Page size requested from every paginated upstream endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Configuration for a connector instance.
///
/// Built once at startup and treated as immutable afterwards.
///
/// ## Example
///
/// ```rust
/// use zoomsync::ConnectorConfig;
/// use std::time::Duration;
///
/// let config = ConnectorConfig::builder()
///     .account_id("acct_123")
///     .client_id("client_123")
///     .client_secret("secret")
///     .timeout(Duration::from_secs(10))
///     .build();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.page_size, 50);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct ConnectorConfig {
    /// Account the server-to-server app is installed in.
    #[builder(into)]
    pub account_id: String,

    /// OAuth client ID.
    #[builder(into)]
    pub client_id: String,

    /// OAuth client secret.
    #[builder(into)]
    pub client_secret: Secret,

    /// Upstream API base URL.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,

    /// OAuth token endpoint.
    #[builder(into, default = DEFAULT_AUTH_URL.to_string())]
    pub auth_url: String,

    /// Page size for paginated list endpoints.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Deadline applied to every upstream request.
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,

    /// Transport-level retry behaviour.
    #[builder(default)]
    pub retry: RetryConfig,
}

impl ConnectorConfig {
    /// Reads the configuration from the environment.
    ///
    /// Required: `ZOOM_ACCOUNT_ID`, `ZOOM_CLIENT_ID`, `ZOOM_CLIENT_SECRET`.
    /// Optional: `ZOOM_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is unset or
    /// the resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, Error> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| Error::configuration(format!("environment variable {} not set", name)))
        };

        let config = Self::builder()
            .account_id(var("ZOOM_ACCOUNT_ID")?)
            .client_id(var("ZOOM_CLIENT_ID")?)
            .client_secret(var("ZOOM_CLIENT_SECRET")?)
            .maybe_base_url(std::env::var("ZOOM_BASE_URL").ok())
            .build();
        config.validate()?;
        Ok(config)
    }

    /// Checks that all required settings are present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing setting.
    pub fn validate(&self) -> Result<(), Error> {
        if self.account_id.is_empty() {
            return Err(Error::configuration("account id is missing"));
        }
        if self.client_id.is_empty() {
            return Err(Error::configuration("client id is missing"));
        }
        if self.client_secret.is_empty() {
            return Err(Error::configuration("client secret is missing"));
        }
        if self.page_size == 0 {
            return Err(Error::configuration("page size must be greater than zero"));
        }
        url::Url::parse(&self.base_url)?;
        url::Url::parse(&self.auth_url)?;
        Ok(())
    }
}

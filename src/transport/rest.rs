//! REST transport implementation using reqwest.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};
use url::Url;

use super::traits::{HttpTransport, TransportStats, UpstreamRequest, UpstreamResponse};
use crate::auth::TokenProvider;
use crate::config::{ConnectorConfig, RetryConfig};
use crate::{Error, user_agent};

/// Values at or above this are read as a Unix timestamp rather than a
/// number of seconds.
const RETRY_AFTER_EPOCH_THRESHOLD: u64 = 1_000_000_000;

/// REST transport for the upstream API.
///
/// Attaches a bearer token from its [`TokenProvider`] to every request and
/// retries rate-limited, 5xx and connect/timeout failures according to its
/// [`RetryConfig`]. Non-2xx statuses are returned as responses once retries
/// are exhausted.
pub struct RestTransport {
    client: reqwest::Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    retry_config: RetryConfig,
    stats: Arc<RwLock<TransportStats>>,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a new REST transport builder.
    pub fn builder() -> RestTransportBuilder {
        RestTransportBuilder::new()
    }

    /// Creates a transport from connector configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn from_config(
        config: &ConnectorConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        Self::builder()
            .base_url(&config.base_url)?
            .token_provider(token_provider)
            .retry_config(config.retry.clone())
            .timeout(config.timeout)
            .build()
    }

    fn build_url(&self, request: &UpstreamRequest) -> Result<Url, Error> {
        let raw = format!("{}{}", self.base_url, request.path_and_query());
        Ok(Url::parse(&raw)?)
    }

    fn record(&self, success: bool, retries: u64) {
        let mut stats = self.stats.write();
        stats.requests_sent += 1;
        stats.retries += retries;
        if !success {
            stats.requests_failed += 1;
        }
    }

    /// Sends a request, re-sending per the retry policy.
    ///
    /// Once attempts are exhausted the last `429`/`5xx` response is
    /// returned as-is; the client turns it into an `UpstreamStatus` error.
    async fn execute_with_retry<F, Fut>(&self, make_request: F) -> Result<reqwest::Response, Error>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let policy = &self.retry_config;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let retries = u64::from(attempt - 1);
            let last = attempt >= policy.max_attempts();

            match make_request().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !policy.retries_status(status) || last {
                        self.record(response.status().is_success(), retries);
                        return Ok(response);
                    }

                    let now = chrono::Utc::now().timestamp();
                    let hint = retry_after_delay(response.headers(), now);
                    let delay = policy.delay_for_response(status, hint, attempt);
                    warn!(
                        status,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "retrying upstream request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if last || !policy.retries_failure(e.is_connect(), e.is_timeout()) {
                        self.record(false, retries);
                        return Err(Error::from(e));
                    }

                    let delay = policy.delay_for_attempt(attempt);
                    warn!(error = %e, attempt, "upstream request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for RestTransport {
    #[tracing::instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, Error> {
        let url = self.build_url(&request)?;
        let token = self.token_provider.get_token().await?;
        let method = reqwest::Method::from(request.method);

        let response = self
            .execute_with_retry(|| {
                let mut builder = self
                    .client
                    .request(method.clone(), url.clone())
                    .bearer_auth(&token)
                    .header(ACCEPT, HeaderValue::from_static("application/json"));
                if let Some(body) = &request.body {
                    builder = builder.json(body);
                }
                builder.send()
            })
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(status, bytes = body.len(), "upstream response");

        Ok(UpstreamResponse { status, headers, body })
    }

    fn stats(&self) -> TransportStats {
        *self.stats.read()
    }
}

/// Reads the delay requested by a `Retry-After` header.
///
/// The upstream sends a Unix timestamp; plain second counts are accepted
/// too. A timestamp in the past yields a zero delay.
fn retry_after_delay(headers: &HeaderMap, now_unix: i64) -> Option<Duration> {
    let value = headers
        .get("Retry-After")?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;

    if value >= RETRY_AFTER_EPOCH_THRESHOLD {
        let now = u64::try_from(now_unix).unwrap_or(0);
        Some(Duration::from_secs(value.saturating_sub(now)))
    } else {
        Some(Duration::from_secs(value))
    }
}

// ============================================================================
// REST Transport Builder
// ============================================================================

/// Builder for [`RestTransport`].
pub struct RestTransportBuilder {
    base_url: Option<String>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    retry_config: RetryConfig,
    timeout: Duration,
}

impl RestTransportBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            token_provider: None,
            retry_config: RetryConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not parse.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        let url = url.as_ref();
        Url::parse(url)?;
        self.base_url = Some(url.trim_end_matches('/').to_string());
        Ok(self)
    }

    /// Sets the token provider.
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Sets the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL or token provider is
    /// missing, or the HTTP client fails to build.
    pub fn build(self) -> Result<RestTransport, Error> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("base URL is required"))?;
        let token_provider = self
            .token_provider
            .ok_or_else(|| Error::configuration("token provider is required"))?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent::user_agent())
            .build()
            .map_err(|e| {
                Error::configuration(format!("failed to build HTTP client: {}", e)).with_source(e)
            })?;

        Ok(RestTransport {
            client,
            base_url,
            token_provider,
            retry_config: self.retry_config,
            stats: Arc::new(RwLock::new(TransportStats::default())),
        })
    }
}


#[cfg(test)]
mod wiremock_tests {
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::StaticToken;
    use crate::ErrorKind;

    fn create_transport(server: &MockServer, retry: RetryConfig) -> RestTransport {
        RestTransport::builder()
            .base_url(format!("{}/v2", server.uri()))
            .unwrap()
            .token_provider(Arc::new(StaticToken::new("test-token")))
            .retry_config(retry)
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::default()
            .with_max_retries(2)
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
            .with_jitter(0.0)
    }

    #[tokio::test]
    async fn test_get_sends_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users"))
            .and(query_param("page_size", "50"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Ratelimit-Limit", "100")
                    .set_body_string(r#"{"users":[]}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server, RetryConfig::disabled());
        let response = transport
            .execute(UpstreamRequest::get("/users").with_query("page_size", "50"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.headers.get("x-ratelimit-limit").unwrap(), "100");
        assert_eq!(response.text(), r#"{"users":[]}"#);
        assert_eq!(transport.stats().requests_sent, 1);
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/groups/g1/members"))
            .and(body_json(serde_json::json!({"members": [{"id": "u1"}]})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server, RetryConfig::disabled());
        let request = UpstreamRequest::post(
            "/groups/g1/members",
            &serde_json::json!({"members": [{"id": "u1"}]}),
        )
        .unwrap();
        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status, 201);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_client_error_returned_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/users/u1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server, fast_retry());
        let response = transport
            .execute(UpstreamRequest::delete("/users/u1"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(transport.stats().requests_failed, 1);
        assert_eq!(transport.stats().retries, 0);
    }

    #[tokio::test]
    async fn test_server_error_retried_then_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/roles"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let transport = create_transport(&server, fast_retry());
        let response = transport.execute(UpstreamRequest::get("/roles")).await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(transport.stats().retries, 2);
    }

    #[tokio::test]
    async fn test_rate_limited_then_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/groups"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/groups"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"groups":[]}"#))
            .mount(&server)
            .await;

        let transport = create_transport(&server, fast_retry());
        let response = transport.execute(UpstreamRequest::get("/groups")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.stats().retries, 1);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/users/me"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = create_transport(&server, RetryConfig::disabled());
        let err = transport
            .execute(UpstreamRequest::get("/users/me"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_retriable());
    }
}

//! Transport trait definitions and common types.
//!
//! The sync core talks to the upstream API only through [`HttpTransport`],
//! which receives an already-shaped [`UpstreamRequest`] and hands back the
//! raw [`UpstreamResponse`]. Authentication, connection pooling and
//! socket-level retries live behind the trait.

use std::fmt;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::Error;

// ============================================================================
// Request
// ============================================================================

/// HTTP method of an upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request against the upstream API, relative to its base URL.
///
/// ```rust
/// use zoomsync::transport::UpstreamRequest;
///
/// let request = UpstreamRequest::get("/users")
///     .with_query("next_page_token", "")
///     .with_query("page_size", "50");
/// assert_eq!(request.path_and_query(), "/users?next_page_token=&page_size=50");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path below the base URL, starting with `/`.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl UpstreamRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a `POST` request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, Error> {
        let mut request = Self::new(HttpMethod::Post, path);
        request.body = Some(serde_json::to_value(body)?);
        Ok(request)
    }

    /// Creates a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns the value of the first query parameter named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the path with the URL-encoded query string appended.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

// ============================================================================
// Response
// ============================================================================

/// A raw upstream response.
///
/// Transports return every response that carries a status, including
/// 4xx/5xx; mapping statuses to errors is the client's job.
#[derive(Debug, Clone, Default)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a `200 OK` response with a JSON body.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200).with_body(value.to_string())
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body decoded as lossy UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Request counters kept by a transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Requests that produced a response or a final error.
    pub requests_sent: u64,
    /// Requests that ended in an error or a non-2xx status.
    pub requests_failed: u64,
    /// Extra attempts made by retries.
    pub retries: u64,
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Authenticated HTTP transport to the upstream API.
///
/// Implementations are shared read-only between drivers and must be safe
/// to call concurrently.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns `Transport` or `Timeout` errors when no response was
    /// received. HTTP error statuses are not errors at this layer.
    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, Error>;

    /// Returns the transport's request counters.
    fn stats(&self) -> TransportStats;
}

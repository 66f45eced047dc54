//! Mock transport implementation for testing.
//!
//! This module provides a mock transport that operates entirely in-memory,
//! allowing tests to run without network dependencies.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::traits::{HttpMethod, HttpTransport, TransportStats, UpstreamRequest, UpstreamResponse};
use crate::{Error, ErrorKind};

/// A canned outcome for one request.
#[derive(Debug, Clone)]
enum MockReply {
    Response(UpstreamResponse),
    Failure(ErrorKind, String),
}

/// Mock transport for testing.
///
/// Canned responses are queued per `(method, path)`; the query string is
/// not part of the key. Queued replies are consumed in order and the last
/// one is repeated. Requests to a route with nothing queued get a `404`.
///
/// ```rust
/// use zoomsync::transport::{HttpMethod, HttpTransport, MockTransport, UpstreamRequest, UpstreamResponse};
///
/// # tokio_test_block(async {
/// let mock = MockTransport::new();
/// mock.respond(HttpMethod::Get, "/roles", UpstreamResponse::json(&serde_json::json!({"roles": []})));
///
/// let response = mock.execute(UpstreamRequest::get("/roles")).await.unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(mock.request_count(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
pub struct MockTransport {
    routes: RwLock<HashMap<(HttpMethod, String), VecDeque<MockReply>>>,
    requests: RwLock<Vec<UpstreamRequest>>,
    request_count: AtomicU64,
    failed_count: AtomicU64,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
            request_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
        }
    }

    fn enqueue(&self, method: HttpMethod, path: &str, reply: MockReply) {
        self.routes
            .write()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Queues a response for `method` and `path`.
    pub fn respond(&self, method: HttpMethod, path: &str, response: UpstreamResponse) {
        self.enqueue(method, path, MockReply::Response(response));
    }

    /// Queues a `200 OK` JSON response for `method` and `path`.
    pub fn respond_json(&self, method: HttpMethod, path: &str, body: serde_json::Value) {
        self.respond(method, path, UpstreamResponse::json(&body));
    }

    /// Queues a transport-level failure for `method` and `path`.
    pub fn fail(&self, method: HttpMethod, path: &str, kind: ErrorKind, message: &str) {
        self.enqueue(method, path, MockReply::Failure(kind, message.to_string()));
    }

    /// Drops every queued reply.
    pub fn clear(&self) {
        self.routes.write().clear();
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Returns a copy of every request received, in order.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.read().clone()
    }

    /// Returns the most recent request, if any.
    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.requests.read().last().cloned()
    }

    fn next_reply(&self, method: HttpMethod, path: &str) -> Option<MockReply> {
        let mut routes = self.routes.write();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, Error> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let reply = self.next_reply(request.method, &request.path);
        let missing = format!("no mock response for {} {}", request.method, request.path);
        self.requests.write().push(request);

        match reply {
            Some(MockReply::Response(response)) => {
                if !response.is_success() {
                    self.failed_count.fetch_add(1, Ordering::Relaxed);
                }
                Ok(response)
            }
            Some(MockReply::Failure(kind, message)) => {
                self.failed_count.fetch_add(1, Ordering::Relaxed);
                Err(Error::new(kind, message))
            }
            None => {
                self.failed_count.fetch_add(1, Ordering::Relaxed);
                Ok(UpstreamResponse::new(404).with_body(missing))
            }
        }
    }

    fn stats(&self) -> TransportStats {
        TransportStats {
            requests_sent: self.request_count(),
            requests_failed: self.failed_count.load(Ordering::Relaxed),
            retries: 0,
        }
    }
}

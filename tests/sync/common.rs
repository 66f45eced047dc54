//! Shared harness for the sync tests.

use std::sync::{Arc, Once};
use std::time::Duration;

use wiremock::MockServer;
use zoomsync::auth::StaticToken;
use zoomsync::client::ZoomClient;
use zoomsync::connector::{Catalog, Connector, ResourceSyncer};
use zoomsync::transport::{HttpTransport, MockTransport, RestTransport};
use zoomsync::types::ResourceType;
use zoomsync::RetryConfig;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A connector over an in-memory transport.
pub fn mock_connector() -> (Arc<MockTransport>, Connector) {
    init_tracing();
    let mock = Arc::new(MockTransport::new());
    let transport: Arc<dyn HttpTransport> = Arc::clone(&mock) as Arc<dyn HttpTransport>;
    let connector = Connector::new(ZoomClient::new(transport, 2), Arc::new(Catalog::new()));
    (mock, connector)
}

/// A connector over a REST transport talking to `server`, with retries off.
pub fn http_connector(server: &MockServer) -> Connector {
    http_connector_with_retry(server, RetryConfig::disabled())
}

/// A connector over a REST transport talking to `server`.
pub fn http_connector_with_retry(server: &MockServer, retry: RetryConfig) -> Connector {
    init_tracing();
    let transport = RestTransport::builder()
        .base_url(format!("{}/v2", server.uri()))
        .expect("valid base url")
        .token_provider(Arc::new(StaticToken::new("test-token")))
        .retry_config(retry)
        .timeout(Duration::from_secs(2))
        .build()
        .expect("transport builds");
    Connector::new(
        ZoomClient::new(Arc::new(transport), 2),
        Arc::new(Catalog::new()),
    )
}

/// Returns the driver for `resource_type`.
pub fn syncer(connector: &Connector, resource_type: ResourceType) -> Arc<dyn ResourceSyncer> {
    connector
        .syncers()
        .into_iter()
        .find(|s| s.descriptor().resource_type == resource_type)
        .expect("every resource type has a driver")
}

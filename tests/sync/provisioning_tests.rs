//! Grant/revoke, account creation and deletion.

use std::time::Duration;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoomsync::client::Group;
use zoomsync::connector::Connector;
use zoomsync::mapping::group_resource;
use zoomsync::transport::{HttpMethod, UpstreamResponse};
use zoomsync::types::{
    AccountProfile, CredentialOption, Entitlement, Grant, ResourceId, ResourceType,
};
use zoomsync::{ErrorKind, RetryConfig};

use crate::common::{http_connector, http_connector_with_retry, mock_connector, syncer};

fn group_entitlement(connector: &Connector, slug: &str) -> Entitlement {
    let group = group_resource(
        &Group {
            id: "g1".to_string(),
            name: "Ops".to_string(),
        },
        None,
    );
    syncer(connector, ResourceType::Group)
        .entitlements(&group)
        .into_iter()
        .find(|e| e.slug == slug)
        .expect("group entitlement exists")
}

fn profile() -> AccountProfile {
    AccountProfile {
        email: Some("grace@example.com".to_string()),
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        display_name: Some("Grace H".to_string()),
    }
}

#[tokio::test]
async fn test_grant_member_posts_member_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/groups/g1/members"))
        .and(body_json(serde_json::json!({"members": [{"id": "u1"}]})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-ratelimit-remaining", "9")
                .set_body_json(serde_json::json!({"ids": "u1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let connector = http_connector(&server);
    let member = group_entitlement(&connector, "member");
    let groups = syncer(&connector, ResourceType::Group);
    let provisioner = groups.provisioner().expect("groups are provisionable");

    let annotations = provisioner
        .grant(&ResourceId::user("u1"), &member)
        .await
        .expect("grant succeeds");
    assert_eq!(annotations.rate_limit().map(|r| r.remaining), Some(9));
}

#[tokio::test]
async fn test_revoke_admin_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/groups/g1/admins/u1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let connector = http_connector(&server);
    let grant = Grant::new(group_entitlement(&connector, "admin"), ResourceId::user("u1"));
    let groups = syncer(&connector, ResourceType::Group);

    groups
        .provisioner()
        .expect("groups are provisionable")
        .revoke(&grant)
        .await
        .expect("revoke succeeds");
}

#[tokio::test]
async fn test_revoke_for_group_principal_makes_no_call() {
    let (mock, connector) = mock_connector();
    let grant = Grant::new(group_entitlement(&connector, "member"), ResourceId::group("g2"));
    let groups = syncer(&connector, ResourceType::Group);

    let err = groups
        .provisioner()
        .expect("groups are provisionable")
        .revoke(&grant)
        .await
        .expect_err("group principals are rejected");
    assert_eq!(err.kind(), ErrorKind::PrincipalType);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_grant_rejects_foreign_entitlement() {
    let (mock, connector) = mock_connector();
    let mut entitlement = group_entitlement(&connector, "member");
    entitlement.resource = ResourceId::new(ResourceType::Role, "r1");
    let groups = syncer(&connector, ResourceType::Group);

    let err = groups
        .provisioner()
        .expect("groups are provisionable")
        .grant(&ResourceId::user("u1"), &entitlement)
        .await
        .expect_err("role entitlement rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidEntitlement);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_create_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/users"))
        .and(body_json(serde_json::json!({
            "action": "create",
            "user_info": {
                "email": "grace@example.com",
                "first_name": "Grace",
                "last_name": "Hopper",
                "display_name": "Grace H",
                "type": 1
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "u42",
            "email": "grace@example.com",
            "first_name": "Grace",
            "last_name": "Hopper",
            "type": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = http_connector(&server);
    let users = syncer(&connector, ResourceType::User);
    let accounts = users.account_manager().expect("users are manageable");

    assert_eq!(accounts.credential_options(), [CredentialOption::NoPassword]);
    let result = accounts.create_account(&profile()).await.expect("account created");
    assert_eq!(result.resource.id, ResourceId::user("u42"));
    assert_eq!(
        result.resource.user.map(|u| u.email).as_deref(),
        Some("grace@example.com")
    );
}

#[tokio::test]
async fn test_create_account_without_display_name_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let connector = http_connector(&server);
    let users = syncer(&connector, ResourceType::User);
    let incomplete = AccountProfile {
        display_name: None,
        ..profile()
    };

    let err = users
        .account_manager()
        .expect("users are manageable")
        .create_account(&incomplete)
        .await
        .expect_err("incomplete profile rejected");
    assert_eq!(err.kind(), ErrorKind::MissingProfileField);
    assert!(err.message().contains("display_name"));
}

#[tokio::test]
async fn test_delete_confirmed_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/users/u1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/users/u1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": 1001,
            "message": "User does not exist: u1."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = http_connector(&server);
    let users = syncer(&connector, ResourceType::User);
    users
        .account_manager()
        .expect("users are manageable")
        .delete(&ResourceId::user("u1"))
        .await
        .expect("deletion confirmed");
}

#[tokio::test]
async fn test_delete_unconfirmed_when_lookup_fails() {
    let (mock, connector) = mock_connector();
    mock.respond(HttpMethod::Delete, "/users/u1", UpstreamResponse::new(204));
    mock.respond(
        HttpMethod::Get,
        "/users/u1",
        UpstreamResponse::new(400).with_body("bad request"),
    );
    let users = syncer(&connector, ResourceType::User);

    let err = users
        .account_manager()
        .expect("users are manageable")
        .delete(&ResourceId::user("u1"))
        .await
        .expect_err("deletion not confirmed");
    assert_eq!(err.kind(), ErrorKind::DeletionNotConfirmed);
}

/// A 429 carrying Retry-After is waited out and then succeeds.
#[tokio::test]
async fn test_rate_limited_grant_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/groups/g1/members"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/groups/g1/members"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let retry = RetryConfig::default()
        .with_max_retries(2)
        .with_initial_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(10))
        .with_jitter(0.0);
    let connector = http_connector_with_retry(&server, retry);
    let member = group_entitlement(&connector, "member");
    let groups = syncer(&connector, ResourceType::Group);

    groups
        .provisioner()
        .expect("groups are provisionable")
        .grant(&ResourceId::user("u1"), &member)
        .await
        .expect("grant succeeds after retry");
}

//! Resource listing: pagination, cursors, status mapping and rate limits.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoomsync::ErrorKind;
use zoomsync::cursor::{self, CursorState, Frame};
use zoomsync::transport::HttpMethod;
use zoomsync::types::{ResourceId, ResourceType, UserStatus};

use crate::common::{http_connector, mock_connector, syncer};

fn users_page(next: &str, ids: &[&str]) -> serde_json::Value {
    let users: Vec<_> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "email": format!("{}@example.com", id),
                "status": "active"
            })
        })
        .collect();
    serde_json::json!({"next_page_token": next, "page_size": 2, "users": users})
}

/// Three upstream pages are consumed in three calls and end on an empty cursor.
#[tokio::test]
async fn test_users_listing_converges() {
    let server = MockServer::start().await;
    for (token, next, ids) in [
        ("", "p2", vec!["u1", "u2"]),
        ("p2", "p3", vec!["u3", "u4"]),
        ("p3", "", vec!["u5"]),
    ] {
        Mock::given(method("GET"))
            .and(path("/v2/users"))
            .and(query_param("next_page_token", token))
            .and(query_param("page_size", "2"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_page(next, &ids)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let connector = http_connector(&server);
    let users = syncer(&connector, ResourceType::User);

    let mut cursor = String::new();
    let mut seen = Vec::new();
    let mut calls = 0;
    loop {
        let page = users.list(None, &cursor).await.expect("page lists");
        calls += 1;
        seen.extend(page.items.into_iter().map(|r| r.id.resource));
        if page.next_cursor.is_empty() {
            break;
        }
        cursor = page.next_cursor;
    }

    assert_eq!(calls, 3);
    assert_eq!(seen, ["u1", "u2", "u3", "u4", "u5"]);
}

/// Replaying the same cursor yields the same page.
#[tokio::test]
async fn test_replayed_cursor_is_idempotent() {
    let (mock, connector) = mock_connector();
    mock.respond_json(HttpMethod::Get, "/groups", serde_json::json!({
        "next_page_token": "p2",
        "groups": [{"id": "g1", "name": "Ops"}]
    }));
    mock.respond_json(HttpMethod::Get, "/groups", serde_json::json!({
        "next_page_token": "",
        "groups": [{"id": "g2", "name": "Eng"}]
    }));
    let groups = syncer(&connector, ResourceType::Group);

    let first = groups.list(None, "").await.expect("first page");
    let second = groups.list(None, &first.next_cursor).await.expect("second page");
    let replay = groups.list(None, &first.next_cursor).await.expect("replayed page");

    assert_eq!(second.items, replay.items);
    assert_eq!(second.next_cursor, replay.next_cursor);
    assert!(replay.is_last());
}

/// A cursor carrying another type's frame still ends once users run out.
#[tokio::test]
async fn test_listing_from_foreign_frame_converges() {
    let (mock, connector) = mock_connector();
    mock.respond_json(HttpMethod::Get, "/users", users_page("p2", &["u1", "u2"]));
    mock.respond_json(HttpMethod::Get, "/users", users_page("", &["u3"]));
    let users = syncer(&connector, ResourceType::User);

    let outer = CursorState::from_frames(vec![Frame::new(ResourceType::ContactGroup)]);
    let mut cursor = cursor::encode(outer, "cg-page-2").expect("cursor encodes");
    let mut seen = Vec::new();
    for _ in 0..5 {
        let page = users.list(None, &cursor).await.expect("page lists");
        seen.extend(page.items.into_iter().map(|r| r.id.resource));
        cursor = page.next_cursor;
        if cursor.is_empty() {
            break;
        }
    }

    assert!(cursor.is_empty());
    assert_eq!(seen, ["u1", "u2", "u3"]);
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_user_status_mapping() {
    let (mock, connector) = mock_connector();
    mock.respond_json(HttpMethod::Get, "/users", serde_json::json!({
        "users": [
            {"id": "u1", "status": "active"},
            {"id": "u2", "status": "inactive"},
            {"id": "u3", "status": "pending"},
            {"id": "u4", "status": "suspended-ish"}
        ]
    }));

    let page = syncer(&connector, ResourceType::User)
        .list(None, "")
        .await
        .expect("page lists");
    let statuses: Vec<_> = page
        .items
        .iter()
        .map(|r| r.user.as_ref().map(|u| u.status))
        .collect();
    assert_eq!(
        statuses,
        [
            Some(UserStatus::Enabled),
            Some(UserStatus::Disabled),
            Some(UserStatus::Unspecified),
            Some(UserStatus::Unspecified),
        ]
    );
}

#[tokio::test]
async fn test_missing_rate_limit_headers_yield_zero_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "groups": [{"id": "g1", "name": "Ops"}]
        })))
        .mount(&server)
        .await;

    let page = syncer(&http_connector(&server), ResourceType::Group)
        .list(None, "")
        .await
        .expect("page lists");
    assert_eq!(page.items.len(), 1);
    let rate_limit = page.annotations.rate_limit().expect("annotation present");
    assert!(rate_limit.is_zero());
}

#[tokio::test]
async fn test_rate_limit_headers_become_annotation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/contacts/groups"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-limit", "80")
                .insert_header("x-ratelimit-remaining", "79")
                .insert_header("retry-after", "1700000000")
                .set_body_json(serde_json::json!({"groups": []})),
        )
        .mount(&server)
        .await;

    let page = syncer(&http_connector(&server), ResourceType::ContactGroup)
        .list(None, "")
        .await
        .expect("page lists");
    assert_eq!(page.annotations.len(), 1);
    let rate_limit = page.annotations.rate_limit().expect("annotation present");
    assert_eq!(rate_limit.limit, 80);
    assert_eq!(rate_limit.remaining, 79);
    assert_eq!(rate_limit.reset_at.map(|t| t.timestamp()), Some(1_700_000_000));
}

/// A failing page yields an error and no cursor; the caller retries with
/// the cursor it already had.
#[tokio::test]
async fn test_failed_page_returns_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = syncer(&http_connector(&server), ResourceType::User)
        .list(None, "")
        .await
        .expect_err("page fails");
    assert_eq!(err.kind(), ErrorKind::UpstreamStatus);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body(), Some("boom"));
}

#[tokio::test]
async fn test_malformed_cursor_is_not_reset() {
    let (mock, connector) = mock_connector();

    for resource_type in ResourceType::ALL {
        if resource_type == ResourceType::Role {
            continue;
        }
        let err = syncer(&connector, resource_type)
            .list(None, "%%%")
            .await
            .expect_err("cursor rejected");
        assert_eq!(err.kind(), ErrorKind::MalformedCursor);
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_parent_is_recorded() {
    let (mock, connector) = mock_connector();
    mock.respond_json(HttpMethod::Get, "/roles", serde_json::json!({
        "roles": [{"id": "r1", "name": "Admin"}]
    }));
    let parent = ResourceId::group("g1");

    let page = syncer(&connector, ResourceType::Role)
        .list(Some(&parent), "")
        .await
        .expect("roles list");
    assert_eq!(page.items[0].parent, Some(parent));
}

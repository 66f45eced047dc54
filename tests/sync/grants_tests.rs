//! Entitlement and grant listing across resource types.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoomsync::ErrorKind;
use zoomsync::client::{ContactGroup, Group, Role};
use zoomsync::mapping::{contact_group_resource, group_resource, role_resource};
use zoomsync::transport::HttpMethod;
use zoomsync::types::{Resource, ResourceId, ResourceType};

use crate::common::{http_connector, mock_connector, syncer};

fn contact_group() -> Resource {
    contact_group_resource(
        &ContactGroup {
            id: "cg1".to_string(),
            name: "Sales".to_string(),
            ..ContactGroup::default()
        },
        None,
    )
}

#[tokio::test]
async fn test_contact_group_members_of_both_kinds() {
    let (mock, connector) = mock_connector();
    mock.respond_json(
        HttpMethod::Get,
        "/contacts/groups/cg1/members",
        serde_json::json!({
            "group_members": [
                {"id": "u1", "name": "Ada", "type": 1},
                {"id": "g1", "name": "Ops", "type": 2}
            ]
        }),
    );

    let page = syncer(&connector, ResourceType::ContactGroup)
        .grants(&contact_group(), "")
        .await
        .expect("grants list");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].principal, ResourceId::user("u1"));
    assert_eq!(page.items[1].principal, ResourceId::group("g1"));
    assert!(page.items.iter().all(|g| g.entitlement.slug == "member"));
    assert!(page.is_last());
}

#[tokio::test]
async fn test_every_grant_targets_a_listed_entitlement() {
    let (mock, connector) = mock_connector();
    mock.respond_json(
        HttpMethod::Get,
        "/groups/g1/members",
        serde_json::json!({"members": [{"id": "u1"}]}),
    );
    mock.respond_json(
        HttpMethod::Get,
        "/groups/g1/admins",
        serde_json::json!({"admins": [{"id": "u2"}]}),
    );
    let group = group_resource(
        &Group {
            id: "g1".to_string(),
            name: "Ops".to_string(),
        },
        None,
    );
    let groups = syncer(&connector, ResourceType::Group);

    let entitlement_ids: Vec<_> = groups.entitlements(&group).iter().map(|e| e.id()).collect();
    let page = groups.grants(&group, "").await.expect("grants list");

    assert_eq!(page.items.len(), 2);
    for grant in &page.items {
        assert!(entitlement_ids.contains(&grant.entitlement.id()));
        assert!(grant.entitlement.is_grantable_to(grant.principal.resource_type));
    }
    // One rate-limit annotation per drained listing.
    assert_eq!(page.annotations.len(), 2);
}

/// Group members are drained across upstream pages within one grants call.
#[tokio::test]
async fn test_group_grants_drain_member_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/groups/g1/members"))
        .and(query_param("next_page_token", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "next_page_token": "m2",
            "members": [{"id": "u1"}, {"id": "u2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/groups/g1/members"))
        .and(query_param("next_page_token", "m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "next_page_token": "",
            "members": [{"id": "u3"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/groups/g1/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"admins": []})))
        .expect(1)
        .mount(&server)
        .await;

    let group = group_resource(
        &Group {
            id: "g1".to_string(),
            name: "Ops".to_string(),
        },
        None,
    );
    let page = syncer(&http_connector(&server), ResourceType::Group)
        .grants(&group, "")
        .await
        .expect("grants list");

    let principals: Vec<_> = page.items.iter().map(|g| g.principal.resource.as_str()).collect();
    assert_eq!(principals, ["u1", "u2", "u3"]);
    assert!(page.is_last());
}

#[tokio::test]
async fn test_role_grants_follow_cursor() {
    let (mock, connector) = mock_connector();
    mock.respond_json(
        HttpMethod::Get,
        "/roles/r1/members",
        serde_json::json!({"next_page_token": "p2", "members": [{"id": "u1"}]}),
    );
    mock.respond_json(
        HttpMethod::Get,
        "/roles/r1/members",
        serde_json::json!({"next_page_token": "", "members": [{"id": "u2"}]}),
    );
    let role = role_resource(
        &Role {
            id: "r1".to_string(),
            name: "Admin".to_string(),
            ..Role::default()
        },
        None,
    );
    let roles = syncer(&connector, ResourceType::Role);

    let mut cursor = String::new();
    let mut principals = Vec::new();
    loop {
        let page = roles.grants(&role, &cursor).await.expect("grants list");
        principals.extend(page.items.into_iter().map(|g| g.principal));
        if page.next_cursor.is_empty() {
            break;
        }
        cursor = page.next_cursor;
    }

    assert_eq!(principals, [ResourceId::user("u1"), ResourceId::user("u2")]);
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_grants_surface_upstream_failure() {
    let (mock, connector) = mock_connector();
    mock.fail(
        HttpMethod::Get,
        "/contacts/groups/cg1/members",
        ErrorKind::Timeout,
        "deadline elapsed",
    );

    let err = syncer(&connector, ResourceType::ContactGroup)
        .grants(&contact_group(), "")
        .await
        .expect_err("grants fail");
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retriable());
}

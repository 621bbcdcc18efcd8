//! Integration tests using wiremock to simulate the mailing list API.

use mailgun_lists::{
    AccessLevel, BatchDefaults, Client, Config, Error, List, ListUpdate, MemberRecord,
    MemberUpdate, NewMember, PageRequest, SubscriptionFilter,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const LIST: &str = "dev@mg.example.com";

fn client_for(mock_server: &MockServer) -> Client {
    let config = Config::builder()
        .api_key("key-test")
        .domain("mg.example.com")
        .base_url(format!("{}/v3", mock_server.uri()))
        .build()
        .unwrap();
    Client::new(config).unwrap()
}

fn form_of(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

async fn only_request(mock_server: &MockServer) -> Request {
    let mut requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

fn list_json() -> Value {
    json!({
        "address": LIST,
        "name": "Developers",
        "description": "Team list",
        "access_level": "members",
        "created_at": "Tue, 09 Aug 2016 20:05:31 -0000",
        "members_count": 0
    })
}

#[tokio::test]
async fn test_create_list_sends_form_with_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/lists"))
        .and(header("authorization", "Basic YXBpOmtleS10ZXN0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Mailing list has been created",
            "list": list_json()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let proto = List::new(LIST)
        .with_name("Developers")
        .with_description("Team list")
        .with_access_level(AccessLevel::Members);

    let created = client.create_list(&proto).await.unwrap();

    assert_eq!(created.address, LIST);
    assert!(!created.created_at.is_empty());
    assert!(created.created_at_time().is_some());

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form["address"], LIST);
    assert_eq!(form["name"], "Developers");
    assert_eq!(form["description"], "Team list");
    assert_eq!(form["access_level"], "members");
}

#[tokio::test]
async fn test_create_list_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/lists"))
        .respond_with(
            ResponseTemplate::new(409).set_body_string(r#"{"message":"List already exists"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.create_list(&List::new(LIST)).await;

    match result {
        Err(Error::Conflict { raw_response }) => {
            assert!(raw_response.contains("already exists"));
        }
        _ => panic!("Expected Conflict, got {:?}", result),
    }
}

#[tokio::test]
async fn test_create_list_invalid_address_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.create_list(&List::new("not an address")).await;

    assert!(matches!(result, Err(Error::Validation { status: None, .. })));
}

#[tokio::test]
async fn test_get_missing_list_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"List not found"}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_list_by_address(LIST).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[tokio::test]
async fn test_get_lists_sends_paging_and_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/lists"))
        .and(query_param("limit", "25"))
        .and(query_param("skip", "50"))
        .and(query_param("address", LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 51,
            "items": [list_json()]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .get_lists(PageRequest::new(25, 50), Some(LIST))
        .await
        .unwrap();

    assert_eq!(page.total_count, 51);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].access_level, AccessLevel::Members);
}

#[tokio::test]
async fn test_get_lists_empty_filter_is_omitted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/lists"))
        .and(query_param_is_missing("address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "items": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .get_lists(PageRequest::default(), Some(""))
        .await
        .unwrap();

    assert_eq!(page.total_count, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_zero_limit_rejected_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .get_members(LIST, PageRequest::new(0, 0), SubscriptionFilter::All)
        .await;

    assert!(matches!(result, Err(Error::Validation { .. })));
}

#[tokio::test]
async fn test_update_list_sends_only_changed_fields() {
    let mock_server = MockServer::start().await;

    let mut updated = list_json();
    updated["description"] = json!("A list whose description changed");

    Mock::given(method("PUT"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Mailing list has been updated",
            "list": updated
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let list = client
        .update_list(
            LIST,
            &ListUpdate::new().description("A list whose description changed"),
        )
        .await
        .unwrap();

    assert_eq!(list.description, "A list whose description changed");
    assert_eq!(list.name, "Developers");

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form.len(), 1);
    assert_eq!(form["description"], "A list whose description changed");
}

#[tokio::test]
async fn test_delete_list_then_get_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": LIST,
            "message": "Mailing list has been removed"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .respond_with(ResponseTemplate::new(404).set_body_string("List not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.delete_list(LIST).await.unwrap();

    let err = client.get_list_by_address(LIST).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_members_filter_query() {
    let mock_server = MockServer::start().await;

    let empty = json!({"total_count": 0, "items": []});

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}/members", LIST)))
        .and(query_param("subscribed", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}/members", LIST)))
        .and(query_param("subscribed", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}/members", LIST)))
        .and(query_param_is_missing("subscribed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    for filter in [
        SubscriptionFilter::Subscribed,
        SubscriptionFilter::Unsubscribed,
        SubscriptionFilter::All,
    ] {
        client
            .get_members(LIST, PageRequest::default(), filter)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_create_member_leaves_subscription_unset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/lists/{}/members", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Mailing list member has been created",
            "member": {
                "address": "joe@example.com",
                "name": "Joe Example",
                "vars": {},
                "subscribed": true
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let member = client
        .create_member(
            true,
            LIST,
            &NewMember::new("Joe Example <joe@example.com>"),
        )
        .await
        .unwrap();

    assert!(member.subscribed);
    assert_eq!(member.address, "joe@example.com");

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form["address"], "joe@example.com");
    assert_eq!(form["name"], "Joe Example");
    assert_eq!(form["upsert"], "yes");
    assert!(!form.contains_key("subscribed"));
    assert!(!form.contains_key("vars"));
}

#[tokio::test]
async fn test_create_member_sends_vars_and_explicit_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/lists/{}/members", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "member": {
                "address": "joe@example.com",
                "name": "",
                "vars": {"age": 26},
                "subscribed": false
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let member = client
        .create_member(
            false,
            LIST,
            &NewMember::new("joe@example.com")
                .var("age", json!(26))
                .subscribed(false),
        )
        .await
        .unwrap();

    assert!(!member.subscribed);
    assert_eq!(member.vars["age"], json!(26));

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form["subscribed"], "no");
    assert_eq!(form["upsert"], "no");
    assert_eq!(
        serde_json::from_str::<Value>(&form["vars"]).unwrap(),
        json!({"age": 26})
    );
}

#[tokio::test]
async fn test_create_member_without_upsert_conflicts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/lists/{}/members", LIST)))
        .respond_with(ResponseTemplate::new(409).set_body_string("Address already exists"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .create_member(false, LIST, &NewMember::new("joe@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_bulk_insert_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/lists/{}/members.json", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": list_json(),
            "message": "Mailing list has been updated"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let records = vec![
        MemberRecord::from(
            NewMember::new("joe.user1@example.com")
                .name("Joe's debugging account")
                .subscribed(false),
        ),
        MemberRecord::from(
            NewMember::new("Joe Cool <joe.user2@example.com>").name("Joe's Cool Account"),
        ),
        MemberRecord::from(
            NewMember::new("joe.user3@example.com")
                .var("packet-email", json!("KW9ABC @ BOGBBS-4.#NCA.CA.USA.NOAM")),
        ),
        MemberRecord::from("Plain Jane <jane@example.com>"),
    ];

    let list = client.create_member_list(None, LIST, &records).await.unwrap();
    assert_eq!(list.address, LIST);

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form["upsert"], "no");
    assert_eq!(
        serde_json::from_str::<Value>(&form["members"]).unwrap(),
        json!([
            {"address": "joe.user1@example.com", "name": "Joe's debugging account", "subscribed": false},
            {"address": "joe.user2@example.com", "name": "Joe's Cool Account"},
            {"address": "joe.user3@example.com", "vars": {"packet-email": "KW9ABC @ BOGBBS-4.#NCA.CA.USA.NOAM"}},
            {"address": "jane@example.com", "name": "Plain Jane"}
        ])
    );
}

#[tokio::test]
async fn test_bulk_insert_applies_defaults_under_record_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/lists/{}/members.json", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": list_json()})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let defaults = BatchDefaults::new().subscribed(false).upsert(true);
    let records = vec![
        MemberRecord::from("a@example.com"),
        MemberRecord::from(NewMember::new("b@example.com").subscribed(true)),
    ];

    client
        .create_member_list(Some(&defaults), LIST, &records)
        .await
        .unwrap();

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form["upsert"], "yes");
    assert_eq!(
        serde_json::from_str::<Value>(&form["members"]).unwrap(),
        json!([
            {"address": "a@example.com", "subscribed": false},
            {"address": "b@example.com", "subscribed": true}
        ])
    );
}

#[tokio::test]
async fn test_bulk_insert_with_bad_record_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let records = vec![
        MemberRecord::from("good@example.com"),
        MemberRecord::from("bogus"),
    ];
    let err = client
        .create_member_list(None, LIST, &records)
        .await
        .unwrap_err();

    match err {
        Error::Validation { message, status } => {
            assert!(status.is_none());
            assert!(message.contains("bogus"));
        }
        other => panic!("Expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_member_sends_only_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/v3/lists/{}/members/joe@example.com", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "member": {
                "address": "joe@example.com",
                "name": "Joe Cool",
                "vars": {"age": 26},
                "subscribed": false
            },
            "message": "Mailing list member has been updated"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let member = client
        .update_member("joe@example.com", LIST, &MemberUpdate::new().name("Joe Cool"))
        .await
        .unwrap();

    assert_eq!(member.name, "Joe Cool");

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form.len(), 1);
    assert_eq!(form["name"], "Joe Cool");
}

#[tokio::test]
async fn test_unsubscribe_sends_only_subscription() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/v3/lists/{}/members/joe@example.com", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "member": {"address": "joe@example.com", "subscribed": false}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let member = client
        .unsubscribe("Joe <joe@example.com>", LIST)
        .await
        .unwrap();

    assert!(!member.subscribed);

    let form = form_of(&only_request(&mock_server).await);
    assert_eq!(form.len(), 1);
    assert_eq!(form["subscribed"], "no");
}

#[tokio::test]
async fn test_delete_missing_member_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v3/lists/{}/members/ghost@example.com", LIST)))
        .respond_with(ResponseTemplate::new(404).set_body_string("Member ghost@example.com not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .delete_member("ghost@example.com", LIST)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.raw_response().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_status_taxonomy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/lists/bad@mg.example.com"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid address"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/lists/locked@mg.example.com"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Unprocessable"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/lists/broken@mg.example.com"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    match client.get_list_by_address("bad@mg.example.com").await {
        Err(Error::Validation { message, status }) => {
            assert_eq!(message, "Invalid address");
            assert_eq!(status.map(|s| s.as_u16()), Some(400));
        }
        other => panic!("Expected Validation, got {:?}", other),
    }

    assert!(matches!(
        client.get_list_by_address("locked@mg.example.com").await,
        Err(Error::Validation { .. })
    ));

    match client.get_list_by_address("broken@mg.example.com").await {
        Err(Error::RequestFailed {
            status,
            raw_response,
            ..
        }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(raw_response, "Server error");
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_list_by_address(LIST).await;

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            status,
            ..
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, "invalid json");
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"list": list_json()}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = Config::builder()
        .api_key("key-test")
        .domain("mg.example.com")
        .base_url(format!("{}/v3", mock_server.uri()))
        .build()
        .unwrap();
    let client = Client::builder()
        .config(config)
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = client.get_list_by_address(LIST).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/lists/{}", LIST)))
        .and(header("user-agent", "lists-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": list_json()})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config::builder()
        .api_key("key-test")
        .domain("mg.example.com")
        .base_url(format!("{}/v3", mock_server.uri()))
        .build()
        .unwrap();
    let client = Client::builder()
        .config(config)
        .default_header("User-Agent", "lists-test/1.0")
        .unwrap()
        .build()
        .unwrap();

    let list = client.get_list_by_address(LIST).await.unwrap();
    assert_eq!(list.address, LIST);
}

#[tokio::test]
async fn test_get_all_members_follows_continuation_urls() {
    let mock_server = MockServer::start().await;
    let members_path = format!("/v3/lists/{}/members", LIST);
    let next = format!(
        "{}{}/pages?page=next&address=b%40example.com&limit=2",
        mock_server.uri(),
        members_path
    );

    Mock::given(method("GET"))
        .and(path(members_path.clone()))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "items": [{"address": "a@example.com"}, {"address": "b@example.com"}],
            "paging": {"next": next}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/pages", members_path)))
        .and(query_param("page", "next"))
        .and(query_param("address", "b@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "items": [{"address": "c@example.com", "subscribed": false}],
            "paging": {"next": next}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let members = client
        .get_all_members(LIST, SubscriptionFilter::All)
        .await
        .unwrap();

    let addresses: Vec<&str> = members.iter().map(|m| m.address.as_str()).collect();
    assert_eq!(addresses, ["a@example.com", "b@example.com", "c@example.com"]);
    assert!(members[0].subscribed);
    assert!(!members[2].subscribed);
}

#[tokio::test]
async fn test_continuation_to_another_host_is_not_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "items": [list_json()],
            "paging": {"next": "https://elsewhere.example.com/v3/lists/pages?page=next"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_all_lists(None).await.unwrap_err();

    assert!(matches!(err, Error::Validation { status: None, .. }));
}

#[tokio::test]
async fn test_malformed_list_address_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": list_json()})))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "removed"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    for address in ["", ".", "..", "not-an-address"] {
        let err = client.delete_list(address).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "delete {:?}", address);

        let err = client.get_list_by_address(address).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "get {:?}", address);

        let err = client
            .update_list(address, &ListUpdate::new().name("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "update {:?}", address);

        let err = client
            .get_members(address, PageRequest::default(), SubscriptionFilter::All)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "members {:?}", address);

        let err = client
            .get_member_by_address("joe@example.com", address)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "member {:?}", address);

        let err = client
            .create_member(false, address, &NewMember::new("joe@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "create {:?}", address);

        let err = client
            .create_member_list(None, address, &[MemberRecord::from("joe@example.com")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "bulk {:?}", address);

        let err = client.delete_member("joe@example.com", address).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "remove {:?}", address);
    }

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

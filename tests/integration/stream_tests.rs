//! Entity and change streams against a mock data hub.

use datahub::Client;
use datahub::auth::AuthConfig;
use datahub::client::{ChangesQuery, EntitiesQuery, QUERY_PATH, Query};
use futures::TryStreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{NAMESPACE, TestHub, entity_page};

/// With a page size of one, each record costs one fetch and the stream
/// ends on the first empty page.
#[tokio::test]
async fn test_page_size_one_walks_every_page() {
    let hub = TestHub::start().await;
    hub.mount_page("people", "entities", "from", None, &["1"], Some("c-1")).await;
    hub.mount_page("people", "entities", "from", Some("c-1"), &["2"], Some("c-2")).await;
    hub.mount_page("people", "entities", "from", Some("c-2"), &[], Some("c-2")).await;

    let client = Client::new(hub.uri()).expect("client should build");
    let mut stream = client
        .dataset("people")
        .entities_stream(EntitiesQuery::builder().limit(1).build())
        .await
        .expect("first page");

    let first = stream.next().await.expect("fetch").expect("entity-1");
    assert_eq!(first.id, "ns0:1");
    assert_eq!(stream.context().and_then(|c| c.namespace("ns0")), Some(NAMESPACE));

    let second = stream.next().await.expect("fetch").expect("entity-2");
    assert_eq!(second.id, "ns0:2");

    assert!(stream.next().await.expect("fetch").is_none());
    assert_eq!(stream.token().map(|t| t.value()), Some("c-2"));
    assert_eq!(stream.pages_fetched(), 3);
}

/// A change feed stream can be resumed from a stored cursor and tailed.
#[tokio::test]
async fn test_changes_resume_and_tail() {
    let hub = TestHub::start().await;
    hub.mount_page("people", "changes", "since", Some("stored"), &["7", "8"], Some("c-8")).await;
    Mock::given(method("GET"))
        .and(path("/datasets/people/changes"))
        .and(query_param("since", "c-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entity_page(&[], Some("c-8"))))
        .up_to_n_times(1)
        .mount(&hub.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/datasets/people/changes"))
        .and(query_param("since", "c-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entity_page(&["9"], Some("c-9"))))
        .mount(&hub.server)
        .await;

    let client = Client::new(hub.uri()).expect("client should build");
    let query = ChangesQuery::builder().since("stored").latest_only(true).build();
    let mut changes = client.dataset("people").changes_stream(query).await.expect("first page");

    let mut seen = Vec::new();
    while let Some(entity) = changes.next().await.expect("fetch") {
        seen.push(entity.id);
    }
    assert_eq!(seen, ["ns0:7", "ns0:8"]);
    assert_eq!(changes.token().map(|t| t.value()), Some("c-8"));

    // New changes arrive after the feed was drained.
    let next = changes.next().await.expect("fetch").expect("new change");
    assert_eq!(next.id, "ns0:9");
    assert_eq!(changes.token().map(|t| t.value()), Some("c-9"));
}

/// The stream adapts to `futures::Stream` for combinator use.
#[tokio::test]
async fn test_into_stream_collects_all() {
    let hub = TestHub::start().await;
    hub.mount_page("people", "entities", "from", None, &["a", "b"], Some("c-1")).await;
    hub.mount_page("people", "entities", "from", Some("c-1"), &["c"], Some("c-2")).await;
    hub.mount_page("people", "entities", "from", Some("c-2"), &[], None).await;

    let client = Client::new(hub.uri()).expect("client should build");
    let stream = client
        .dataset("people")
        .entities_stream(EntitiesQuery::default())
        .await
        .expect("first page");

    let ids: Vec<String> =
        stream.into_stream().map_ok(|e| e.id).try_collect().await.expect("all pages");
    assert_eq!(ids, ["ns0:a", "ns0:b", "ns0:c"]);
}

/// A failing page surfaces as an error from `next` without losing the
/// cursor.
#[tokio::test]
async fn test_server_error_mid_stream() {
    let hub = TestHub::start().await;
    hub.mount_page("people", "entities", "from", None, &["1"], Some("c-1")).await;
    Mock::given(method("GET"))
        .and(path("/datasets/people/entities"))
        .and(query_param("from", "c-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&hub.server)
        .await;

    let client = Client::new(hub.uri()).expect("client should build");
    let mut stream = client
        .dataset("people")
        .entities_stream(EntitiesQuery::default())
        .await
        .expect("first page");

    assert!(stream.next().await.expect("fetch").is_some());
    let err = stream.next().await.expect_err("second page fails");
    assert_eq!(err.kind(), datahub::ErrorKind::Request);
    assert_eq!(err.status(), Some(503));
    assert_eq!(stream.token().map(|t| t.value()), Some("c-1"));
}

/// A traversal query follows the server's continuations with the bearer
/// token attached to every page.
#[tokio::test]
async fn test_query_stream_follows_continuations() {
    let hub = TestHub::start().await;
    hub.mount_token("query-token", Some(3600), 1).await;
    let hop = |id: &str| json!(["ns0:alice", "ns0:knows", {"id": id, "refs": {}, "props": {}}]);
    let context = json!({"id": "@context", "namespaces": {"ns0": NAMESPACE}});

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer query-token"))
        .and(body_partial_json(json!({"continuations": ["k-1"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([context, [hop("ns0:carol")], []])),
        )
        .expect(1)
        .mount(&hub.server)
        .await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer query-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([context, [hop("ns0:bob")], ["k-1"]])),
        )
        .expect(1)
        .mount(&hub.server)
        .await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::basic("admin", "admin"))
        .build()
        .expect("client should build");
    let query = Query::builder()
        .starting_entities(vec!["ns0:alice".to_string()])
        .predicate("ns0:knows")
        .build();
    let stream = client.query_stream(query, None).await.expect("first page");

    let ids: Vec<String> =
        stream.into_stream().map_ok(|hop| hop.entity.id).try_collect().await.expect("all pages");
    assert_eq!(ids, ["ns0:bob", "ns0:carol"]);
}

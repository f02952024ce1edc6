//! Client registration through the security API.

use datahub::auth::{AuthConfig, KeyPair};
use datahub::client::{AccessControl, ClientInfo};
use datahub::{Client, ErrorKind};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::TestHub;

/// An admin registers a key, grants read access, and reads it back.
#[tokio::test]
async fn test_register_client_with_acl() {
    let hub = TestHub::start().await;
    hub.mount_token("admin-token", Some(3600), 1).await;

    let keys = KeyPair::generate_with_bits(1024).expect("key generation");
    let registered = ClientInfo {
        client_id: "sync-job".into(),
        public_key: Some(keys.public().to_pem().expect("export")),
        deleted: false,
    };
    let registered_json = serde_json::to_value(&registered).expect("encode");

    Mock::given(method("POST"))
        .and(path("/security/clients"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hub.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/security/clients/sync-job/acl"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hub.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/security/clients"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sync-job": registered_json})),
        )
        .mount(&hub.server)
        .await;

    let admin = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::basic("admin", "admin"))
        .build()
        .expect("client should build");
    let security = admin.security();

    security.add_client("sync-job", Some(keys.public())).await.expect("register");
    security
        .set_client_acl("sync-job", &[AccessControl::allow("/datasets/people*", "read")])
        .await
        .expect("acl");

    let clients = security.get_clients().await.expect("list");
    let stored = clients["sync-job"]
        .parsed_public_key()
        .expect("valid key")
        .expect("key present");
    assert_eq!(stored.modulus(), keys.public().modulus());
}

/// Server rejections surface as request errors carrying the status.
#[tokio::test]
async fn test_forbidden_registration() {
    let hub = TestHub::start().await;
    Mock::given(method("POST"))
        .and(path("/security/clients"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&hub.server)
        .await;

    let client = Client::new(hub.uri()).expect("client should build");
    let err = client.security().delete_client("sync-job").await.expect_err("forbidden");

    assert_eq!(err.kind(), ErrorKind::Request);
    assert_eq!(err.status(), Some(403));
    assert!(err.message().contains("delete client"));
}

//! Authentication flows against a mock data hub.

use std::{error::Error as _, sync::Arc, time::Duration};

use datahub::auth::{AuthConfig, AuthFailure, AuthStrategy, KeyPair, TOKEN_PATH, TokenState};
use datahub::testing::MockTokenSource;
use datahub::{Client, ErrorKind, NoExpiryPolicy, TokenConfig};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{SignedAssertion, TestHub, entity_page};

/// Basic credentials are exchanged once and the token is reused.
#[tokio::test]
async fn test_basic_auth_token_reused() {
    let hub = TestHub::start().await;
    hub.mount_token("basic-token", Some(3600), 1).await;
    Mock::given(method("GET"))
        .and(path("/datasets/people/entities"))
        .and(header("authorization", "Bearer basic-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entity_page(&["1"], None)))
        .expect(3)
        .mount(&hub.server)
        .await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::basic("admin", "admin"))
        .build()
        .expect("client should build");

    let people = client.dataset("people");
    for _ in 0..3 {
        people.entities(Default::default()).await.expect("entities should load");
    }
    assert_eq!(client.token_state(), TokenState::Authenticated);
}

/// Client credentials discover the token endpoint first.
#[tokio::test]
async fn test_client_credentials_uses_discovered_endpoint() {
    let hub = TestHub::start().await;
    hub.mount_discovery().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("svc", "s3cret"))
        .and(body_string_contains("audience=https%3A%2F%2Fdatahub"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "cc-token", "expires_in": 300})),
        )
        .expect(1)
        .mount(&hub.server)
        .await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::client_credentials(hub.uri(), "https://datahub", "svc", "s3cret"))
        .build()
        .expect("client should build");

    let token = client.authenticate().await.expect("should authenticate").expect("token issued");
    assert_eq!(token.access_token(), "cc-token");
    assert!(token.expiry().is_some());
}

/// A failed discovery surfaces as an authentication error with the cause
/// attached, and the domain request is never sent.
#[tokio::test]
async fn test_discovery_failure_aborts_request() {
    let hub = TestHub::start().await;
    Mock::given(method("GET"))
        .and(path("/datasets/people/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entity_page(&[], None)))
        .expect(0)
        .mount(&hub.server)
        .await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::client_credentials(hub.uri(), "aud", "svc", "s3cret"))
        .build()
        .expect("client should build");

    let err = client
        .dataset("people")
        .changes(Default::default())
        .await
        .expect_err("discovery is not served");

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.strategy(), Some(AuthStrategy::ClientCredentials));
    let failure = err.source().and_then(|s| s.downcast_ref::<AuthFailure>());
    assert!(matches!(failure, Some(AuthFailure::Discovery { .. })), "got {:?}", failure);
}

/// The public key JWT flow presents a verifiable assertion for a key the
/// hub has registered.
#[tokio::test]
async fn test_public_key_jwt_end_to_end() {
    let hub = TestHub::start().await;
    let keys = KeyPair::generate_with_bits(2048).expect("key generation");

    Mock::given(method("POST"))
        .and(path("/security/clients"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hub.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(SignedAssertion::new(keys.public(), "sync-job", "datahub-client-sdk").expect("matcher"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "jwt-token"})))
        .expect(1)
        .mount(&hub.server)
        .await;

    let admin = Client::new(hub.uri()).expect("admin client");
    admin
        .security()
        .add_client("sync-job", Some(keys.public()))
        .await
        .expect("client registration");

    let (private, _public) = keys.into_parts();
    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::public_key_jwt("sync-job", private))
        .build()
        .expect("client should build");

    let token = client.authenticate().await.expect("should authenticate").expect("token issued");
    assert_eq!(token.access_token(), "jwt-token");
    assert!(token.expiry().is_none());

    // Cached until invalidated by default.
    client.authenticate().await.expect("cached token");
}

/// Tokens without expiry are refetched on every request when configured.
#[tokio::test]
async fn test_always_reauthenticate_policy() {
    let hub = TestHub::start().await;
    hub.mount_token("no-expiry", None, 2).await;
    hub.mount_page("people", "entities", "from", None, &[], None).await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::basic("admin", "admin"))
        .token_config(
            TokenConfig::builder().no_expiry_policy(NoExpiryPolicy::AlwaysReauthenticate).build(),
        )
        .build()
        .expect("client should build");

    let people = client.dataset("people");
    people.entities(Default::default()).await.expect("first request");
    people.entities(Default::default()).await.expect("second request");
}

/// Concurrent requests from clones of one client share a single refresh.
#[tokio::test]
async fn test_concurrent_requests_single_refresh() {
    let hub = TestHub::start().await;
    hub.mount_page("people", "entities", "from", None, &["1"], None).await;

    let source = MockTokenSource::new()
        .with_strategy(AuthStrategy::Basic)
        .with_lifetime(chrono::Duration::hours(1))
        .with_delay(Duration::from_millis(50));
    let client = Client::builder()
        .url(hub.uri())
        .token_source(Arc::new(source.clone()))
        .build()
        .expect("client should build");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.dataset("people").entities(Default::default()).await
        }));
    }
    for handle in handles {
        handle.await.expect("task should not panic").expect("request should succeed");
    }

    assert_eq!(source.call_count(), 1);
    let requests = hub.server.received_requests().await.expect("recording enabled");
    assert!(requests.iter().all(|r| {
        r.headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer token-0")
    }));
}

/// Missing configuration is reported before any network traffic.
#[tokio::test]
async fn test_incomplete_config_fails_locally() {
    let hub = TestHub::start().await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::client_credentials("", "", "svc", ""))
        .build()
        .expect("client should build");

    let err = client.authenticate().await.expect_err("config is incomplete");
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.message().contains("authorizer_url"), "message: {}", err.message());
    assert_eq!(hub.hits(TOKEN_PATH).await.expect("recording enabled"), 0);
}

/// The interactive user flow is recognised but not supported.
#[tokio::test]
async fn test_user_flow_not_implemented() {
    let hub = TestHub::start().await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::user_flow(hub.uri(), "datahub"))
        .build()
        .expect("client should build");

    let err = client.dataset("people").entities(Default::default()).await.expect_err("no user flow");
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert_eq!(err.strategy(), Some(AuthStrategy::UserFlow));
    assert!(hub.server.received_requests().await.expect("recording enabled").is_empty());
}

/// A rejected grant clears the token, and the next request tries again.
#[tokio::test]
async fn test_rejected_grant_then_recovery() {
    let hub = TestHub::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .up_to_n_times(1)
        .mount(&hub.server)
        .await;
    hub.mount_token("second-try", Some(60), 1).await;
    hub.mount_page("people", "entities", "from", None, &[], None).await;

    let client = Client::builder()
        .url(hub.uri())
        .auth(AuthConfig::basic("admin", "admin"))
        .build()
        .expect("client should build");

    let err = client.authenticate().await.expect_err("first grant is rejected");
    let failure = err.source().and_then(|s| s.downcast_ref::<AuthFailure>());
    assert!(matches!(failure, Some(AuthFailure::Grant { status: 401, .. })));
    assert_eq!(client.token_state(), TokenState::Unauthenticated);

    client.dataset("people").entities(Default::default()).await.expect("second grant succeeds");
    assert_eq!(client.token().map(|t| t.access_token().to_string()).as_deref(), Some("second-try"));
}

//! Common test harness for data hub SDK integration tests.
//!
//! Provides a mock data hub and helpers to script its endpoints.

use std::sync::Once;

use anyhow::{Context, Result};
use datahub::auth::{
    AssertionClaims, JWT_BEARER_ASSERTION_TYPE, PublicKey, TOKEN_PATH, WELL_KNOWN_PATH,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Namespace prefix used by scripted entity pages.
pub const NAMESPACE: &str = "http://data.example.com/people/";

static TRACING: Once = Once::new();

/// Routes SDK logs to the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A mock data hub.
pub struct TestHub {
    pub server: MockServer,
}

impl TestHub {
    /// Starts a hub with nothing mounted.
    pub async fn start() -> Self {
        init_tracing();
        Self { server: MockServer::start().await }
    }

    /// Base URL of the hub.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Serves `access_token` from the token endpoint, optionally with a
    /// lifetime, and expects exactly `times` calls.
    pub async fn mount_token(&self, access_token: &str, expires_in: Option<i64>, times: u64) {
        let mut body = json!({"access_token": access_token, "token_type": "bearer"});
        if let Some(expires_in) = expires_in {
            body["expires_in"] = json!(expires_in);
        }
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Serves OIDC metadata whose token endpoint lives on this hub.
    pub async fn mount_discovery(&self) {
        Mock::given(method("GET"))
            .and(path(WELL_KNOWN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issuer": self.uri(),
                "token_endpoint": format!("{}/oauth/token", self.uri()),
            })))
            .mount(&self.server)
            .await;
    }

    /// Scripts one page of `endpoint` (`entities` or `changes`) for
    /// `dataset`, served when the request carries `cursor` in
    /// `cursor_param`.
    pub async fn mount_page(
        &self,
        dataset: &str,
        endpoint: &str,
        cursor_param: &str,
        cursor: Option<&str>,
        ids: &[&str],
        next: Option<&str>,
    ) {
        let mock = Mock::given(method("GET"))
            .and(path(format!("/datasets/{}/{}", dataset, endpoint)));
        let mock = match cursor {
            Some(cursor) => mock.and(query_param(cursor_param, cursor)),
            None => mock.and(query_param_is_missing(cursor_param)),
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_json(entity_page(ids, next)))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the hub received on `request_path`.
    pub async fn hits(&self, request_path: &str) -> Result<usize> {
        let requests =
            self.server.received_requests().await.context("request recording is disabled")?;
        Ok(requests.iter().filter(|r| r.url.path() == request_path).count())
    }
}

/// Builds an entity page body: context, entities, optional continuation.
pub fn entity_page(ids: &[&str], next: Option<&str>) -> Value {
    let mut body = vec![json!({"id": "@context", "namespaces": {"ns0": NAMESPACE}})];
    for id in ids {
        body.push(json!({
            "id": format!("ns0:{}", id),
            "recorded": 1_700_000_000_000_000_000u64,
            "deleted": false,
            "refs": {},
            "props": {"ns0:name": id}
        }));
    }
    if let Some(next) = next {
        body.push(json!({"id": "@continuation", "token": next}));
    }
    Value::Array(body)
}

/// Matches token requests carrying a client assertion that verifies against
/// `public_key` and names `client_id` as subject.
pub struct SignedAssertion {
    decoding_key: DecodingKey,
    client_id: String,
    audience: String,
}

impl SignedAssertion {
    pub fn new(public_key: &PublicKey, client_id: &str, audience: &str) -> Result<Self> {
        let pem = public_key.to_pem()?;
        Ok(Self {
            decoding_key: DecodingKey::from_rsa_pem(pem.as_bytes())
                .context("public key is not RSA PEM")?,
            client_id: client_id.to_string(),
            audience: audience.to_string(),
        })
    }
}

impl Match for SignedAssertion {
    fn matches(&self, request: &Request) -> bool {
        let form: Vec<(String, String)> = url::form_urlencoded::parse(&request.body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let field = |name: &str| form.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());

        if field("client_assertion_type") != Some(JWT_BEARER_ASSERTION_TYPE) {
            return false;
        }
        let Some(assertion) = field("client_assertion") else {
            return false;
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        match decode::<AssertionClaims>(assertion, &self.decoding_key, &validation) {
            Ok(data) => data.claims.sub == self.client_id,
            Err(_) => false,
        }
    }
}

//! Signed JWT client assertions for the JWT-bearer grant.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::PrivateKey;
use crate::Error;

/// `client_assertion_type` value sent alongside the assertion.
pub const JWT_BEARER_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Seconds an assertion is accepted by the token endpoint.
pub const ASSERTION_LIFETIME_SECS: i64 = 60;

/// Registered claims carried by a client assertion.
///
/// Only the minimal set is emitted: no `iat`, `nbf`, `iss` or custom claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Unique identifier, fresh for every assertion.
    pub jti: String,
    /// The client ID.
    pub sub: String,
    /// The token endpoint audience.
    pub aud: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// A short-lived RS256 client assertion.
///
/// ```rust,ignore
/// use datahub::auth::{ClientAssertion, KeyPair};
///
/// let pair = KeyPair::generate()?;
/// let jwt = ClientAssertion::new("my-client", "datahub-client-sdk").sign(pair.private())?;
/// assert_eq!(jwt.split('.').count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ClientAssertion {
    claims: AssertionClaims,
}

impl ClientAssertion {
    /// Creates assertion claims for `subject` and `audience`, expiring one
    /// minute from now.
    pub fn new(subject: impl Into<String>, audience: impl Into<String>) -> Self {
        Self::issued_at(subject, audience, Utc::now())
    }

    /// Creates assertion claims as if issued at `now`.
    pub fn issued_at(
        subject: impl Into<String>,
        audience: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            claims: AssertionClaims {
                jti: uuid::Uuid::new_v4().to_string(),
                sub: subject.into(),
                aud: audience.into(),
                exp: now.timestamp().saturating_add(ASSERTION_LIFETIME_SECS),
            },
        }
    }

    /// Returns the claims that will be signed.
    pub fn claims(&self) -> &AssertionClaims {
        &self.claims
    }

    /// Serializes and signs the assertion, returning a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns a parameter error if the key cannot be exported or the claims
    /// fail to sign.
    pub fn sign(&self, key: &PrivateKey) -> Result<String, Error> {
        let der = key.to_pkcs1_der()?;
        let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &self.claims, &encoding_key)
            .map_err(|e| Error::parameter("unable to sign client assertion").with_source(e))
    }
}

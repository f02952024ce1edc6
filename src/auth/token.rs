//! Bearer tokens and token endpoint responses.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// A bearer token with an optional expiry.
///
/// A token without an expiry stays valid until it is replaced or the cache
/// is invalidated.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Creates a token that never expires.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), expiry: None }
    }

    /// Sets the expiry instant.
    #[must_use]
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Sets the expiry to `expires_in` seconds after `now`.
    ///
    /// A lifetime past the representable date range leaves the token without
    /// an expiry; a negative one that far out expires it at `now`.
    #[must_use]
    pub fn expiring_in(self, expires_in: i64, now: DateTime<Utc>) -> Self {
        let expiry = Duration::try_seconds(expires_in).and_then(|d| now.checked_add_signed(d));
        match expiry {
            Some(expiry) => self.with_expiry(expiry),
            None if expires_in < 0 => self.with_expiry(now),
            None => self,
        }
    }

    /// The raw access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The expiry instant, if the token has one.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Returns `true` if the token is usable right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Returns `true` if the token is non-empty and not expired at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.expiry.is_none_or(|expiry| now < expiry)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Successful token endpoint body.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// The issued token.
    pub access_token: String,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Converts the response into a [`Token`], honouring `expires_in`.
    pub fn into_token(self, now: DateTime<Utc>) -> Token {
        let token = Token::new(self.access_token);
        match self.expires_in {
            Some(secs) => token.expiring_in(secs, now),
            None => token,
        }
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

//! Strategy dispatch from [`AuthConfig`] to a bearer [`Token`].

use chrono::Utc;

use super::assertion::{ClientAssertion, JWT_BEARER_ASSERTION_TYPE};
use super::config::{BasicAuth, ClientCredentialsAuth, PublicKeyJwtAuth};
use super::discovery::discover;
use super::token::{Token, TokenResponse};
use super::{AuthConfig, AuthStrategy, TokenFuture, TokenSource};
use crate::Error;

/// Path of the data hub's own token endpoint.
pub const TOKEN_PATH: &str = "/security/token";

/// Root cause of an authentication failure.
///
/// Attached as the `source()` of an [`ErrorKind::Authentication`] error.
///
/// [`ErrorKind::Authentication`]: crate::ErrorKind::Authentication
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthFailure {
    /// The OpenID provider metadata could not be fetched or decoded.
    #[error("discovery at {url} failed: {reason}")]
    Discovery {
        /// Metadata URL.
        url: String,
        /// What went wrong.
        reason: String,
        /// Transport or decoding error, when there was one.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The token endpoint rejected the grant.
    #[error("token grant at {url} was rejected with HTTP {status}")]
    Grant {
        /// Token endpoint.
        url: String,
        /// Response status.
        status: u16,
        /// Response body as returned by the server.
        body: String,
    },

    /// The token endpoint could not be reached.
    #[error("token endpoint {url} is unreachable")]
    Network {
        /// Token endpoint.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The token endpoint answered 2xx with a body that is not a token.
    #[error("token endpoint {url} returned an invalid body")]
    InvalidResponse {
        /// Token endpoint.
        url: String,
        /// Decoding error.
        #[source]
        source: reqwest::Error,
    },

    /// The client assertion could not be signed.
    #[error("unable to build client assertion")]
    Assertion(#[source] Error),
}

/// Turns the configured strategy into a bearer token.
///
/// Holds no token state; see [`TokenCache`](super::TokenCache) for caching.
pub struct Authenticator {
    http: reqwest::Client,
    server_url: String,
    config: AuthConfig,
}

impl Authenticator {
    /// Creates an authenticator for the data hub at `server_url`.
    ///
    /// `server_url` is the fallback authorizer for the Basic and public key
    /// JWT strategies.
    pub fn new(http: reqwest::Client, server_url: impl Into<String>, config: AuthConfig) -> Self {
        Self { http, server_url: server_url.into(), config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Returns the active strategy.
    pub fn strategy(&self) -> AuthStrategy {
        self.config.strategy()
    }

    /// Obtains a fresh token.
    ///
    /// Returns `Ok(None)` for [`AuthConfig::None`].
    ///
    /// # Errors
    ///
    /// - `Configuration` if a required field is missing (no I/O happens)
    /// - `NotImplemented` for the user flow
    /// - `Authentication` for any failure talking to the token service, with
    ///   an [`AuthFailure`] as source
    pub async fn authenticate(&self) -> Result<Option<Token>, Error> {
        self.config.validate()?;

        let strategy = self.strategy();
        tracing::debug!(strategy = %strategy, "authenticating");

        let result = match &self.config {
            AuthConfig::None => return Ok(None),
            AuthConfig::Basic(config) => self.basic(config).await,
            AuthConfig::ClientCredentials(config) => self.client_credentials(config).await,
            AuthConfig::PublicKeyJwt(config) => self.public_key_jwt(config).await,
            AuthConfig::UserFlow(_) => {
                return Err(Error::not_implemented("user flow authentication is not supported")
                    .with_strategy(strategy));
            }
        };

        match result {
            Ok(token) => {
                tracing::debug!(strategy = %strategy, expiry = ?token.expiry(), "authenticated");
                Ok(Some(token))
            }
            Err(failure) => {
                tracing::warn!(strategy = %strategy, error = %failure, "authentication failed");
                Err(Error::authentication(
                    strategy,
                    format!("unable to authenticate using {}", strategy),
                )
                .with_source(failure))
            }
        }
    }

    fn authorizer<'a>(&'a self, configured: Option<&'a str>) -> &'a str {
        configured.unwrap_or(self.server_url.as_str()).trim_end_matches('/')
    }

    async fn basic(&self, config: &BasicAuth) -> Result<Token, AuthFailure> {
        let url = format!("{}{}", self.authorizer(config.authorizer_url.as_deref()), TOKEN_PATH);
        let request = self
            .http
            .post(&url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let response = self.request_token(request, &url).await?;
        Ok(response.into_token(Utc::now()))
    }

    async fn client_credentials(&self, config: &ClientCredentialsAuth) -> Result<Token, AuthFailure> {
        let metadata = discover(&self.http, &config.authorizer_url).await?;
        let url = metadata.token_endpoint;

        let request = self
            .http
            .post(&url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials"), ("audience", config.audience.as_str())]);

        let response = self.request_token(request, &url).await?;
        Ok(response.into_token(Utc::now()))
    }

    async fn public_key_jwt(&self, config: &PublicKeyJwtAuth) -> Result<Token, AuthFailure> {
        let url = format!("{}{}", self.authorizer(config.authorizer_url.as_deref()), TOKEN_PATH);
        let assertion = ClientAssertion::new(&config.client_id, &config.audience)
            .sign(&config.private_key)
            .map_err(AuthFailure::Assertion)?;

        let request = self.http.post(&url).form(&[
            ("grant_type", "client_credentials"),
            ("client_assertion_type", JWT_BEARER_ASSERTION_TYPE),
            ("client_assertion", assertion.as_str()),
        ]);

        // The endpoint reports no lifetime for this grant.
        let response = self.request_token(request, &url).await?;
        Ok(Token::new(response.access_token))
    }

    async fn request_token(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<TokenResponse, AuthFailure> {
        let response = request
            .send()
            .await
            .map_err(|source| AuthFailure::Network { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthFailure::Grant { url: url.to_string(), status: status.as_u16(), body });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|source| AuthFailure::InvalidResponse { url: url.to_string(), source })
    }
}

impl TokenSource for Authenticator {
    fn fetch_token(&self) -> TokenFuture<'_> {
        Box::pin(self.authenticate())
    }

    fn strategy(&self) -> AuthStrategy {
        self.config.strategy()
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("server_url", &self.server_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

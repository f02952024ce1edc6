//! Authentication strategy configuration.

use std::fmt;

use super::PrivateKey;
use crate::Error;

/// Audience used by [`PublicKeyJwtAuth`] when none is given.
pub const DEFAULT_AUDIENCE: &str = "datahub-client-sdk";

/// Names the authentication strategy of an [`AuthConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AuthStrategy {
    /// Requests are sent without a bearer token.
    None,
    /// Client id and secret exchanged at the data hub token endpoint.
    Basic,
    /// OAuth 2.0 client credentials grant against an OIDC provider.
    ClientCredentials,
    /// Client credentials grant authenticated with a signed JWT assertion.
    PublicKeyJwt,
    /// Interactive user login.
    UserFlow,
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthStrategy::None => "none",
            AuthStrategy::Basic => "basic",
            AuthStrategy::ClientCredentials => "client credentials",
            AuthStrategy::PublicKeyJwt => "public key JWT",
            AuthStrategy::UserFlow => "user flow",
        };
        f.write_str(name)
    }
}

/// Client id and secret posted to `{authorizer_url}/security/token`.
#[derive(Clone, Default)]
pub struct BasicAuth {
    /// The client id.
    pub client_id: String,
    /// The client secret.
    pub client_secret: String,
    /// Token service base URL. Falls back to the server URL when `None`.
    pub authorizer_url: Option<String>,
}

impl BasicAuth {
    /// Sets an explicit authorizer URL.
    #[must_use]
    pub fn with_authorizer_url(mut self, url: impl Into<String>) -> Self {
        self.authorizer_url = Some(url.into());
        self
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("authorizer_url", &self.authorizer_url)
            .finish()
    }
}

/// OAuth 2.0 client credentials grant, with the token endpoint discovered
/// from the provider's OpenID configuration.
#[derive(Clone, Default)]
pub struct ClientCredentialsAuth {
    /// Identity provider base URL.
    pub authorizer_url: String,
    /// Audience requested for the token.
    pub audience: String,
    /// The client id.
    pub client_id: String,
    /// The client secret.
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentialsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsAuth")
            .field("authorizer_url", &self.authorizer_url)
            .field("audience", &self.audience)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Client credentials grant authenticated by an RS256 client assertion.
///
/// The public half of `private_key` must be registered with the data hub as
/// a security client under `client_id`.
pub struct PublicKeyJwtAuth {
    /// The client id, used as the assertion subject.
    pub client_id: String,
    /// Assertion audience.
    pub audience: String,
    /// Key used to sign assertions.
    pub private_key: PrivateKey,
    /// Token service base URL. Falls back to the server URL when `None`.
    pub authorizer_url: Option<String>,
}

impl PublicKeyJwtAuth {
    /// Creates a configuration with the default audience.
    pub fn new(client_id: impl Into<String>, private_key: PrivateKey) -> Self {
        Self {
            client_id: client_id.into(),
            audience: DEFAULT_AUDIENCE.to_string(),
            private_key,
            authorizer_url: None,
        }
    }

    /// Overrides the assertion audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Sets an explicit authorizer URL.
    #[must_use]
    pub fn with_authorizer_url(mut self, url: impl Into<String>) -> Self {
        self.authorizer_url = Some(url.into());
        self
    }
}

impl fmt::Debug for PublicKeyJwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyJwtAuth")
            .field("client_id", &self.client_id)
            .field("audience", &self.audience)
            .field("private_key", &"[REDACTED]")
            .field("authorizer_url", &self.authorizer_url)
            .finish()
    }
}

/// Interactive login settings.
#[derive(Debug, Clone, Default)]
pub struct UserFlowAuth {
    /// Identity provider base URL.
    pub authorizer_url: String,
    /// Audience requested for the token.
    pub audience: String,
}

/// How a client authenticates. Exactly one strategy is active.
///
/// ## Example
///
/// ```rust,ignore
/// use datahub::auth::{AuthConfig, KeyPair};
///
/// // Shared secret
/// let basic = AuthConfig::basic("my-client", "s3cret");
///
/// // OIDC client credentials
/// let oidc = AuthConfig::client_credentials(
///     "https://idp.example.com",
///     "https://api.example.com",
///     "my-client",
///     "s3cret",
/// );
///
/// // Signed assertion with a previously registered key
/// let pair = KeyPair::load("/etc/datahub/keys")?;
/// let (private, _) = pair.into_parts();
/// let jwt = AuthConfig::public_key_jwt("my-client", private);
/// ```
#[derive(Debug, Default)]
pub enum AuthConfig {
    /// No authentication.
    #[default]
    None,
    /// See [`BasicAuth`].
    Basic(BasicAuth),
    /// See [`ClientCredentialsAuth`].
    ClientCredentials(ClientCredentialsAuth),
    /// See [`PublicKeyJwtAuth`].
    PublicKeyJwt(Box<PublicKeyJwtAuth>),
    /// See [`UserFlowAuth`].
    UserFlow(UserFlowAuth),
}

impl AuthConfig {
    /// No authentication.
    pub fn none() -> Self {
        AuthConfig::None
    }

    /// Basic strategy against the server's own token endpoint.
    pub fn basic(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        AuthConfig::Basic(BasicAuth {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorizer_url: None,
        })
    }

    /// OIDC client credentials strategy.
    pub fn client_credentials(
        authorizer_url: impl Into<String>,
        audience: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        AuthConfig::ClientCredentials(ClientCredentialsAuth {
            authorizer_url: authorizer_url.into(),
            audience: audience.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Public key JWT strategy with the default audience.
    pub fn public_key_jwt(client_id: impl Into<String>, private_key: PrivateKey) -> Self {
        AuthConfig::PublicKeyJwt(Box::new(PublicKeyJwtAuth::new(client_id, private_key)))
    }

    /// Interactive user login.
    pub fn user_flow(authorizer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        AuthConfig::UserFlow(UserFlowAuth {
            authorizer_url: authorizer_url.into(),
            audience: audience.into(),
        })
    }

    /// Returns the active strategy.
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            AuthConfig::None => AuthStrategy::None,
            AuthConfig::Basic(_) => AuthStrategy::Basic,
            AuthConfig::ClientCredentials(_) => AuthStrategy::ClientCredentials,
            AuthConfig::PublicKeyJwt(_) => AuthStrategy::PublicKeyJwt,
            AuthConfig::UserFlow(_) => AuthStrategy::UserFlow,
        }
    }

    /// Checks that every field the strategy needs is present.
    ///
    /// Optional authorizer URLs are not required here; they fall back to the
    /// server URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error listing all missing fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        let mut require = |field: &'static str, value: &str| {
            if value.trim().is_empty() {
                missing.push(field);
            }
        };

        match self {
            AuthConfig::None => {}
            AuthConfig::Basic(c) => {
                require("client_id", &c.client_id);
                require("client_secret", &c.client_secret);
            }
            AuthConfig::ClientCredentials(c) => {
                require("authorizer_url", &c.authorizer_url);
                require("audience", &c.audience);
                require("client_id", &c.client_id);
                require("client_secret", &c.client_secret);
            }
            AuthConfig::PublicKeyJwt(c) => {
                require("client_id", &c.client_id);
                require("audience", &c.audience);
            }
            AuthConfig::UserFlow(c) => {
                require("authorizer_url", &c.authorizer_url);
                require("audience", &c.audience);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "{} authentication is missing {}",
                self.strategy(),
                missing.join(", ")
            ))
            .with_strategy(self.strategy()))
        }
    }
}

impl From<BasicAuth> for AuthConfig {
    fn from(config: BasicAuth) -> Self {
        AuthConfig::Basic(config)
    }
}

impl From<ClientCredentialsAuth> for AuthConfig {
    fn from(config: ClientCredentialsAuth) -> Self {
        AuthConfig::ClientCredentials(config)
    }
}

impl From<PublicKeyJwtAuth> for AuthConfig {
    fn from(config: PublicKeyJwtAuth) -> Self {
        AuthConfig::PublicKeyJwt(Box::new(config))
    }
}

impl From<UserFlowAuth> for AuthConfig {
    fn from(config: UserFlowAuth) -> Self {
        AuthConfig::UserFlow(config)
    }
}

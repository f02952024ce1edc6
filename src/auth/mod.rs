//! Authentication for the data hub SDK.
//!
//! A client authenticates with exactly one strategy, chosen by an
//! [`AuthConfig`]:
//!
//! | Strategy             | Token endpoint                               | Expiry        |
//! |----------------------|----------------------------------------------|---------------|
//! | `None`               | none                                         | n/a           |
//! | `Basic`              | `{authorizer}/security/token`, HTTP Basic    | `expires_in`  |
//! | `ClientCredentials`  | discovered from OpenID provider metadata     | `expires_in`  |
//! | `PublicKeyJwt`       | `{authorizer}/security/token`, RS256 assertion | none        |
//! | `UserFlow`           | not supported                                | n/a           |
//!
//! The [`Authenticator`] performs the exchange. The [`TokenCache`] keeps the
//! result and refreshes it lazily before the next request that needs it.
//!
//! ## Public Key JWT
//!
//! ```rust,ignore
//! use datahub::auth::{AuthConfig, KeyPair};
//! use datahub::Client;
//!
//! // Once: create a key pair and register the public half.
//! let pair = KeyPair::generate()?;
//! pair.save("/var/lib/my-app/keys")?;
//! admin_client.security().add_client("my-app", Some(pair.public())).await?;
//!
//! // Later: authenticate with the private half.
//! let (private, _) = KeyPair::load("/var/lib/my-app/keys")?.into_parts();
//! let client = Client::builder()
//!     .url("https://datahub.example.com")
//!     .auth(AuthConfig::public_key_jwt("my-app", private))
//!     .build()?;
//! ```

mod assertion;
mod authenticator;
mod cache;
mod config;
mod discovery;
mod keys;
mod provider;
mod token;

pub use assertion::{
    ASSERTION_LIFETIME_SECS, AssertionClaims, ClientAssertion, JWT_BEARER_ASSERTION_TYPE,
};
pub use authenticator::{AuthFailure, Authenticator, TOKEN_PATH};
pub use cache::{TokenCache, TokenState};
pub use config::{
    AuthConfig, AuthStrategy, BasicAuth, ClientCredentialsAuth, DEFAULT_AUDIENCE,
    PublicKeyJwtAuth, UserFlowAuth,
};
pub use discovery::{ProviderMetadata, WELL_KNOWN_PATH, discover, discovery_url};
pub use keys::{DEFAULT_KEY_BITS, KeyPair, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE, PrivateKey, PublicKey};
pub use provider::{StaticTokenSource, TokenFuture, TokenSource};
pub use token::{Token, TokenResponse};

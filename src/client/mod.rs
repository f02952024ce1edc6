//! Client types for connecting to a data hub.
//!
//! The SDK uses a hierarchical client structure:
//! - [`Client`]: Top-level client, owns the HTTP connection pool and token cache
//! - [`DatasetClient`]: Entity and change feeds of one dataset
//! - [`Client::query_stream`]: Graph traversal results
//! - [`SecurityClient`]: Registration of public-key clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datahub::prelude::*;
//!
//! let client = Client::builder()
//!     .url("https://datahub.example.com")
//!     .auth(AuthConfig::basic("admin", "admin"))
//!     .build()?;
//!
//! let mut people = client
//!     .dataset("people")
//!     .entities_stream(EntitiesQuery::default())
//!     .await?;
//! while let Some(entity) = people.next().await? {
//!     println!("{}", entity.id);
//! }
//! ```

mod builder;
mod datasets;
mod inner;
mod query;
mod security;

pub use builder::{ClientBuilder, HasUrl, NoUrl};
pub use datasets::{ChangesQuery, DatasetClient, DatasetFeed, EntitiesQuery};
pub use query::{QUERY_PATH, Query, QueryFeed};
pub use security::{AccessControl, ClientInfo, SecurityClient};

use std::sync::Arc;

use crate::Error;
use crate::auth::{AuthStrategy, Token, TokenState};

/// The data hub SDK client.
///
/// Create a client using [`Client::builder()`], then navigate to datasets
/// or the security API.
///
/// ## Thread Safety
///
/// `Client` is `Clone` and thread-safe. Clones share the connection pool and
/// the token cache, so concurrent requests trigger at most one
/// authentication.
///
/// ## Example
///
/// ```rust,ignore
/// use datahub::Client;
///
/// let client = Client::builder()
///     .url("https://datahub.example.com")
///     .auth(config)
///     .build()?;
///
/// let client2 = client.clone();
/// tokio::spawn(async move {
///     let page = client2.dataset("people").entities(Default::default()).await;
/// });
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<inner::ClientInner>,
}

impl Client {
    /// Creates a new client builder.
    ///
    /// The builder uses the typestate pattern to ensure the server URL is
    /// provided at compile time.
    pub fn builder() -> ClientBuilder<NoUrl> {
        ClientBuilder::new()
    }

    /// Creates an unauthenticated client for `url`.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        Self::builder().url(url).build()
    }

    /// Returns a dataset-scoped client.
    ///
    /// The name is validated when a request is made.
    pub fn dataset(&self, name: impl Into<String>) -> DatasetClient {
        DatasetClient::new(self.clone(), name.into())
    }

    /// Returns the security API client.
    pub fn security(&self) -> SecurityClient {
        SecurityClient::new(self.clone())
    }

    /// Returns the base URL of the client.
    pub fn url(&self) -> &str {
        self.inner.url.as_str()
    }

    /// Returns the configured authentication strategy.
    pub fn strategy(&self) -> AuthStrategy {
        self.inner.tokens.strategy()
    }

    /// Authenticates now unless a usable token is cached.
    ///
    /// Requests call this implicitly; calling it up front surfaces
    /// configuration and credential problems early.
    ///
    /// # Errors
    ///
    /// Returns the strategy's configuration or authentication error.
    pub async fn authenticate(&self) -> Result<Option<Token>, Error> {
        self.inner.tokens.ensure_valid().await
    }

    /// Returns the cached token, if any.
    pub fn token(&self) -> Option<Token> {
        self.inner.tokens.current()
    }

    /// Replaces the cached token.
    pub fn set_token(&self, token: Token) {
        self.inner.tokens.set(token);
    }

    /// Returns `true` if a cached token exists and has not expired.
    pub fn is_token_valid(&self) -> bool {
        self.inner.tokens.is_valid()
    }

    /// Drops the cached token so the next request authenticates again.
    pub fn invalidate_token(&self) {
        self.inner.tokens.invalidate();
    }

    /// Returns the token lifecycle state.
    pub fn token_state(&self) -> TokenState {
        self.inner.tokens.state()
    }

    pub(crate) fn from_inner(inner: inner::ClientInner) -> Self {
        Self { inner: Arc::new(inner) }
    }

    pub(crate) fn inner(&self) -> &inner::ClientInner {
        &self.inner
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.url.as_str())
            .field("strategy", &self.strategy())
            .finish_non_exhaustive()
    }
}

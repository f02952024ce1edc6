//! Client builder with typestate pattern.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use super::inner::ClientInner;
use crate::{
    Client, Error,
    auth::{AuthConfig, Authenticator, Token, TokenCache, TokenSource},
    config::{HttpConfig, TokenConfig},
};

/// SDK identifier sent in every User-Agent header.
const SDK_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Marker type: URL not yet provided.
pub struct NoUrl;

/// Marker type: URL has been provided.
pub struct HasUrl;

/// Builder for creating [`Client`] instances.
///
/// The server URL is required and enforced at compile time. Everything else
/// is optional; without [`auth`](Self::auth) the client sends requests
/// unauthenticated.
///
/// ## Example
///
/// ```rust,ignore
/// use datahub::{Client, HttpConfig, NoExpiryPolicy, TokenConfig};
/// use datahub::auth::AuthConfig;
/// use std::time::Duration;
///
/// let client = Client::builder()
///     .url("https://datahub.example.com")
///     .auth(AuthConfig::basic("admin", "admin"))
///     .token_config(
///         TokenConfig::builder()
///             .no_expiry_policy(NoExpiryPolicy::AlwaysReauthenticate)
///             .build(),
///     )
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub struct ClientBuilder<UrlState> {
    url: Option<String>,
    auth: AuthConfig,
    token_source: Option<Arc<dyn TokenSource>>,
    token: Option<Token>,
    token_config: TokenConfig,
    http_config: HttpConfig,
    _url_state: PhantomData<UrlState>,
}

impl ClientBuilder<NoUrl> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            url: None,
            auth: AuthConfig::None,
            token_source: None,
            token: None,
            token_config: TokenConfig::default(),
            http_config: HttpConfig::default(),
            _url_state: PhantomData,
        }
    }

    /// Sets the data hub server URL.
    pub fn url(self, url: impl Into<String>) -> ClientBuilder<HasUrl> {
        ClientBuilder {
            url: Some(url.into()),
            auth: self.auth,
            token_source: self.token_source,
            token: self.token,
            token_config: self.token_config,
            http_config: self.http_config,
            _url_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoUrl> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ClientBuilder<U> {
    /// Sets the authentication strategy. Replaces any earlier strategy or
    /// token source.
    #[must_use]
    pub fn auth(mut self, config: impl Into<AuthConfig>) -> Self {
        self.auth = config.into();
        self.token_source = None;
        self
    }

    /// Uses a custom token source instead of a built-in strategy.
    #[must_use]
    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    /// Seeds the cache with an existing token, e.g. one persisted from an
    /// earlier session. It is used for as long as it stays valid.
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the token cache configuration.
    #[must_use]
    pub fn token_config(mut self, config: TokenConfig) -> Self {
        self.token_config = config;
        self
    }

    /// Sets the HTTP configuration.
    #[must_use]
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = timeout;
        self
    }

    /// Prefixes the SDK User-Agent with an application identifier.
    #[must_use]
    pub fn user_agent(mut self, application: impl Into<String>) -> Self {
        self.http_config.user_agent = Some(application.into());
        self
    }
}

impl ClientBuilder<HasUrl> {
    /// Builds the client.
    ///
    /// No network calls are made; the first authenticated request triggers
    /// authentication.
    ///
    /// # Errors
    ///
    /// Returns a parameter error if the URL is empty or not an absolute
    /// http(s) URL, and a configuration error if the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<Client, Error> {
        let url = self.url.unwrap_or_default();
        if url.trim().is_empty() {
            return Err(Error::parameter("server url is required"));
        }
        let parsed = url::Url::parse(&url)
            .map_err(|e| Error::parameter("server url is not valid").with_source(e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::parameter(format!(
                "server url scheme must be http or https, got {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(self.http_config.timeout)
            .user_agent(agent_header(self.http_config.user_agent.as_deref()))
            .build()
            .map_err(|e| Error::configuration("unable to create HTTP client").with_source(e))?;

        let source = match self.token_source {
            Some(source) => source,
            None => Arc::new(Authenticator::new(
                http.clone(),
                parsed.as_str().trim_end_matches('/'),
                self.auth,
            )),
        };

        let tokens = TokenCache::new(source, self.token_config);
        if let Some(token) = self.token {
            tokens.set(token);
        }

        tracing::debug!(url = %parsed, strategy = %tokens.strategy(), "client created");

        Ok(Client::from_inner(ClientInner { url: parsed, http, tokens }))
    }
}

/// Builds the User-Agent value: the optional application identifier, then
/// the SDK, then the platform, e.g. `sync/2.0 datahub-client/0.1.0 (linux; x86_64)`.
fn agent_header(application: Option<&str>) -> String {
    let sdk = format!("{} ({}; {})", SDK_AGENT, std::env::consts::OS, std::env::consts::ARCH);
    match application.map(str::trim).filter(|a| !a.is_empty()) {
        Some(application) => format!("{} {}", application, sdk),
        None => sdk,
    }
}

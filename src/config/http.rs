//! HTTP transport configuration.

use std::time::Duration;

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the HTTP client shared by token and domain requests.
///
/// ## Example
///
/// ```rust
/// use datahub::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::builder()
///     .timeout(Duration::from_secs(5))
///     .user_agent("nightly-sync/1.4")
///     .build();
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct HttpConfig {
    /// Per-request timeout, including reading the body.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    /// Application identifier prepended to the SDK's `User-Agent`.
    #[builder(into)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

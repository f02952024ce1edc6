//! Token cache configuration.

use std::time::Duration;

/// What the token cache does with a token that carries no expiry.
///
/// The public key JWT grant never reports a lifetime, so whether such a
/// token is still usable is a deployment decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NoExpiryPolicy {
    /// Reuse the token until [`TokenCache::invalidate`] is called or a new
    /// token is set.
    ///
    /// [`TokenCache::invalidate`]: crate::auth::TokenCache::invalidate
    #[default]
    CacheUntilInvalidated,

    /// Authenticate again before every request.
    AlwaysReauthenticate,
}

/// Configuration for the client's token cache.
///
/// ## Example
///
/// ```rust
/// use datahub::{NoExpiryPolicy, TokenConfig};
/// use std::time::Duration;
///
/// // Treat tokens as expired 10 seconds early and never reuse
/// // tokens whose lifetime is unknown.
/// let config = TokenConfig::builder()
///     .expiry_leeway(Duration::from_secs(10))
///     .no_expiry_policy(NoExpiryPolicy::AlwaysReauthenticate)
///     .build();
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct TokenConfig {
    /// Handling of tokens without an expiry.
    #[builder(default)]
    pub no_expiry_policy: NoExpiryPolicy,

    /// Margin subtracted from a token's expiry before it is considered
    /// stale.
    #[builder(default = Duration::ZERO)]
    pub expiry_leeway: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TokenConfig {
    /// Returns the leeway as a chrono duration, saturating at its maximum.
    pub(crate) fn leeway(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.expiry_leeway).unwrap_or(chrono::Duration::MAX)
    }
}

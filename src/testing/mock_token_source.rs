//! MockTokenSource for testing token handling.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::Utc;

use crate::{
    Error,
    auth::{AuthStrategy, Token, TokenFuture, TokenSource},
};

/// A token source that issues numbered tokens and counts how often it is
/// asked.
///
/// Tokens are named `token-0`, `token-1`, and so on.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use datahub::Client;
/// use datahub::testing::MockTokenSource;
///
/// let source = MockTokenSource::new().with_delay(Duration::from_millis(10));
/// let client = Client::builder()
///     .url("http://localhost:8080")
///     .token_source(Arc::new(source.clone()))
///     .build()
///     .unwrap();
/// assert_eq!(source.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockTokenSource {
    calls: Arc<AtomicUsize>,
    strategy: AuthStrategy,
    lifetime: Option<chrono::Duration>,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl MockTokenSource {
    /// Creates a source issuing tokens that never expire.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            strategy: AuthStrategy::None,
            lifetime: None,
            delay: None,
            failure: None,
        }
    }

    /// Creates a source whose every fetch fails with an authentication
    /// error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::new() }
    }

    /// Reports `strategy` to the cache and in errors.
    #[must_use]
    pub fn with_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Issues tokens that expire `lifetime` after they are fetched.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: chrono::Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Waits before answering, so concurrent callers overlap.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of fetches started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for MockTokenSource {
    fn fetch_token(&self) -> TokenFuture<'_> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(message) = &self.failure {
                return Err(Error::authentication(self.strategy, message.clone()));
            }
            let token = Token::new(format!("token-{}", n));
            Ok(Some(match self.lifetime {
                Some(lifetime) => token.with_expiry(Utc::now() + lifetime),
                None => token,
            }))
        })
    }

    fn strategy(&self) -> AuthStrategy {
        self.strategy
    }
}

impl std::fmt::Debug for MockTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTokenSource")
            .field("strategy", &self.strategy)
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

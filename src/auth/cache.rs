//! Token cache with a single-flight refresh gate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{AuthStrategy, Token, TokenSource};
use crate::Error;
use crate::config::{NoExpiryPolicy, TokenConfig};

/// Lifecycle state of a [`TokenCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No token is held.
    Unauthenticated,
    /// A refresh is in flight.
    Authenticating,
    /// A usable token is held.
    Authenticated,
    /// The held token has expired.
    Expired,
}

/// Holds the current bearer token and refreshes it on demand.
///
/// Every authenticated request goes through [`ensure_valid`]. Concurrent
/// callers that find the token stale wait on one shared refresh instead of
/// each contacting the token service.
///
/// ```text
/// Unauthenticated ──ensure_valid──▶ Authenticating ──ok──▶ Authenticated
///        ▲                                │                     │
///        └────────────── error ───────────┘        expiry       ▼
///                                          Authenticating ◀── Expired
/// ```
///
/// [`ensure_valid`]: TokenCache::ensure_valid
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    config: TokenConfig,
    token: RwLock<Option<Token>>,
    refresh: tokio::sync::Mutex<()>,
    refreshes: AtomicU64,
}

impl TokenCache {
    /// Creates an empty cache backed by `source`.
    pub fn new(source: Arc<dyn TokenSource>, config: TokenConfig) -> Self {
        Self {
            source,
            config,
            token: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Returns the strategy of the underlying source.
    pub fn strategy(&self) -> AuthStrategy {
        self.source.strategy()
    }

    /// Returns a snapshot of the current token, valid or not.
    pub fn current(&self) -> Option<Token> {
        self.token.read().clone()
    }

    /// Returns `true` if [`ensure_valid`](Self::ensure_valid) would reuse the
    /// current token without contacting the source.
    pub fn is_valid(&self) -> bool {
        self.reusable().is_some()
    }

    /// Replaces the current token, e.g. with one persisted from an earlier
    /// session.
    pub fn set(&self, token: Token) {
        *self.token.write() = Some(token);
    }

    /// Drops the current token so the next request authenticates again.
    pub fn invalidate(&self) {
        tracing::debug!("token invalidated");
        *self.token.write() = None;
    }

    /// Number of tokens obtained from the source so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Acquire)
    }

    /// Reports the lifecycle state.
    pub fn state(&self) -> TokenState {
        if self.refresh.try_lock().is_err() {
            return TokenState::Authenticating;
        }
        match self.token.read().as_ref() {
            None => TokenState::Unauthenticated,
            Some(token) if self.is_fresh(token) => TokenState::Authenticated,
            Some(_) => TokenState::Expired,
        }
    }

    /// Returns a usable token, authenticating first if needed.
    ///
    /// `Ok(None)` means the source issues no tokens and requests go out
    /// without an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Propagates the source's error unchanged. The cache is left empty.
    pub async fn ensure_valid(&self) -> Result<Option<Token>, Error> {
        if let Some(token) = self.reusable() {
            tracing::trace!("token cache hit");
            return Ok(Some(token));
        }

        let observed = self.refresh_count();
        let _guard = self.refresh.lock().await;

        // Another caller may have refreshed while this one waited.
        if self.refresh_count() != observed {
            if let Some(token) = self.current().filter(|t| self.is_fresh(t)) {
                tracing::trace!("reusing concurrently refreshed token");
                return Ok(Some(token));
            }
        }
        if let Some(token) = self.reusable() {
            return Ok(Some(token));
        }

        tracing::debug!(strategy = %self.strategy(), "token cache miss, refreshing");
        match self.source.fetch_token().await {
            Ok(Some(token)) => {
                *self.token.write() = Some(token.clone());
                self.refreshes.fetch_add(1, Ordering::AcqRel);
                Ok(Some(token))
            }
            Ok(None) => Ok(self.current().filter(|t| self.is_fresh(t))),
            Err(err) => {
                *self.token.write() = None;
                Err(err)
            }
        }
    }

    fn is_fresh(&self, token: &Token) -> bool {
        // A leeway past the end of the calendar makes every expiring token stale.
        let deadline =
            Utc::now().checked_add_signed(self.config.leeway()).unwrap_or(DateTime::<Utc>::MAX_UTC);
        token.is_valid_at(deadline)
    }

    fn reusable(&self) -> Option<Token> {
        let guard = self.token.read();
        let token = guard.as_ref()?;
        if !self.is_fresh(token) {
            return None;
        }
        if token.expiry().is_none()
            && self.config.no_expiry_policy == NoExpiryPolicy::AlwaysReauthenticate
        {
            return None;
        }
        Some(token.clone())
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("strategy", &self.strategy())
            .field("config", &self.config)
            .field("token", &*self.token.read())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

//! Token source trait consumed by the token cache.

use std::{future::Future, pin::Pin, sync::Arc};

use super::{AuthStrategy, Token};
use crate::Error;

/// A type alias for the boxed future returned by token sources.
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Token>, Error>> + Send + 'a>>;

/// Something that can produce a fresh bearer token on demand.
///
/// [`Authenticator`](super::Authenticator) is the built-in implementation;
/// [`StaticTokenSource`] serves a fixed token. Custom sources can plug
/// externally managed tokens into the [`TokenCache`](super::TokenCache).
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn TokenSource>`.
///
/// ## Example: Environment Variable Source
///
/// ```rust
/// use datahub::auth::{Token, TokenFuture, TokenSource};
///
/// struct EnvTokenSource {
///     env_var: String,
/// }
///
/// impl TokenSource for EnvTokenSource {
///     fn fetch_token(&self) -> TokenFuture<'_> {
///         let env_var = self.env_var.clone();
///         Box::pin(async move {
///             std::env::var(&env_var)
///                 .map(|token| Some(Token::new(token)))
///                 .map_err(|_| datahub::Error::configuration(
///                     format!("environment variable {} not set", env_var)
///                 ))
///         })
///     }
/// }
/// ```
pub trait TokenSource: Send + Sync {
    /// Returns a future resolving to a new token.
    ///
    /// `Ok(None)` means the source does not issue tokens and requests go out
    /// unauthenticated.
    ///
    /// # Errors
    ///
    /// Return an error if the token cannot be obtained. The cache clears its
    /// current token and propagates the error.
    fn fetch_token(&self) -> TokenFuture<'_>;

    /// Strategy reported in logs and cache state.
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::None
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn fetch_token(&self) -> TokenFuture<'_> {
        (**self).fetch_token()
    }

    fn strategy(&self) -> AuthStrategy {
        (**self).strategy()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn fetch_token(&self) -> TokenFuture<'_> {
        (**self).fetch_token()
    }

    fn strategy(&self) -> AuthStrategy {
        (**self).strategy()
    }
}

/// A source that always returns the same token.
///
/// Useful for tests or for a long-lived token obtained out of band.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: Token,
}

impl StaticTokenSource {
    /// Creates a source for a token that never expires.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { token: Token::new(access_token) }
    }

    /// Creates a source from a prepared token.
    pub fn from_token(token: Token) -> Self {
        Self { token }
    }
}

impl TokenSource for StaticTokenSource {
    fn fetch_token(&self) -> TokenFuture<'_> {
        let token = self.token.clone();
        Box::pin(async move { Ok(Some(token)) })
    }
}

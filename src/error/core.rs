//! Main error type for the data hub SDK.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;
use crate::auth::AuthStrategy;

/// The primary error type for data hub SDK operations.
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── strategy: Option         (failing authentication strategy)
/// ├── status: Option           (HTTP status of a failed request)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use datahub::{Error, ErrorKind};
///
/// fn describe(err: &Error) -> String {
///     match err.kind() {
///         ErrorKind::Authentication => {
///             format!("login failed for {:?}: {}", err.strategy(), err)
///         }
///         ErrorKind::Request => match err.status() {
///             Some(status) => format!("server said {}", status),
///             None => "server unreachable".to_string(),
///         },
///         _ => err.to_string(),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    strategy: Option<AuthStrategy>,
    status: Option<u16>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datahub::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Parameter, "dataset name is required");
    /// assert_eq!(err.kind(), ErrorKind::Parameter);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            strategy: None,
            status: None,
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the authentication strategy that failed, if any.
    #[inline]
    pub fn strategy(&self) -> Option<AuthStrategy> {
        self.strategy
    }

    /// Returns the HTTP status code of a failed request, if one was received.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Sets the authentication strategy for this error.
    #[must_use]
    pub fn with_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the HTTP status code for this error.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a parameter error.
    pub fn parameter(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Parameter, message)
    }

    /// Creates an authentication error for the given strategy.
    pub fn authentication(
        strategy: AuthStrategy,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorKind::Authentication, message).with_strategy(strategy)
    }

    /// Creates a not-implemented error.
    pub fn not_implemented(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// Creates a request error.
    pub fn request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Request, message)
    }

    /// Creates a client processing error.
    pub fn client_processing(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ClientProcessing, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }

        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::parameter("invalid URL").with_source(err)
    }
}

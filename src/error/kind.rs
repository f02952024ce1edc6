//! Error kind enumeration for categorizing SDK errors.

/// Categorization of SDK errors.
///
/// The SDK never retries on its own, so every kind is surfaced to the
/// caller together with the underlying cause (see [`Error::source`]).
///
/// | ErrorKind          | Raised when                                       | I/O attempted |
/// |--------------------|---------------------------------------------------|---------------|
/// | `Configuration`    | Authentication strategy is missing a field        | No            |
/// | `Parameter`        | Bad argument, key file or directory               | No            |
/// | `Authentication`   | Token acquisition failed                          | Yes           |
/// | `NotImplemented`   | Strategy exists but is not supported yet          | No            |
/// | `Request`          | Non-2xx response or connectivity failure          | Yes           |
/// | `ClientProcessing` | Response could not be decoded                     | Yes           |
///
/// [`Error::source`]: std::error::Error::source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The authentication configuration is incomplete.
    ///
    /// The message names every missing field (`client_id`, `client_secret`,
    /// `authorizer_url`, `audience`).
    #[error("configuration error")]
    Configuration,

    /// A caller-supplied argument is invalid.
    ///
    /// Covers empty identifiers, unreadable key directories and malformed
    /// PEM documents.
    #[error("parameter error")]
    Parameter,

    /// A bearer token could not be obtained.
    ///
    /// The failing strategy is available through `Error::strategy()` and the
    /// root cause through `source()`.
    #[error("authentication error")]
    Authentication,

    /// The configured capability is not implemented.
    #[error("not implemented")]
    NotImplemented,

    /// The server answered with a non-success status or could not be reached.
    #[error("request error")]
    Request,

    /// The server response could not be decoded into the expected shape.
    #[error("client processing error")]
    ClientProcessing,
}

impl ErrorKind {
    /// Returns `true` if the error is raised before any network call.
    #[inline]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ErrorKind::Configuration | ErrorKind::Parameter | ErrorKind::NotImplemented
        )
    }
}

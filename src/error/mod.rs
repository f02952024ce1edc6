//! Error types for the data hub SDK.
//!
//! All fallible operations return [`Error`], categorized by [`ErrorKind`]:
//!
//! - caller misuse (`Configuration`, `Parameter`) fails before any I/O
//! - `Authentication` aborts the enclosing operation before the domain
//!   request is sent
//! - `Request` and `ClientProcessing` describe the domain call itself
//!
//! Nothing is retried. The original cause is always attached and reachable
//! through [`std::error::Error::source`]:
//!
//! ```rust,ignore
//! use std::error::Error as _;
//! use datahub::auth::AuthFailure;
//!
//! if let Err(e) = client.authenticate().await {
//!     let failure = e.source().and_then(|s| s.downcast_ref::<AuthFailure>());
//!     if let Some(AuthFailure::Discovery { .. }) = failure {
//!         eprintln!("identity provider metadata unavailable");
//!     }
//! }
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for data hub operations.
pub type Result<T> = std::result::Result<T, Error>;

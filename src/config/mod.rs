//! Configuration types for the data hub SDK.
//!
//! - [`TokenConfig`]: How cached tokens are judged and reused
//! - [`HttpConfig`]: Request timeout and user agent

mod http;
mod token;

pub use http::{DEFAULT_TIMEOUT, HttpConfig};
pub use token::{NoExpiryPolicy, TokenConfig};

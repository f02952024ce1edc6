//! # Data Hub Rust SDK
//!
//! Rust client for a data hub server: authentication, entity and change
//! feeds, and client registration.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datahub::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), datahub::Error> {
//!     let keys = KeyPair::load("./keys")?;
//!     let client = Client::builder()
//!         .url("https://datahub.example.com")
//!         .auth(PublicKeyJwtAuth::new("sync-job", keys.into_parts().0))
//!         .build()?;
//!
//!     let mut changes = client
//!         .dataset("people")
//!         .changes_stream(ChangesQuery::builder().limit(500).build())
//!         .await?;
//!     while let Some(entity) = changes.next().await? {
//!         println!("{} deleted={}", entity.id, entity.deleted);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Lazy authentication**: building a client does no I/O. The first
//!   request authenticates; later requests reuse the cached token until it
//!   expires.
//! - **Single flight**: concurrent requests on clones of one client share a
//!   single token refresh.
//! - **Streams own their cursor**: a [`RecordStream`](stream::RecordStream)
//!   hands out records one at a time and fetches the next page only when the
//!   current one is drained.
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod stream;
pub mod types;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use client::{Client, ClientBuilder};
pub use config::{HttpConfig, NoExpiryPolicy, TokenConfig};
pub use error::{Error, ErrorKind, Result};
pub use types::{Context, Continuation, Entity, EntityPage};

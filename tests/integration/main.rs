//! Integration tests for the data hub Rust SDK.
//!
//! Each test starts an in-process mock data hub (wiremock) that serves the
//! token, discovery, dataset and security endpoints, so no external
//! environment is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With SDK logs
//! RUST_LOG=datahub=debug cargo test --test integration -- --nocapture
//! ```

mod auth_tests;
mod common;
mod keys_tests;
mod security_tests;
mod stream_tests;

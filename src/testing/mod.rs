//! Testing utilities for code built on the SDK.
//!
//! - [`MockPages`]: a scripted [`PageFetcher`](crate::stream::PageFetcher)
//!   with call verification
//! - [`MockTokenSource`]: a [`TokenSource`](crate::auth::TokenSource) that
//!   counts fetches and can be made slow or failing
//!
//! ## Quick Start
//!
//! ```rust
//! use datahub::stream::Page;
//! use datahub::testing::MockPages;
//!
//! let pages = MockPages::new()
//!     .page(None, Page::new(vec!["a".to_string()]).with_continuation("c-1"))
//!     .page(Some("c-1"), Page::new(vec!["b".to_string()]).with_continuation("c-2"))
//!     .page(Some("c-2"), Page::empty().with_continuation("c-2"));
//! assert_eq!(pages.call_count(), 0);
//! ```

mod mock_pages;
mod mock_token_source;

pub use mock_pages::MockPages;
pub use mock_token_source::MockTokenSource;

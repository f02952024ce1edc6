//! Cursor-based streaming over paged results.
//!
//! A [`PageFetcher`] is the pure transition `(cursor) -> page`; a
//! [`RecordStream`] owns the fetcher, the current page and the latest
//! cursor, and hands out records one at a time.
//!
//! ```text
//! start(from) ──fetch(from)──▶ page 1 ──next()…──▶ exhausted
//!                                                     │
//!                              page 2 ◀──fetch(cursor)┘
//!                                ⋮
//!                              empty page ──▶ next() = None
//! ```
//!
//! Memory use is bounded by one page.

mod page;
mod record;

pub use page::{FnFetcher, Page, PageFetcher, PageFuture, from_fn};
pub use record::RecordStream;

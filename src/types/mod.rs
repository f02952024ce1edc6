//! Wire types for the data hub SDK.
//!
//! - [`Entity`] and [`EntityPage`]: entity graph records and their paged form
//! - [`Context`]: namespace prefixes for a page
//! - [`Continuation`]: opaque cursor for resuming a stream
//! - [`QueryResult`] and [`QueryPage`]: graph traversal results

mod context;
mod continuation;
mod entity;
mod query;

pub use context::Context;
pub use continuation::Continuation;
pub use entity::{CONTEXT_ID, CONTINUATION_ID, Entity, EntityPage};
pub use query::{QueryPage, QueryResult};

//! Pages and the fetch transition that produces them.

use std::future::Future;
use std::pin::Pin;

use crate::types::{Context, Continuation, Entity, EntityPage};
use crate::Error;

/// One batch of records as returned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in server order.
    pub items: Vec<T>,
    /// Cursor for the following page.
    pub continuation: Option<Continuation>,
    /// Metadata that applies to every record on the page.
    pub context: Option<Context>,
}

impl<T> Page<T> {
    /// Creates a page without a cursor or context.
    pub fn new(items: Vec<T>) -> Self {
        Self { items, continuation: None, context: None }
    }

    /// Creates a page with no records.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Sets the cursor.
    #[must_use]
    pub fn with_continuation(mut self, continuation: impl Into<Continuation>) -> Self {
        self.continuation = Some(continuation.into());
        self
    }

    /// Sets the context.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns `true` if the page has no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<EntityPage> for Page<Entity> {
    fn from(page: EntityPage) -> Self {
        Self {
            items: page.entities,
            continuation: page.continuation,
            context: (!page.context.is_empty()).then_some(page.context),
        }
    }
}

/// Boxed future returned by [`PageFetcher::fetch`].
pub type PageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Page<T>, Error>> + Send + 'a>>;

/// The `(cursor) -> page` transition behind a [`RecordStream`].
///
/// A fetcher binds everything except the cursor (dataset, page size,
/// direction). It holds no position of its own; the stream passes the cursor
/// in on every call.
///
/// [`RecordStream`]: super::RecordStream
pub trait PageFetcher: Send + Sync {
    /// Record type.
    type Item: Send;

    /// Fetches the page starting at `from`, or the first page for `None`.
    fn fetch(&self, from: Option<Continuation>) -> PageFuture<'_, Self::Item>;
}

impl<P: PageFetcher + ?Sized> PageFetcher for Box<P> {
    type Item = P::Item;

    fn fetch(&self, from: Option<Continuation>) -> PageFuture<'_, Self::Item> {
        (**self).fetch(from)
    }
}

/// A [`PageFetcher`] backed by a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnFetcher<F> {
    f: F,
}

/// Wraps a closure returning a page future as a [`PageFetcher`].
///
/// ```rust
/// use datahub::stream::{Page, from_fn};
///
/// let numbers = from_fn(|from| async move {
///     Ok(match from {
///         None => Page::new(vec![1, 2]).with_continuation("2"),
///         Some(_) => Page::empty(),
///     })
/// });
/// # let _ = numbers;
/// ```
pub fn from_fn<F, Fut, T>(f: F) -> FnFetcher<F>
where
    F: Fn(Option<Continuation>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>, Error>> + Send + 'static,
    T: Send,
{
    FnFetcher { f }
}

impl<F, Fut, T> PageFetcher for FnFetcher<F>
where
    F: Fn(Option<Continuation>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>, Error>> + Send + 'static,
    T: Send,
{
    type Item = T;

    fn fetch(&self, from: Option<Continuation>) -> PageFuture<'_, T> {
        Box::pin((self.f)(from))
    }
}

impl<F> std::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

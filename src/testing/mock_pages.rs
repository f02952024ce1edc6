//! MockPages for testing stream consumers.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    Error,
    stream::{Page, PageFetcher, PageFuture},
    types::Continuation,
};

/// A page fetcher that serves scripted pages keyed by the requested cursor.
///
/// Every fetch is recorded. A cursor with no scripted page yields a request
/// error, which is how a consumer that walks past the end shows up in tests.
///
/// ## Example
///
/// ```rust
/// use datahub::stream::Page;
/// use datahub::testing::MockPages;
///
/// let pages = MockPages::new()
///     .page(None, Page::new(vec![1, 2]).with_continuation("c-1"))
///     .page(Some("c-1"), Page::empty().with_continuation("c-1"));
///
/// // Run the stream under test, then:
/// // pages.verify();
/// ```
pub struct MockPages<T> {
    pages: Arc<Mutex<HashMap<Option<String>, Page<T>>>>,
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

impl<T> Clone for MockPages<T> {
    fn clone(&self) -> Self {
        Self { pages: Arc::clone(&self.pages), calls: Arc::clone(&self.calls) }
    }
}

impl<T: Clone + Send + 'static> MockPages<T> {
    /// Creates a fetcher with no pages.
    pub fn new() -> Self {
        Self { pages: Arc::new(Mutex::new(HashMap::new())), calls: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Serves `page` when the stream asks for `from`.
    ///
    /// Scripting the same cursor twice replaces the earlier page.
    #[must_use]
    pub fn page(self, from: Option<&str>, page: Page<T>) -> Self {
        self.pages.lock().insert(from.map(str::to_string), page);
        self
    }

    /// Asserts that every scripted cursor was fetched at least once.
    ///
    /// # Panics
    ///
    /// Panics if a scripted page was never requested.
    pub fn verify(&self) {
        let pages = self.pages.lock();
        let calls = self.calls.lock();
        for cursor in pages.keys() {
            assert!(calls.contains(cursor), "expected fetch from {:?} was never made", cursor);
        }
    }

    /// Returns the number of fetches made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the cursors fetched, in order.
    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().clone()
    }

    /// Clears recorded fetches, keeping the scripted pages.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn serve(&self, from: Option<Continuation>) -> Result<Page<T>, Error> {
        let key = from.map(Continuation::into_value);
        self.calls.lock().push(key.clone());
        self.pages.lock().get(&key).cloned().ok_or_else(|| {
            Error::request(format!("no page scripted for cursor {:?}", key)).with_status(404)
        })
    }
}

impl<T: Clone + Send + 'static> Default for MockPages<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> PageFetcher for MockPages<T> {
    type Item = T;

    fn fetch(&self, from: Option<Continuation>) -> PageFuture<'_, T> {
        let result = self.serve(from);
        Box::pin(async move { result })
    }
}

impl<T> std::fmt::Debug for MockPages<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPages")
            .field("pages", &self.pages.lock().len())
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

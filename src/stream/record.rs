//! Owned, forward-only iterator over paged records.

use futures::Stream;

use super::PageFetcher;
use crate::types::{Context, Continuation};
use crate::Error;

/// Lazily pages through a result set, holding one page at a time.
///
/// `next()` serves records from the current page and fetches the following
/// page when it runs out. An empty page means there is nothing more right
/// now: `next()` returns `Ok(None)`, and a later call asks the server again
/// from the same cursor, which lets a change feed be tailed.
///
/// ```rust,ignore
/// let query = EntitiesQuery::builder().limit(500).build();
/// let mut entities = client.dataset("people").entities_stream(query).await?;
/// println!("namespaces: {:?}", entities.context());
/// while let Some(entity) = entities.next().await? {
///     println!("{}", entity.id);
/// }
/// let resume_from = entities.token().cloned();
/// ```
pub struct RecordStream<F: PageFetcher> {
    fetcher: F,
    items: std::vec::IntoIter<F::Item>,
    continuation: Option<Continuation>,
    context: Option<Context>,
    fetched: u64,
}

impl<F: PageFetcher> RecordStream<F> {
    /// Fetches the first page from `from` (or the beginning) and positions
    /// the stream before its first record.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error.
    pub async fn start(fetcher: F, from: Option<Continuation>) -> Result<Self, Error> {
        let page = fetcher.fetch(from.clone()).await?;
        let mut stream = Self {
            fetcher,
            items: Vec::new().into_iter(),
            continuation: from,
            context: None,
            fetched: 1,
        };
        stream.replace(page);
        Ok(stream)
    }

    /// Returns the next record, fetching a new page if the current one is
    /// used up.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error. The cursor is left unchanged, so the
    /// call can be repeated.
    pub async fn next(&mut self) -> Result<Option<F::Item>, Error> {
        if let Some(item) = self.items.next() {
            return Ok(Some(item));
        }

        let page = self.fetcher.fetch(self.continuation.clone()).await?;
        self.fetched += 1;
        tracing::trace!(
            records = page.items.len(),
            pages = self.fetched,
            "fetched page"
        );
        self.replace(page);
        Ok(self.items.next())
    }

    /// The cursor of the most recent page. Hand it to a new stream to resume.
    pub fn token(&self) -> Option<&Continuation> {
        self.continuation.as_ref()
    }

    /// The context of the most recent page that carried one.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Number of pages fetched so far, including the first.
    pub fn pages_fetched(&self) -> u64 {
        self.fetched
    }

    /// Converts into a [`Stream`] that ends at the first empty page or
    /// error.
    pub fn into_stream(self) -> impl Stream<Item = Result<F::Item, Error>> + Send
    where
        F: 'static,
        F::Item: 'static,
    {
        futures::stream::unfold(Some(self), |state| async move {
            let mut stream = state?;
            match stream.next().await {
                Ok(Some(item)) => Some((Ok(item), Some(stream))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    fn replace(&mut self, page: super::Page<F::Item>) {
        self.items = page.items.into_iter();
        if let Some(continuation) = page.continuation {
            self.continuation = Some(continuation);
        }
        if let Some(context) = page.context {
            self.context = Some(context);
        }
    }
}

impl<F: PageFetcher> std::fmt::Debug for RecordStream<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("buffered", &self.items.len())
            .field("continuation", &self.continuation)
            .field("pages_fetched", &self.fetched)
            .finish_non_exhaustive()
    }
}

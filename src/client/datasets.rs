//! Dataset entity and change feeds.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::Error;
use crate::client::Client;
use crate::stream::{Page, PageFetcher, PageFuture, RecordStream};
use crate::types::{Context, Continuation, Entity, EntityPage};

/// Parameters for reading the current entities of a dataset.
///
/// ```rust
/// use datahub::client::EntitiesQuery;
///
/// let query = EntitiesQuery::builder().limit(100).reverse(true).build();
/// assert_eq!(query.limit, Some(100));
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct EntitiesQuery {
    /// Cursor to start from. `None` starts at the beginning.
    #[builder(into)]
    pub from: Option<Continuation>,
    /// Maximum number of entities per page.
    pub limit: Option<u32>,
    /// Read in reverse order.
    #[builder(default)]
    pub reverse: bool,
    /// Rewrite prefixed identifiers to full URIs.
    #[builder(default)]
    pub expand_uris: bool,
}

/// Parameters for reading the change log of a dataset.
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct ChangesQuery {
    /// Cursor to continue after. `None` starts at the first change.
    #[builder(into)]
    pub since: Option<Continuation>,
    /// Maximum number of changes per page.
    pub limit: Option<u32>,
    /// Only return the latest version of each entity.
    #[builder(default)]
    pub latest_only: bool,
    /// Read in reverse order.
    #[builder(default)]
    pub reverse: bool,
    /// Rewrite prefixed identifiers to full URIs.
    #[builder(default)]
    pub expand_uris: bool,
}

/// Which endpoint a [`DatasetFeed`] pages through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKind {
    Entities { limit: Option<u32>, reverse: bool },
    Changes { limit: Option<u32>, latest_only: bool, reverse: bool },
}

/// [`PageFetcher`] over a dataset's entities or changes.
#[derive(Debug, Clone)]
pub struct DatasetFeed {
    client: Client,
    dataset: String,
    kind: FeedKind,
    /// Set when identifiers are expanded. Holds the last non-empty context
    /// for pages that arrive without one.
    expansion: Option<Arc<Mutex<Context>>>,
}

impl DatasetFeed {
    /// The dataset this feed reads.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    async fn fetch_page(&self, from: Option<Continuation>) -> Result<EntityPage, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();
        let (endpoint, cursor_param, what) = match self.kind {
            FeedKind::Entities { limit, reverse } => {
                push_common(&mut params, limit, reverse);
                ("entities", "from", "get entities")
            }
            FeedKind::Changes { limit, latest_only, reverse } => {
                push_common(&mut params, limit, reverse);
                if latest_only {
                    params.push(("latestOnly", "true".to_string()));
                }
                ("changes", "since", "get changes")
            }
        };
        if let Some(cursor) = from {
            params.push((cursor_param, cursor.into_value()));
        }

        let path = format!("/datasets/{}/{}", urlencoding::encode(&self.dataset), endpoint);
        let body = self.client.inner().get_raw(&path, &params, what).await?;
        let mut page = EntityPage::from_json(&body)?;
        if let Some(expansion) = &self.expansion {
            let context = {
                let mut last = expansion.lock();
                if !page.context.is_empty() {
                    *last = page.context.clone();
                }
                last.clone()
            };
            for entity in &mut page.entities {
                entity.expand_uris(&context);
            }
        }
        Ok(page)
    }
}

fn push_common(params: &mut Vec<(&str, String)>, limit: Option<u32>, reverse: bool) {
    if let Some(limit) = limit.filter(|l| *l > 0) {
        params.push(("limit", limit.to_string()));
    }
    if reverse {
        params.push(("reverse", "true".to_string()));
    }
}

impl PageFetcher for DatasetFeed {
    type Item = Entity;

    fn fetch(&self, from: Option<Continuation>) -> PageFuture<'_, Entity> {
        Box::pin(async move { self.fetch_page(from).await.map(Page::from) })
    }
}

/// A dataset-scoped client.
///
/// ## Example
///
/// ```rust,ignore
/// use datahub::client::ChangesQuery;
///
/// let people = client.dataset("people");
/// let mut changes = people
///     .changes_stream(ChangesQuery::builder().limit(1000).build())
///     .await?;
/// while let Some(entity) = changes.next().await? {
///     println!("{} deleted={}", entity.id, entity.deleted);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetClient {
    client: Client,
    name: String,
}

impl DatasetClient {
    pub(crate) fn new(client: Client, name: String) -> Self {
        Self { client, name }
    }

    /// Returns the dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches one page of entities.
    ///
    /// # Errors
    ///
    /// - `Parameter` if the dataset name is empty
    /// - `Authentication` if no token could be obtained
    /// - `Request` on a non-2xx response or connection failure
    /// - `ClientProcessing` if the body is not an entity page
    pub async fn entities(&self, query: EntitiesQuery) -> Result<EntityPage, Error> {
        let feed = self.feed(entities_kind(&query), query.expand_uris)?;
        feed.fetch_page(query.from).await
    }

    /// Streams all entities, fetching the first page immediately.
    ///
    /// # Errors
    ///
    /// As [`entities`](Self::entities), for the first page.
    pub async fn entities_stream(
        &self,
        query: EntitiesQuery,
    ) -> Result<RecordStream<DatasetFeed>, Error> {
        let feed = self.feed(entities_kind(&query), query.expand_uris)?;
        RecordStream::start(feed, query.from).await
    }

    /// Fetches one page of changes.
    ///
    /// # Errors
    ///
    /// As [`entities`](Self::entities).
    pub async fn changes(&self, query: ChangesQuery) -> Result<EntityPage, Error> {
        let feed = self.feed(changes_kind(&query), query.expand_uris)?;
        feed.fetch_page(query.since).await
    }

    /// Streams changes. The stream can be polled again after it returns
    /// `None` to pick up changes made since.
    ///
    /// # Errors
    ///
    /// As [`entities`](Self::entities), for the first page.
    pub async fn changes_stream(
        &self,
        query: ChangesQuery,
    ) -> Result<RecordStream<DatasetFeed>, Error> {
        let feed = self.feed(changes_kind(&query), query.expand_uris)?;
        RecordStream::start(feed, query.since).await
    }

    fn feed(&self, kind: FeedKind, expand_uris: bool) -> Result<DatasetFeed, Error> {
        if self.name.trim().is_empty() {
            return Err(Error::parameter("dataset name is required"));
        }
        Ok(DatasetFeed {
            client: self.client.clone(),
            dataset: self.name.clone(),
            kind,
            expansion: expand_uris.then(Arc::default),
        })
    }
}

fn entities_kind(query: &EntitiesQuery) -> FeedKind {
    FeedKind::Entities { limit: query.limit, reverse: query.reverse }
}

fn changes_kind(query: &ChangesQuery) -> FeedKind {
    FeedKind::Changes {
        limit: query.limit,
        latest_only: query.latest_only,
        reverse: query.reverse,
    }
}

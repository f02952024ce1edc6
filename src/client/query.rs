//! Graph traversal queries.

use serde::Serialize;

use crate::Error;
use crate::client::Client;
use crate::stream::{Page, PageFetcher, PageFuture, RecordStream};
use crate::types::{Continuation, QueryPage, QueryResult};

/// Endpoint for traversal queries.
pub const QUERY_PATH: &str = "/query";

/// A traversal from a set of starting entities along a predicate.
///
/// ```rust
/// use datahub::client::Query;
///
/// let query = Query::builder()
///     .starting_entities(vec!["http://data.example.com/people/alice".to_string()])
///     .predicate("http://data.example.com/knows")
///     .limit(50)
///     .build();
/// assert_eq!(query.predicate, "http://data.example.com/knows");
/// ```
#[derive(Debug, Clone, Serialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Identifiers to start the traversal from.
    pub starting_entities: Vec<String>,
    /// Predicate to follow. `*` follows every predicate.
    #[builder(into, default = String::from("*"))]
    pub predicate: String,
    /// Follow references pointing at the starting entities instead.
    #[builder(default)]
    pub inverse: bool,
    /// Datasets to consider. Empty means all.
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<String>,
    /// Return full entities rather than references only.
    #[builder(default)]
    pub details: bool,
    /// Maximum number of results per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Keep the versions of an entity from different datasets apart.
    #[builder(default)]
    pub no_partial_merging: bool,
}

impl Query {
    fn validate(&self) -> Result<(), Error> {
        if self.starting_entities.iter().all(|id| id.trim().is_empty()) {
            return Err(Error::parameter("query requires at least one starting entity"));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct QueryBody<'a> {
    #[serde(flatten)]
    query: &'a Query,
    #[serde(skip_serializing_if = "is_first_page")]
    continuations: &'a [String],
}

fn is_first_page(continuations: &&[String]) -> bool {
    continuations.is_empty()
}

/// [`PageFetcher`] over the results of a [`Query`].
///
/// The server answers each page with a list of continuations. The feed
/// carries that list in a single [`Continuation`]; an empty list marks the
/// end of the traversal, after which the feed yields empty pages without
/// contacting the server.
#[derive(Debug, Clone)]
pub struct QueryFeed {
    client: Client,
    query: Query,
}

impl QueryFeed {
    /// The query this feed runs.
    pub fn query(&self) -> &Query {
        &self.query
    }

    async fn fetch_page(&self, continuations: &[String]) -> Result<QueryPage, Error> {
        let body = QueryBody { query: &self.query, continuations };
        let response = self.client.inner().post_raw(QUERY_PATH, &body, "run query").await?;
        QueryPage::from_json(&response)
    }
}

impl PageFetcher for QueryFeed {
    type Item = QueryResult;

    fn fetch(&self, from: Option<Continuation>) -> PageFuture<'_, QueryResult> {
        Box::pin(async move {
            let continuations = match from {
                None => Vec::new(),
                Some(cursor) => {
                    let continuations = decode_cursor(&cursor)?;
                    if continuations.is_empty() {
                        tracing::trace!("query exhausted");
                        return Ok(Page::empty());
                    }
                    continuations
                }
            };

            let page = self.fetch_page(&continuations).await?;
            let cursor = encode_cursor(&page.continuations)?;
            let mut next = Page::new(page.results).with_continuation(cursor);
            if !page.context.is_empty() {
                next = next.with_context(page.context);
            }
            Ok(next)
        })
    }
}

fn encode_cursor(continuations: &[String]) -> Result<Continuation, Error> {
    serde_json::to_string(continuations)
        .map(Continuation::new)
        .map_err(|e| Error::client_processing("unable to encode query continuations").with_source(e))
}

fn decode_cursor(cursor: &Continuation) -> Result<Vec<String>, Error> {
    serde_json::from_str(cursor.value())
        .map_err(|e| Error::parameter("not a query continuation").with_source(e))
}

impl Client {
    /// Runs a query and returns its first page.
    ///
    /// # Errors
    ///
    /// - `Parameter` if the query has no starting entities
    /// - `Authentication` if no token could be obtained
    /// - `Request` on a non-2xx response or connection failure
    /// - `ClientProcessing` if the body is not a query result page
    pub async fn query(&self, query: &Query) -> Result<QueryPage, Error> {
        query.validate()?;
        self.query_feed(query.clone()).fetch_page(&[]).await
    }

    /// Streams every result of a query, following the server's
    /// continuations. The first page is fetched immediately.
    ///
    /// Pass a stored [`RecordStream::token`] as `from` to resume.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query), for the first page. A `from` cursor not
    /// produced by a query stream is a `Parameter` error.
    pub async fn query_stream(
        &self,
        query: Query,
        from: Option<Continuation>,
    ) -> Result<RecordStream<QueryFeed>, Error> {
        query.validate()?;
        RecordStream::start(self.query_feed(query), from).await
    }

    fn query_feed(&self, query: Query) -> QueryFeed {
        QueryFeed { client: self.clone(), query }
    }
}

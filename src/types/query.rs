//! Query result pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Context, Entity};
use crate::Error;

/// One hop of a graph traversal: the starting entity, the predicate that
/// was followed, and the entity it led to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, String, Entity)", into = "(String, String, Entity)")]
pub struct QueryResult {
    /// Identifier of the starting entity.
    pub subject: String,
    /// The predicate followed from the subject.
    pub predicate: String,
    /// The related entity.
    pub entity: Entity,
}

impl From<(String, String, Entity)> for QueryResult {
    fn from((subject, predicate, entity): (String, String, Entity)) -> Self {
        Self { subject, predicate, entity }
    }
}

impl From<QueryResult> for (String, String, Entity) {
    fn from(result: QueryResult) -> Self {
        (result.subject, result.predicate, result.entity)
    }
}

/// One decoded page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    /// Namespaces for the ids on this page.
    pub context: Context,
    /// Traversal results in server order.
    pub results: Vec<QueryResult>,
    /// Server cursors to pass back for the next page. Empty once the
    /// traversal is exhausted.
    pub continuations: Vec<String>,
}

impl QueryPage {
    /// Decodes the `[context, results, continuations]` array returned by the
    /// query endpoint. The continuation element may be missing or `null`.
    ///
    /// # Errors
    ///
    /// Returns a client processing error if the body does not have that
    /// shape.
    pub fn from_json(body: &[u8]) -> Result<Self, Error> {
        let mut elements: Vec<Value> = serde_json::from_slice(body).map_err(|e| {
            Error::client_processing("query response is not a JSON array").with_source(e)
        })?;
        if elements.len() < 2 {
            return Err(Error::client_processing(format!(
                "query response has {} elements, expected context and results",
                elements.len()
            )));
        }

        let continuations = match elements.get_mut(2).map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                Error::client_processing("invalid query continuations").with_source(e)
            })?,
        };
        let results = serde_json::from_value(elements[1].take())
            .map_err(|e| Error::client_processing("invalid query results").with_source(e))?;
        let context = serde_json::from_value(elements[0].take())
            .map_err(|e| Error::client_processing("invalid query context").with_source(e))?;

        Ok(Self { context, results, continuations })
    }
}

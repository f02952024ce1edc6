//! Opaque paging cursor issued by the data hub.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Position in a dataset's entity or change sequence.
///
/// The value is produced by the server and replayed verbatim on the next
/// request. The SDK never inspects or constructs it.
///
/// ## Resuming
///
/// Persist the cursor of a stream and hand it back later to continue where
/// it stopped:
///
/// ```rust,ignore
/// let people = client.dataset("people");
/// let mut changes = people.changes_stream(ChangesQuery::default()).await?;
/// while let Some(entity) = changes.next().await? {
///     process(entity);
/// }
/// std::fs::write("cursor", changes.token().map(|c| c.value()).unwrap_or_default())?;
///
/// // next run
/// let since: Continuation = std::fs::read_to_string("cursor")?.parse()?;
/// let query = ChangesQuery::builder().since(since).build();
/// let mut changes = people.changes_stream(query).await?;
/// ```
///
/// On the wire the cursor is the `token` field of the trailing
/// `@continuation` object of a page:
///
/// ```rust
/// use datahub::Continuation;
///
/// let c: Continuation =
///     serde_json::from_str(r#"{"id": "@continuation", "token": "MTIz"}"#).unwrap();
/// assert_eq!(c.value(), "MTIz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Continuation {
    #[serde(rename = "token")]
    value: String,
}

impl Continuation {
    /// Wraps a cursor value.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the cursor and returns the raw value.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    /// Returns `true` if the value is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Continuation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::parameter("continuation token cannot be empty"));
        }
        Ok(Continuation::new(s))
    }
}

impl From<String> for Continuation {
    fn from(value: String) -> Self {
        Continuation::new(value)
    }
}

impl From<&str> for Continuation {
    fn from(value: &str) -> Self {
        Continuation::new(value)
    }
}

impl AsRef<str> for Continuation {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

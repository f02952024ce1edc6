//! Namespace context attached to entity pages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix to namespace URI mappings for the identifiers on a page.
///
/// Entity ids and property keys are usually prefixed (`ns3:alice`); the
/// context maps `ns3` to its expansion.
///
/// ```rust
/// use datahub::Context;
///
/// let ctx: Context = serde_json::from_str(
///     r#"{"id": "@context", "namespaces": {"ns0": "http://data.example.com/people/"}}"#,
/// ).unwrap();
/// assert_eq!(ctx.namespace("ns0"), Some("http://data.example.com/people/"));
/// assert_eq!(ctx.expand("ns0:alice").as_deref(), Some("http://data.example.com/people/alice"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    namespaces: BTreeMap<String, String>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prefix mapping.
    #[must_use]
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    /// Returns all prefix mappings.
    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    /// Looks up the URI for a prefix.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Expands a `prefix:local` identifier. Returns `None` if the prefix is
    /// unknown or the identifier has no prefix.
    pub fn expand(&self, prefixed: &str) -> Option<String> {
        let (prefix, local) = prefixed.split_once(':')?;
        self.namespace(prefix).map(|uri| format!("{}{}", uri, local))
    }

    /// Returns `true` if there are no mappings.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

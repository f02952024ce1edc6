//! Entity graph records and page decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Context, Continuation};
use crate::Error;

/// Id of the leading namespace object in an entity page.
pub const CONTEXT_ID: &str = "@context";

/// Id of the trailing cursor object in an entity page.
pub const CONTINUATION_ID: &str = "@continuation";

/// A single entity as stored in a dataset.
///
/// `references` and `props` keep whatever the server sent; values are raw
/// JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Prefixed identifier.
    pub id: String,
    /// Server timestamp of the stored version, in nanoseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded: Option<u64>,
    /// Whether this version marks the entity as deleted.
    #[serde(default)]
    pub deleted: bool,
    /// Relations to other entities, keyed by prefixed property name.
    #[serde(default, rename = "refs")]
    pub references: Map<String, Value>,
    /// Literal properties, keyed by prefixed property name.
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl Entity {
    /// Creates an entity with no references or properties.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Returns a property value.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Returns a reference value, either a string or an array of strings.
    pub fn reference(&self, key: &str) -> Option<&Value> {
        self.references.get(key)
    }

    /// Rewrites prefixed identifiers to full URIs using `context`.
    ///
    /// Covers the id, reference keys and targets, and property keys.
    /// Identifiers with an unknown prefix are left as they are.
    pub fn expand_uris(&mut self, context: &Context) {
        if let Some(id) = context.expand(&self.id) {
            self.id = id;
        }
        self.references = std::mem::take(&mut self.references)
            .into_iter()
            .map(|(key, value)| (expand_or_keep(key, context), expand_targets(value, context)))
            .collect();
        self.props = std::mem::take(&mut self.props)
            .into_iter()
            .map(|(key, value)| (expand_or_keep(key, context), value))
            .collect();
    }
}

fn expand_or_keep(prefixed: String, context: &Context) -> String {
    context.expand(&prefixed).unwrap_or(prefixed)
}

fn expand_targets(value: Value, context: &Context) -> Value {
    match value {
        Value::String(target) => Value::String(expand_or_keep(target, context)),
        Value::Array(targets) => {
            Value::Array(targets.into_iter().map(|t| expand_targets(t, context)).collect())
        }
        other => other,
    }
}

/// One decoded page of entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPage {
    /// Namespaces for the ids on this page.
    pub context: Context,
    /// Entities in server order.
    pub entities: Vec<Entity>,
    /// Cursor for the next page, if the server sent one.
    pub continuation: Option<Continuation>,
}

impl EntityPage {
    /// Decodes the entity graph JSON array returned by entity and change
    /// endpoints.
    ///
    /// The array holds an optional `@context` object, the entities, and an
    /// optional `@continuation` object. Those two special objects may appear
    /// anywhere in the array.
    ///
    /// # Errors
    ///
    /// Returns a client processing error if the body is not a JSON array or
    /// an element is not a valid entity.
    pub fn from_json(body: &[u8]) -> Result<Self, Error> {
        let elements: Vec<Value> = serde_json::from_slice(body).map_err(|e| {
            Error::client_processing("entity page is not a JSON array").with_source(e)
        })?;

        let mut page = EntityPage::default();
        for element in elements {
            match element.get("id").and_then(Value::as_str) {
                Some(CONTEXT_ID) => {
                    page.context = serde_json::from_value(element).map_err(|e| {
                        Error::client_processing("invalid @context object").with_source(e)
                    })?;
                }
                Some(CONTINUATION_ID) => {
                    page.continuation = Some(serde_json::from_value(element).map_err(|e| {
                        Error::client_processing("invalid @continuation object").with_source(e)
                    })?);
                }
                _ => {
                    let entity = serde_json::from_value(element).map_err(|e| {
                        Error::client_processing("invalid entity in page").with_source(e)
                    })?;
                    page.entities.push(entity);
                }
            }
        }
        Ok(page)
    }

    /// Expands every entity on the page with the page's own context.
    pub fn expand_uris(&mut self) {
        for entity in &mut self.entities {
            entity.expand_uris(&self.context);
        }
    }
}

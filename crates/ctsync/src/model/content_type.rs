//! Content type snapshots

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::field::Field;

/// System metadata of a content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    /// Identifier, unique within its store
    pub id: String,
    /// Revision token checked by the store on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Remaining metadata (`type`, `space`, timestamps, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An in-memory copy of a remote content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// System metadata
    pub sys: Sys,
    /// Display name
    pub name: String,
    /// Ordered field definitions
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Remaining attributes (`displayField`, `description`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentType {
    /// A new content type with the given fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            sys: Sys {
                id: id.into(),
                version: None,
                extra: Map::new(),
            },
            name: name.into(),
            fields,
            extra: Map::new(),
        }
    }

    /// Content type identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Revision token, if the store handed one out
    #[must_use]
    pub const fn version(&self) -> Option<u64> {
        self.sys.version
    }

    /// Look up a field by id
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Whether every field obeys `deleted => omitted`
    #[must_use]
    pub fn lifecycle_consistent(&self) -> bool {
        self.fields.iter().all(Field::is_consistent)
    }

    /// Body sent to the store on save: everything except system metadata
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be encoded as JSON.
    pub fn update_body(&self) -> serde_json::Result<Value> {
        let mut body = self.extra.clone();
        body.insert("name".to_string(), Value::String(self.name.clone()));
        body.insert("fields".to_string(), serde_json::to_value(&self.fields)?);
        Ok(Value::Object(body))
    }
}

//! Field definitions and their lifecycle flags

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Short text
    Symbol,
    /// Long text
    Text,
    /// Structured rich text
    RichText,
    /// Whole number
    Integer,
    /// Decimal number
    Number,
    /// Date and time
    Date,
    /// Boolean
    Boolean,
    /// Arbitrary JSON object
    Object,
    /// Geographic coordinates
    Location,
    /// Reference to an entry or asset
    Link,
    /// Reference to a resource in another space
    ResourceLink,
    /// List; element type is described by [`Items`]
    Array,
    /// Any type tag this tool does not know about
    Other(String),
}

impl FieldType {
    /// The wire name of this type
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Symbol => "Symbol",
            Self::Text => "Text",
            Self::RichText => "RichText",
            Self::Integer => "Integer",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Boolean => "Boolean",
            Self::Object => "Object",
            Self::Location => "Location",
            Self::Link => "Link",
            Self::ResourceLink => "ResourceLink",
            Self::Array => "Array",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Symbol" => Self::Symbol,
            "Text" => Self::Text,
            "RichText" => Self::RichText,
            "Integer" => Self::Integer,
            "Number" => Self::Number,
            "Date" => Self::Date,
            "Boolean" => Self::Boolean,
            "Object" => Self::Object,
            "Location" => Self::Location,
            "Link" => Self::Link,
            "ResourceLink" => Self::ResourceLink,
            "Array" => Self::Array,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element description of an `Array` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Items {
    /// Element type
    #[serde(rename = "type")]
    pub item_type: FieldType,
    /// Target kind when the elements are links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Validations and other attributes, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Items {
    /// Items of the given element type
    pub fn of(item_type: impl Into<FieldType>) -> Self {
        Self {
            item_type: item_type.into(),
            link_type: None,
            extra: Map::new(),
        }
    }
}

/// Where a field sits in the omit/delete lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Visible and editable
    Active,
    /// Hidden from delivery, staged for deletion
    Omitted,
    /// Marked for removal on the next publish
    Deleted,
}

/// A field definition within a content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Identifier, unique within its content type
    pub id: String,
    /// Display name
    pub name: String,
    /// Type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Element description for `Array` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    /// Staged for deletion
    #[serde(default)]
    pub omitted: bool,
    /// Marked for removal; only valid on an omitted field
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    /// Every other attribute (`required`, `validations`, `linkType`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Field {
    /// A new active field
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: field_type.into(),
            items: None,
            omitted: false,
            deleted: false,
            extra: Map::new(),
        }
    }

    /// A new active `Array` field with the given element type
    pub fn array(id: impl Into<String>, name: impl Into<String>, item_type: impl Into<FieldType>) -> Self {
        Self {
            items: Some(Items::of(item_type)),
            ..Self::new(id, name, FieldType::Array)
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> FieldState {
        if self.deleted {
            FieldState::Deleted
        } else if self.omitted {
            FieldState::Omitted
        } else {
            FieldState::Active
        }
    }

    /// Whether the lifecycle flags obey `deleted => omitted`
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !self.deleted || self.omitted
    }

    /// Element type of an `Array` field
    #[must_use]
    pub fn item_type(&self) -> Option<&FieldType> {
        self.items.as_ref().map(|items| &items.item_type)
    }

    /// Human readable type, e.g. `Array<Symbol>`
    #[must_use]
    pub fn type_description(&self) -> String {
        match (&self.field_type, self.item_type()) {
            (FieldType::Array, Some(item)) => format!("Array<{item}>"),
            (field_type, _) => field_type.to_string(),
        }
    }
}

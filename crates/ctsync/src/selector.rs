//! Store-qualified content type selectors
//!
//! A selector names one content type as `store/content-type-id`. When exactly
//! one store is configured the store part may be left out. Parsing happens
//! against the configured store names, before anything is fetched, so a
//! malformed selector aborts a command without touching the network.

mod resolver;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub use resolver::{ResolutionWarning, ResolvedContentType, TargetResolution, resolve_source, resolve_targets};

use crate::error::{Error, Result};

static SELECTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([A-Za-z0-9_]+)/)?([a-z0-9-]+)$").expect("selector pattern is valid"));

/// A parsed reference to one content type in one store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector {
    /// Store name
    pub store: String,
    /// Content type id within the store
    pub content_type_id: String,
}

impl Selector {
    /// Build a selector from its parts
    pub fn new(store: impl Into<String>, content_type_id: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            content_type_id: content_type_id.into(),
        }
    }

    /// Parse `store/content-type-id`, or a bare id when `stores` holds exactly one name
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] when the string does not match the
    /// grammar and [`Error::AmbiguousSelector`] for a bare id with zero or
    /// several stores in scope.
    pub fn parse<S: AsRef<str>>(input: &str, stores: &[S]) -> Result<Self> {
        let captures = SELECTOR_PATTERN
            .captures(input.trim())
            .ok_or_else(|| Error::InvalidSelector(input.to_string()))?;

        let content_type_id = captures[2].to_string();
        let store = match (captures.get(1), stores) {
            (Some(store), _) => store.as_str().to_string(),
            (None, [only]) => only.as_ref().to_string(),
            (None, _) => {
                return Err(Error::AmbiguousSelector {
                    selector: input.to_string(),
                    stores: stores.iter().map(|s| s.as_ref().to_string()).collect(),
                });
            }
        };

        Ok(Self {
            store,
            content_type_id,
        })
    }

    /// Parse several selectors, failing on the first malformed one
    ///
    /// # Errors
    ///
    /// See [`Selector::parse`].
    pub fn parse_all<S: AsRef<str>>(inputs: &[String], stores: &[S]) -> Result<Vec<Self>> {
        inputs.iter().map(|input| Self::parse(input, stores)).collect()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store, self.content_type_id)
    }
}

//! Space specifications of the form `[name:]space-id:access-token`

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static SPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([A-Za-z0-9_]+):)?([a-z0-9]+):([A-Za-z0-9_-]+)$").expect("space pattern is valid"));

/// Credentials and name of one space
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSpec {
    /// Name used in selectors; defaults to the space id
    pub name: String,
    /// Space id
    pub space_id: String,
    /// Content Management API token
    pub access_token: String,
}

impl StoreSpec {
    /// Parse `[name:]space-id:access-token`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStoreSpec`] when the input does not match.
    pub fn parse(input: &str) -> Result<Self> {
        let captures = SPACE_PATTERN
            .captures(input.trim())
            .ok_or_else(|| Error::InvalidStoreSpec(redact(input)))?;

        let space_id = captures[2].to_string();
        let name = captures
            .get(1)
            .map_or_else(|| space_id.clone(), |name| name.as_str().to_string());

        Ok(Self {
            name,
            space_id,
            access_token: captures[3].to_string(),
        })
    }

    /// Whether `input` is a well formed space specification
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        SPACE_PATTERN.is_match(input.trim())
    }
}

/// Hide everything after the last colon so tokens never reach logs
fn redact(input: &str) -> String {
    match input.rsplit_once(':') {
        Some((head, _)) => format!("{head}:***"),
        None => input.to_string(),
    }
}

impl fmt::Debug for StoreSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSpec")
            .field("name", &self.name)
            .field("space_id", &self.space_id)
            .field("access_token", &"***")
            .finish()
    }
}

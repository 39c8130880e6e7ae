//! Error types for the ctsync library

use thiserror::Error;

/// Fatal errors raised while resolving, merging, or persisting content types.
///
/// Skips and warnings are never errors; they travel as notices inside the
/// returned reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Selector string does not match `(store/)?content-type-id`
    #[error("invalid selector '{0}': expected [store/]content-type-id")]
    InvalidSelector(String),

    /// Unqualified selector while more than one store is in scope
    #[error("selector '{selector}' must name a store, one of: {}", stores.join(", "))]
    AmbiguousSelector {
        /// The offending selector
        selector: String,
        /// Store names in scope
        stores: Vec<String>,
    },

    /// Source selectors matched more than one content type
    #[error("expected exactly one source content type, found {}: {}", matches.len(), matches.join(", "))]
    MultipleSources {
        /// Qualified ids of every match
        matches: Vec<String>,
    },

    /// Source selector matched nothing
    #[error("could not find source content type {0}")]
    SourceNotFound(String),

    /// Requested field is absent on the source content type
    #[error("could not find field(s) {} in source content type {source_id}", fields.join(", "))]
    FieldNotFound {
        /// Missing field ids
        fields: Vec<String>,
        /// Source content type id
        source_id: String,
    },

    /// Space specification does not match `[name:]space-id:access-token`
    #[error("invalid space '{0}': expected [name:]space-id:access-token")]
    InvalidStoreSpec(String),

    /// Two stores configured under the same name
    #[error("store name '{0}' is configured more than once")]
    DuplicateStore(String),

    /// Connection to a store failed
    #[error("unable to reach store {store}: {message}")]
    Store {
        /// Store name
        store: String,
        /// Underlying failure
        message: String,
    },

    /// The store rejected a request
    #[error("store {store} rejected request ({status}): {message}")]
    Remote {
        /// Store name
        store: String,
        /// HTTP status code
        status: u16,
        /// Response body or summary
        message: String,
    },

    /// The user quit from an interactive prompt
    #[error("aborted by user")]
    Aborted,

    /// The interactive prompt could not read an answer
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for ctsync operations
pub type Result<T> = std::result::Result<T, Error>;

//! Store connectors
//!
//! A store is a named, authenticated handle on one remote collection of
//! content types. The sync engine only talks to stores through
//! [`ContentStore`]; everything network related lives behind it.

mod contentful;
mod memory;
mod spec;

use std::sync::Arc;

use async_trait::async_trait;

pub use contentful::{ContentfulSettings, ContentfulStore};
pub use memory::{MemoryStore, StoreCall};
pub use spec::StoreSpec;

use crate::error::{Error, Result};
use crate::model::ContentType;

/// Remote collection of content types
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Name used in selectors
    fn name(&self) -> &str;

    /// Fetch every content type in the store
    async fn content_types(&self) -> Result<Vec<ContentType>>;

    /// Persist a draft of the content type; returns the stored snapshot
    async fn save(&self, content_type: &ContentType) -> Result<ContentType>;

    /// Make the saved draft live; returns the published snapshot
    async fn publish(&self, content_type: &ContentType) -> Result<ContentType>;
}

/// Build one Contentful connector per space
///
/// # Errors
///
/// Returns [`Error::DuplicateStore`] when two specs share a name and
/// [`Error::Config`] when the HTTP client cannot be built.
pub fn connect_contentful(
    specs: &[StoreSpec],
    settings: &ContentfulSettings,
) -> Result<Vec<Arc<dyn ContentStore>>> {
    let mut stores: Vec<Arc<dyn ContentStore>> = Vec::with_capacity(specs.len());

    for spec in specs {
        if stores.iter().any(|store| store.name() == spec.name) {
            return Err(Error::DuplicateStore(spec.name.clone()));
        }
        stores.push(Arc::new(ContentfulStore::new(spec.clone(), settings)?));
    }

    Ok(stores)
}

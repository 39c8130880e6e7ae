//! In-memory snapshots of remote content types
//!
//! Snapshots are fetched once per run, mutated by the merge and lifecycle
//! logic, and handed back to a store for persistence. Attributes this tool
//! does not interpret are carried through untouched so a save never drops
//! remote data.

mod content_type;
mod field;

use std::collections::BTreeMap;

pub use content_type::{ContentType, Sys};
pub use field::{Field, FieldState, FieldType, Items};

/// Store name to the content types fetched from that store
pub type Catalog = BTreeMap<String, Vec<ContentType>>;

//! # ctsync
//!
//! Core library for synchronizing content type fields across Contentful spaces.
//!
//! The library resolves store-qualified content type selectors against a
//! fetched catalog, merges fields from a source content type into one or more
//! targets, and walks fields through the omit/delete lifecycle that the
//! remote store requires before a field can be removed.
//!
//! All decision logic is synchronous and works on in-memory snapshots. The
//! only suspension points are calls into a [`store::ContentStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod merge;
pub mod model;
pub mod selector;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use model::{Catalog, ContentType, Field, FieldState, FieldType, Items};
pub use selector::Selector;

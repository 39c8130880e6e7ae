//! In-memory store for tests and offline runs

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::ContentStore;
use crate::error::{Error, Result};
use crate::model::ContentType;

/// A persistence call received by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `save` of the content type with this id
    Save(String),
    /// `publish` of the content type with this id
    Publish(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    content_types: Vec<ContentType>,
    calls: Vec<StoreCall>,
    failing_saves: BTreeSet<String>,
    failing_publishes: BTreeSet<String>,
}

/// Store that keeps content types in memory
///
/// Saves and publishes check the revision token like the real service and
/// bump it on success. Individual content types can be made to fail.
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create a store holding the given content types, all at version 1
    pub fn new(name: impl Into<String>, content_types: Vec<ContentType>) -> Self {
        let content_types = content_types
            .into_iter()
            .map(|mut content_type| {
                content_type.sys.version.get_or_insert(1);
                content_type
            })
            .collect();

        Self {
            name: name.into(),
            state: Mutex::new(MemoryState {
                content_types,
                ..MemoryState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every save of `id` fail
    #[must_use]
    pub fn failing_save(self, id: &str) -> Self {
        self.state().failing_saves.insert(id.to_string());
        self
    }

    /// Make every publish of `id` fail
    #[must_use]
    pub fn failing_publish(self, id: &str) -> Self {
        self.state().failing_publishes.insert(id.to_string());
        self
    }

    /// Persistence calls received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Current stored copy of a content type
    #[must_use]
    pub fn content_type(&self, id: &str) -> Option<ContentType> {
        self.state()
            .content_types
            .iter()
            .find(|content_type| content_type.id() == id)
            .cloned()
    }

    fn rejected(&self, status: u16, message: String) -> Error {
        Error::Remote {
            store: self.name.clone(),
            status,
            message,
        }
    }

    fn check_version(&self, stored: &ContentType, incoming: &ContentType) -> Result<()> {
        if stored.version() == incoming.version() {
            Ok(())
        } else {
            Err(self.rejected(
                409,
                format!(
                    "version mismatch for {}: stored {:?}, sent {:?}",
                    stored.id(),
                    stored.version(),
                    incoming.version()
                ),
            ))
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn content_types(&self) -> Result<Vec<ContentType>> {
        Ok(self.state().content_types.clone())
    }

    async fn save(&self, content_type: &ContentType) -> Result<ContentType> {
        let mut state = self.state();
        state.calls.push(StoreCall::Save(content_type.id().to_string()));

        if state.failing_saves.contains(content_type.id()) {
            return Err(self.rejected(500, format!("save of {} failed", content_type.id())));
        }
        if !content_type.lifecycle_consistent() {
            return Err(self.rejected(422, format!("{} has deleted fields that are not omitted", content_type.id())));
        }

        let Some(stored) = state
            .content_types
            .iter_mut()
            .find(|stored| stored.id() == content_type.id())
        else {
            return Err(self.rejected(404, format!("content type {} not found", content_type.id())));
        };
        self.check_version(stored, content_type)?;

        let version = stored.version().unwrap_or(0) + 1;
        *stored = content_type.clone();
        stored.sys.version = Some(version);
        Ok(stored.clone())
    }

    async fn publish(&self, content_type: &ContentType) -> Result<ContentType> {
        let mut state = self.state();
        state.calls.push(StoreCall::Publish(content_type.id().to_string()));

        if state.failing_publishes.contains(content_type.id()) {
            return Err(self.rejected(500, format!("publish of {} failed", content_type.id())));
        }

        let Some(stored) = state
            .content_types
            .iter_mut()
            .find(|stored| stored.id() == content_type.id())
        else {
            return Err(self.rejected(404, format!("content type {} not found", content_type.id())));
        };
        self.check_version(stored, content_type)?;

        let version = stored.version().unwrap_or(0);
        stored
            .sys
            .extra
            .insert("publishedVersion".to_string(), Value::from(version));
        stored.sys.version = Some(version + 1);
        Ok(stored.clone())
    }
}

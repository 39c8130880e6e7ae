//! Persistence of changed content types

use std::time::Duration;

use tracing::info;

use crate::error::Result;
use crate::model::ContentType;
use crate::store::ContentStore;

/// Saves and publishes content types, strictly in that order
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistExecutor {
    dry_run: bool,
    pre_publish_delay: Duration,
}

impl PersistExecutor {
    /// Create a new executor
    #[must_use]
    pub const fn new(dry_run: bool, pre_publish_delay: Duration) -> Self {
        Self {
            dry_run,
            pre_publish_delay,
        }
    }

    /// Whether writes are only reported
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Pause between save and publish
    #[must_use]
    pub const fn pre_publish_delay(&self) -> Duration {
        self.pre_publish_delay
    }

    /// Save `content_type`, then publish it when asked
    ///
    /// Publish is only issued once the save has completed, using the
    /// revision token the save returned.
    ///
    /// # Errors
    ///
    /// Returns the store error of the failing call.
    pub async fn persist(
        &self,
        store: &dyn ContentStore,
        content_type: ContentType,
        publish: bool,
    ) -> Result<ContentType> {
        let target = format!("{}/{}", store.name(), content_type.id());

        if self.dry_run {
            info!("[DRY RUN] Would save content type {target}");
            if publish {
                info!("[DRY RUN] Would publish content type {target}");
            }
            return Ok(content_type);
        }

        info!("Updating content type {target} ({})", content_type.name);
        let saved = store.save(&content_type).await?;
        info!("COMPLETE: Updated content type {target}");

        if !publish {
            return Ok(saved);
        }

        if !self.pre_publish_delay.is_zero() {
            tokio::time::sleep(self.pre_publish_delay).await;
        }

        info!("Publishing content type {target}");
        let published = store.publish(&saved).await?;
        info!("COMPLETE: Published content type {target}");

        Ok(published)
    }
}

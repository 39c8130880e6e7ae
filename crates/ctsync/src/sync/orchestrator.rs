//! Sync orchestration - coordinates fetch, merge, and persist

use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use tracing::{debug, error, info, warn};

use super::executor::PersistExecutor;
use super::options::{CopyFieldsOptions, DeleteFieldsOptions, unique_field_ids};
use super::{Notice, SyncReport, TargetReport, TargetStatus};
use crate::error::{Error, Result};
use crate::lifecycle::{self, LifecycleNotice, Transition};
use crate::merge::{MergeOptions, OverwriteApprover, merge_fields};
use crate::model::{Catalog, ContentType, Field};
use crate::selector::{ResolvedContentType, resolve_source, resolve_targets};
use crate::store::ContentStore;

/// Main sync engine
pub struct SyncEngine {
    stores: BTreeMap<String, Arc<dyn ContentStore>>,
    executor: PersistExecutor,
    interrupted: Arc<AtomicBool>,
}

impl SyncEngine {
    /// Create an engine over the given stores
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStore`] when two stores share a name.
    pub fn new(stores: Vec<Arc<dyn ContentStore>>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for store in stores {
            let name = store.name().to_string();
            if by_name.contains_key(&name) {
                return Err(Error::DuplicateStore(name));
            }
            by_name.insert(name, store);
        }

        Ok(Self {
            stores: by_name,
            executor: PersistExecutor::default(),
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Only report the writes that would happen
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.executor = PersistExecutor::new(dry_run, self.executor.pre_publish_delay());
        self
    }

    /// Wait this long between a save and the publish that follows it
    #[must_use]
    pub fn with_pre_publish_delay(mut self, delay: Duration) -> Self {
        self.executor = PersistExecutor::new(self.executor.is_dry_run(), delay);
        self
    }

    /// Stop issuing new saves once `flag` is raised
    ///
    /// A target whose save was already issued still runs to completion,
    /// including its publish. Targets not yet saved fail with
    /// [`Error::Aborted`].
    #[must_use]
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = flag;
        self
    }

    /// Names of the connected stores, sorted
    #[must_use]
    pub fn store_names(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    /// Fetch the content types of every store
    ///
    /// # Errors
    ///
    /// Fails if any store cannot be listed.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let listings = try_join_all(self.stores.iter().map(|(name, store)| async move {
            info!("Fetching content types from store {name}");
            let content_types = store.content_types().await?;
            debug!("Store {name} holds {} content types", content_types.len());
            Ok::<_, Error>((name.clone(), content_types))
        }))
        .await?;

        Ok(listings.into_iter().collect())
    }

    /// Copy field definitions from one content type into others
    ///
    /// Every conflict is decided before the first write, so an aborting
    /// approver leaves all stores untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when the source does not resolve to exactly one
    /// content type, when a requested field is missing on it, or when the
    /// approver aborts. Failures of individual targets are reported, not
    /// returned.
    pub async fn copy_fields(
        &self,
        options: &CopyFieldsOptions,
        mut approver: Option<&mut dyn OverwriteApprover>,
    ) -> Result<SyncReport> {
        let field_ids = unique_field_ids(&options.fields);
        let catalog = self.fetch_catalog().await?;

        let source = resolve_source(slice::from_ref(&options.source), &catalog)?;
        let fields = extract_fields(&source, &field_ids)?;
        debug!("Copying {} field(s) from {}", fields.len(), source.qualified_id());

        let resolution = resolve_targets(&options.targets, &catalog);
        for warning in &resolution.warnings {
            warn!("{warning}");
        }

        let merge_options = MergeOptions {
            force: options.force,
        };

        let mut planned = Vec::with_capacity(resolution.targets.len());
        for target in resolution.targets {
            let mut report = TargetReport::new(target.qualified_id(), target.content_type);
            info!(
                "Adding fields {} to content type {}",
                field_ids.join(", "),
                report.target
            );

            let outcome = merge_fields(
                &report.content_type.fields,
                &fields,
                merge_options,
                approver
                    .as_mut()
                    .map(|approver| &mut **approver as &mut dyn OverwriteApprover),
            )?;

            for notice in &outcome.notices {
                warn!("{}: {notice}", report.target);
            }

            let changed = outcome.changed();
            if changed {
                report.content_type.fields = outcome.fields;
            } else {
                info!("Content type {} already up to date", report.target);
            }
            report.added = outcome.added;
            report.overwritten = outcome.overwritten;
            report.notices = outcome.notices.into_iter().map(Notice::Merge).collect();

            planned.push((target.store, report, changed));
        }

        let targets = join_all(planned.into_iter().map(|(store, report, changed)| async move {
            if changed {
                self.persist_target(&store, report, options.publish).await
            } else {
                report
            }
        }))
        .await;

        Ok(SyncReport {
            warnings: resolution.warnings,
            targets,
        })
    }

    /// Omit or delete fields on the target content types
    ///
    /// Without `force`, only fields that are already omitted are deleted.
    /// With `force`, active fields are omitted and published first, then
    /// deleted. Changed targets are always published.
    ///
    /// # Errors
    ///
    /// Fails only if the catalog cannot be fetched. Failures of individual
    /// targets are reported, not returned.
    pub async fn delete_fields(&self, options: &DeleteFieldsOptions) -> Result<SyncReport> {
        let field_ids = unique_field_ids(&options.fields);
        let catalog = self.fetch_catalog().await?;

        let resolution = resolve_targets(&options.targets, &catalog);
        for warning in &resolution.warnings {
            warn!("{warning}");
        }

        let targets = join_all(
            resolution
                .targets
                .into_iter()
                .map(|target| self.delete_from_target(target, &field_ids, options.force)),
        )
        .await;

        Ok(SyncReport {
            warnings: resolution.warnings,
            targets,
        })
    }

    async fn delete_from_target(
        &self,
        target: ResolvedContentType,
        field_ids: &[String],
        force: bool,
    ) -> TargetReport {
        let mut report = TargetReport::new(target.qualified_id(), target.content_type.clone());
        let mut content_type = target.content_type;

        if force {
            let Transition {
                content_type: omitted,
                changed,
                notices,
            } = lifecycle::omit(content_type, field_ids);
            record_notices(&mut report, notices);
            content_type = omitted;

            if !changed.is_empty() {
                info!(
                    "Omitting fields {} on content type {}",
                    changed.join(", "),
                    report.target
                );
                match self.persist(&target.store, content_type, true).await {
                    Ok(saved) => {
                        content_type = saved;
                        report.omitted = changed;
                        report.status = self.written_status(true);
                    }
                    Err(e) => return fail(report, &e),
                }
            }
        }

        let Transition {
            content_type,
            changed,
            notices,
        } = lifecycle::delete(content_type, field_ids);
        record_notices(&mut report, notices);

        if changed.is_empty() {
            report.content_type = content_type;
            return report;
        }

        info!(
            "Deleting fields {} from content type {}",
            changed.join(", "),
            report.target
        );
        match self.persist(&target.store, content_type, true).await {
            Ok(saved) => {
                report.content_type = saved;
                report.deleted = changed;
                report.status = self.written_status(true);
            }
            Err(e) => return fail(report, &e),
        }

        report
    }

    async fn persist_target(&self, store: &str, mut report: TargetReport, publish: bool) -> TargetReport {
        match self.persist(store, report.content_type.clone(), publish).await {
            Ok(saved) => {
                report.content_type = saved;
                report.status = self.written_status(publish);
                report
            }
            Err(e) => fail(report, &e),
        }
    }

    async fn persist(&self, store: &str, content_type: ContentType, publish: bool) -> Result<ContentType> {
        let Some(store) = self.stores.get(store) else {
            return Err(Error::Config(format!("store '{store}' is not connected")));
        };
        if self.interrupted.load(Ordering::SeqCst) {
            return Err(Error::Aborted);
        }
        self.executor.persist(store.as_ref(), content_type, publish).await
    }

    const fn written_status(&self, published: bool) -> TargetStatus {
        if self.executor.is_dry_run() {
            TargetStatus::Planned
        } else {
            TargetStatus::Updated { published }
        }
    }
}

/// Pick the requested fields off the source, in the requested order
///
/// Copies always arrive active; the source's omit/delete state stays behind.
fn extract_fields(source: &ResolvedContentType, field_ids: &[String]) -> Result<Vec<Field>> {
    let mut fields = Vec::with_capacity(field_ids.len());
    let mut missing = Vec::new();

    for id in field_ids {
        match source.content_type.field(id) {
            Some(field) => fields.push(Field {
                omitted: false,
                deleted: false,
                ..field.clone()
            }),
            None => missing.push(id.clone()),
        }
    }

    if missing.is_empty() {
        Ok(fields)
    } else {
        Err(Error::FieldNotFound {
            fields: missing,
            source_id: source.qualified_id(),
        })
    }
}

/// Omit and delete both report missing fields; keep each notice once
fn record_notices(report: &mut TargetReport, notices: Vec<LifecycleNotice>) {
    for notice in notices {
        let notice = Notice::Lifecycle(notice);
        if !report.notices.contains(&notice) {
            warn!("{}: {notice}", report.target);
            report.notices.push(notice);
        }
    }
}

fn fail(mut report: TargetReport, e: &Error) -> TargetReport {
    error!("Failed to update content type {}: {e}", report.target);
    report.status = TargetStatus::Failed(e.to_string());
    report
}

//! Copy and delete orchestration
//!
//! Commands resolve their targets against one fetched catalog, decide every
//! change in memory, and only then talk to the stores. Targets are persisted
//! independently: one failing target never hides the outcome of another.

mod executor;
mod options;
mod orchestrator;
mod reporting;

use std::fmt;

pub use executor::PersistExecutor;
pub use options::{CopyFieldsOptions, DeleteFieldsOptions};
pub use orchestrator::SyncEngine;
pub use reporting::SyncReporter;

use crate::lifecycle::LifecycleNotice;
use crate::merge::MergeNotice;
use crate::model::ContentType;
use crate::selector::ResolutionWarning;

/// A skipped field on one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Skip decided by the merge engine
    Merge(MergeNotice),
    /// Skip decided by the lifecycle rules
    Lifecycle(LifecycleNotice),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge(notice) => notice.fmt(f),
            Self::Lifecycle(notice) => notice.fmt(f),
        }
    }
}

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// Saved, and published when `published` is set
    Updated {
        /// Whether a publish followed the save
        published: bool,
    },
    /// Field set unchanged; no remote call was made
    Unchanged,
    /// Changes computed but not written (dry run)
    Planned,
    /// A save or publish was rejected
    Failed(String),
}

/// Outcome for one target content type
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    /// `store/content-type-id`
    pub target: String,
    /// Latest known snapshot of the target
    pub content_type: ContentType,
    /// Fields appended
    pub added: Vec<String>,
    /// Fields replaced in place
    pub overwritten: Vec<String>,
    /// Fields marked omitted
    pub omitted: Vec<String>,
    /// Fields marked deleted
    pub deleted: Vec<String>,
    /// Skipped fields
    pub notices: Vec<Notice>,
    /// Final status
    pub status: TargetStatus,
}

impl TargetReport {
    pub(crate) fn new(target: String, content_type: ContentType) -> Self {
        Self {
            target,
            content_type,
            added: Vec::new(),
            overwritten: Vec::new(),
            omitted: Vec::new(),
            deleted: Vec::new(),
            notices: Vec::new(),
            status: TargetStatus::Unchanged,
        }
    }

    /// Whether this target failed to persist
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, TargetStatus::Failed(_))
    }
}

/// Aggregated result of one command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Selectors that did not resolve
    pub warnings: Vec<ResolutionWarning>,
    /// One entry per resolved target, in resolution order
    pub targets: Vec<TargetReport>,
}

impl SyncReport {
    /// Targets that were written
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|status| matches!(status, TargetStatus::Updated { .. }))
    }

    /// Targets left untouched
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|status| matches!(status, TargetStatus::Unchanged))
    }

    /// Targets with changes that a dry run did not write
    #[must_use]
    pub fn planned(&self) -> usize {
        self.count(|status| matches!(status, TargetStatus::Planned))
    }

    /// Targets whose persistence failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, TargetStatus::Failed(_)))
    }

    /// Every skipped field across all targets
    #[must_use]
    pub fn notice_count(&self) -> usize {
        self.targets.iter().map(|target| target.notices.len()).sum()
    }

    /// Snapshots of the targets that were written
    #[must_use]
    pub fn updated_snapshots(&self) -> Vec<&ContentType> {
        self.targets
            .iter()
            .filter(|target| matches!(target.status, TargetStatus::Updated { .. }))
            .map(|target| &target.content_type)
            .collect()
    }

    /// Whether no target failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Some targets were written and some failed
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.failed() > 0 && self.updated() > 0
    }

    fn count(&self, predicate: impl Fn(&TargetStatus) -> bool) -> usize {
        self.targets.iter().filter(|target| predicate(&target.status)).count()
    }
}

#[cfg(test)]
mod integration_tests;

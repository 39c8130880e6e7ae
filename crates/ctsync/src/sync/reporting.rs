//! Sync operation reporting and statistics

use std::fmt::Write as _;

use super::{SyncReport, TargetReport, TargetStatus};

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(report: &SyncReport) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        for target in &report.targets {
            let _ = writeln!(output, "  {}", Self::describe(target));
        }
        if !report.targets.is_empty() {
            output.push('\n');
        }

        let _ = writeln!(output, "Updated:   {}", report.updated());
        let _ = writeln!(output, "Unchanged: {}", report.unchanged());
        if report.planned() > 0 {
            let _ = writeln!(output, "Planned:   {} (dry run)", report.planned());
        }
        let _ = writeln!(output, "Failed:    {}", report.failed());
        let _ = writeln!(output, "Skipped fields: {}", report.notice_count());

        if !report.warnings.is_empty() {
            let _ = writeln!(output, "\nWarnings ({}):", report.warnings.len());
            for warning in &report.warnings {
                let _ = writeln!(output, "  - {warning}");
            }
        }

        let errors: Vec<_> = report
            .targets
            .iter()
            .filter_map(|target| match &target.status {
                TargetStatus::Failed(message) => Some((&target.target, message)),
                _ => None,
            })
            .collect();
        if !errors.is_empty() {
            let _ = writeln!(output, "\nErrors ({}):", errors.len());
            for (target, message) in errors {
                let _ = writeln!(output, "  - {target}: {message}");
            }
        }

        output.push('\n');
        if report.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else if report.is_partial() {
            let _ = writeln!(
                output,
                "Status: ✗ Completed with errors (partial success: {} of {} targets updated)",
                report.updated(),
                report.targets.len()
            );
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }

    fn describe(target: &TargetReport) -> String {
        let mut changes = Vec::new();
        for (label, ids) in [
            ("added", &target.added),
            ("overwritten", &target.overwritten),
            ("omitted", &target.omitted),
            ("deleted", &target.deleted),
        ] {
            if !ids.is_empty() {
                changes.push(format!("{label} {}", ids.join(", ")));
            }
        }
        if !target.notices.is_empty() {
            changes.push(format!("skipped {}", target.notices.len()));
        }

        let status = match &target.status {
            TargetStatus::Updated { published: true } => "published",
            TargetStatus::Updated { published: false } => "saved",
            TargetStatus::Unchanged => "unchanged",
            TargetStatus::Planned => "dry run",
            TargetStatus::Failed(_) => "failed",
        };

        if changes.is_empty() {
            format!("{}: {status}", target.target)
        } else {
            format!("{}: {status} ({})", target.target, changes.join("; "))
        }
    }
}

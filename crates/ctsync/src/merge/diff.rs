//! Line diffs between two field definitions

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use crate::model::Field;

/// Renders the difference between an existing and an incoming field
pub struct FieldDiff;

impl FieldDiff {
    fn pretty(field: &Field) -> String {
        let mut text = serde_json::to_string_pretty(field).unwrap_or_else(|_| format!("{field:?}"));
        text.push('\n');
        text
    }

    /// Color-coded unified diff, existing (`-`) against incoming (`+`)
    #[must_use]
    pub fn render(existing: &Field, incoming: &Field, existing_label: &str, incoming_label: &str) -> String {
        const DIFF_CONTEXT_LINES: usize = 3;

        let old = Self::pretty(existing);
        let new = Self::pretty(incoming);
        let diff = TextDiff::from_lines(&old, &new);

        let mut output = String::new();
        let _ = writeln!(output, "\x1b[1m--- {existing_label}\x1b[0m");
        let _ = writeln!(output, "\x1b[1m+++ {incoming_label}\x1b[0m");

        for (idx, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }

            for op in group {
                for change in diff.iter_changes(op) {
                    let (sign, color) = match change.tag() {
                        ChangeTag::Delete => ("-", "\x1b[31m"),
                        ChangeTag::Insert => ("+", "\x1b[32m"),
                        ChangeTag::Equal => (" ", "\x1b[0m"),
                    };
                    let _ = write!(output, "{color}{sign}{}\x1b[0m", change.value());
                }
            }
        }

        output
    }

    /// Uncolored full diff
    #[must_use]
    pub fn render_plain(existing: &Field, incoming: &Field) -> String {
        let old = Self::pretty(existing);
        let new = Self::pretty(incoming);
        let diff = TextDiff::from_lines(&old, &new);

        let mut output = String::new();
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            let _ = write!(output, "{sign}{}", change.value());
        }
        output
    }
}

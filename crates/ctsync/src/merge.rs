//! Field merge engine
//!
//! Folds incoming fields into an existing field list:
//! - New ids are appended in the order they arrive
//! - Identical fields are left alone without asking
//! - Conflicting ids are overwritten in place only with consent (`force` or
//!   the approver) and only when both sides share a type, including the
//!   element type of arrays
//!
//! Every skip is reported as a [`MergeNotice`]; none of them abort the merge.

mod diff;

use std::fmt;

pub use diff::FieldDiff;

use crate::error::Result;
use crate::model::Field;

/// Decides whether a conflicting field may be overwritten
///
/// Return `Ok(true)` to overwrite, `Ok(false)` to keep the existing field,
/// or an error to abort the whole command.
pub trait OverwriteApprover {
    /// Ask about one conflict
    fn approve(&mut self, existing: &Field, incoming: &Field) -> Result<bool>;
}

impl<F> OverwriteApprover for F
where
    F: FnMut(&Field, &Field) -> Result<bool>,
{
    fn approve(&mut self, existing: &Field, incoming: &Field) -> Result<bool> {
        self(existing, incoming)
    }
}

/// Options controlling a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Overwrite conflicting fields without asking
    pub force: bool,
}

/// Why an incoming field was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeNotice {
    /// Field exists and overwriting was declined
    AlreadyExists {
        /// Field id
        field_id: String,
    },
    /// Field exists with a different type
    IncompatibleType {
        /// Field id
        field_id: String,
        /// Type on the target
        existing: String,
        /// Type on the source
        incoming: String,
    },
}

impl MergeNotice {
    /// Id of the field this notice is about
    #[must_use]
    pub fn field_id(&self) -> &str {
        match self {
            Self::AlreadyExists { field_id } | Self::IncompatibleType { field_id, .. } => field_id,
        }
    }
}

impl fmt::Display for MergeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists { field_id } => {
                write!(f, "field {field_id} already exists, skipping")
            }
            Self::IncompatibleType {
                field_id,
                existing,
                incoming,
            } => write!(
                f,
                "field {field_id} is {existing} on the target but {incoming} on the source, skipping"
            ),
        }
    }
}

/// Result of merging incoming fields into an existing list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Resulting field list
    pub fields: Vec<Field>,
    /// Ids appended as new fields
    pub added: Vec<String>,
    /// Ids replaced in place
    pub overwritten: Vec<String>,
    /// Ids already present with identical definitions
    pub unchanged: Vec<String>,
    /// Skipped conflicts
    pub notices: Vec<MergeNotice>,
}

impl MergeOutcome {
    /// Whether the field list differs from the one merged into
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.overwritten.is_empty()
    }
}

/// How an incoming field relates to the accumulated list
enum FieldComparison {
    New,
    Identical,
    Conflict(usize),
}

fn compare(fields: &[Field], incoming: &Field) -> FieldComparison {
    match fields.iter().position(|field| field.id == incoming.id) {
        None => FieldComparison::New,
        Some(idx) if fields[idx] == *incoming => FieldComparison::Identical,
        Some(idx) => FieldComparison::Conflict(idx),
    }
}

/// Check that overwriting `existing` with `incoming` keeps the stored type
fn check_compatible(existing: &Field, incoming: &Field) -> Option<MergeNotice> {
    let same_type = existing.field_type == incoming.field_type;
    let same_items = existing.item_type() == incoming.item_type();

    if same_type && same_items {
        None
    } else {
        Some(MergeNotice::IncompatibleType {
            field_id: incoming.id.clone(),
            existing: existing.type_description(),
            incoming: incoming.type_description(),
        })
    }
}

/// Merge `incoming` into `existing`
///
/// Without `force` and without an approver, conflicting fields are never
/// overwritten.
///
/// # Errors
///
/// Only errors raised by the approver are returned.
pub fn merge_fields(
    existing: &[Field],
    incoming: &[Field],
    options: MergeOptions,
    mut approver: Option<&mut dyn OverwriteApprover>,
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome {
        fields: existing.to_vec(),
        ..MergeOutcome::default()
    };

    for field in incoming {
        match compare(&outcome.fields, field) {
            FieldComparison::New => {
                outcome.fields.push(field.clone());
                outcome.added.push(field.id.clone());
            }
            FieldComparison::Identical => outcome.unchanged.push(field.id.clone()),
            FieldComparison::Conflict(idx) => {
                let current = &outcome.fields[idx];

                let approved = options.force
                    || match approver.as_deref_mut() {
                        Some(approver) => approver.approve(current, field)?,
                        None => false,
                    };

                if !approved {
                    outcome.notices.push(MergeNotice::AlreadyExists {
                        field_id: field.id.clone(),
                    });
                    continue;
                }

                if let Some(notice) = check_compatible(current, field) {
                    outcome.notices.push(notice);
                    continue;
                }

                outcome.fields[idx] = field.clone();
                outcome.overwritten.push(field.id.clone());
            }
        }
    }

    Ok(outcome)
}

//! Options for the top-level commands

use crate::selector::Selector;

/// Options of `copy-fields`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFieldsOptions {
    /// Content type to copy from
    pub source: Selector,
    /// Content types to copy into
    pub targets: Vec<Selector>,
    /// Field ids to copy
    pub fields: Vec<String>,
    /// Publish targets after saving
    pub publish: bool,
    /// Overwrite conflicting fields without asking
    pub force: bool,
}

/// Options of `delete-fields`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFieldsOptions {
    /// Content types to delete from
    pub targets: Vec<Selector>,
    /// Field ids to delete
    pub fields: Vec<String>,
    /// Omit fields first instead of refusing to delete active ones
    pub force: bool,
}

/// Drop repeated field ids, keeping the first occurrence
pub(crate) fn unique_field_ids(fields: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        if !unique.contains(field) {
            unique.push(field.clone());
        }
    }
    unique
}

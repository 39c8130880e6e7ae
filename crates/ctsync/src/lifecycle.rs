//! Omit/delete lifecycle of fields
//!
//! Fields move `Active -> Omitted -> Deleted` and never back. A field can
//! only be marked deleted once it is omitted. Both transitions hand back the
//! original snapshot untouched when nothing changed, so callers can skip the
//! save and publish round trip.

use std::fmt;

use crate::model::{ContentType, FieldState};

/// Why a requested field was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleNotice {
    /// Delete requested on a field that is not omitted yet
    NotOmitted {
        /// Field id
        field_id: String,
    },
    /// The content type has no field with this id
    Missing {
        /// Field id
        field_id: String,
    },
}

impl fmt::Display for LifecycleNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOmitted { field_id } => write!(
                f,
                "cannot delete field {field_id}, you must omit it first (or pass --force); skipping"
            ),
            Self::Missing { field_id } => write!(f, "field {field_id} does not exist, skipping"),
        }
    }
}

/// Result of applying one lifecycle step to a content type
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The snapshot, updated when `changed` is non-empty
    pub content_type: ContentType,
    /// Ids whose state advanced
    pub changed: Vec<String>,
    /// Ids that were requested but skipped
    pub notices: Vec<LifecycleNotice>,
}

impl Transition {
    /// Whether the snapshot must be saved and published
    #[must_use]
    pub fn needs_persist(&self) -> bool {
        !self.changed.is_empty()
    }
}

fn missing(content_type: &ContentType, field_ids: &[String]) -> Vec<LifecycleNotice> {
    field_ids
        .iter()
        .filter(|id| content_type.field(id).is_none())
        .map(|id| LifecycleNotice::Missing {
            field_id: id.clone(),
        })
        .collect()
}

/// Mark the listed fields omitted
#[must_use]
pub fn omit(content_type: ContentType, field_ids: &[String]) -> Transition {
    let notices = missing(&content_type, field_ids);
    let mut content_type = content_type;
    let mut changed = Vec::new();

    for field in &mut content_type.fields {
        if field_ids.contains(&field.id) && field.state() == FieldState::Active {
            field.omitted = true;
            changed.push(field.id.clone());
        }
    }

    debug_assert!(content_type.lifecycle_consistent());

    Transition {
        content_type,
        changed,
        notices,
    }
}

/// Mark the listed fields deleted; fields that are not omitted are refused
#[must_use]
pub fn delete(content_type: ContentType, field_ids: &[String]) -> Transition {
    let mut notices = missing(&content_type, field_ids);
    let mut content_type = content_type;
    let mut changed = Vec::new();

    for field in &mut content_type.fields {
        if !field_ids.contains(&field.id) {
            continue;
        }

        match field.state() {
            FieldState::Active => notices.push(LifecycleNotice::NotOmitted {
                field_id: field.id.clone(),
            }),
            FieldState::Omitted => {
                field.deleted = true;
                changed.push(field.id.clone());
            }
            FieldState::Deleted => {}
        }
    }

    debug_assert!(content_type.lifecycle_consistent());

    Transition {
        content_type,
        changed,
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn article() -> ContentType {
        let mut body = Field::new("body", "Body", "Text");
        body.omitted = true;
        ContentType::new(
            "article",
            "Article",
            vec![Field::new("title", "Title", "Symbol"), body, Field::new("slug", "Slug", "Symbol")],
        )
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_omit_marks_only_listed_fields() {
        let transition = omit(article(), &ids(&["title"]));

        assert_eq!(transition.changed, vec!["title"]);
        assert!(transition.content_type.field("title").unwrap().omitted);
        assert!(!transition.content_type.field("slug").unwrap().omitted);
        assert!(transition.needs_persist());
    }

    #[test]
    fn test_omit_unknown_ids_is_noop() {
        let original = article();
        let transition = omit(original.clone(), &ids(&["nope"]));

        assert!(!transition.needs_persist());
        assert_eq!(transition.content_type, original);
        assert_eq!(
            transition.notices,
            vec![LifecycleNotice::Missing {
                field_id: "nope".to_string()
            }]
        );
    }

    #[test]
    fn test_omit_already_omitted_is_noop() {
        let original = article();
        let transition = omit(original.clone(), &ids(&["body"]));

        assert!(!transition.needs_persist());
        assert_eq!(transition.content_type, original);
    }

    #[test]
    fn test_delete_requires_omitted() {
        let transition = delete(article(), &ids(&["title", "body"]));

        assert_eq!(transition.changed, vec!["body"]);
        let title = transition.content_type.field("title").unwrap();
        assert!(!title.deleted);
        assert!(!title.omitted);
        assert_eq!(
            transition.notices,
            vec![LifecycleNotice::NotOmitted {
                field_id: "title".to_string()
            }]
        );
    }

    #[test]
    fn test_delete_non_omitted_only_is_noop() {
        let original = article();
        let transition = delete(original.clone(), &ids(&["title"]));

        assert!(!transition.needs_persist());
        assert_eq!(transition.content_type, original);
    }

    #[test]
    fn test_delete_already_deleted_is_noop() {
        let deleted = delete(article(), &ids(&["body"])).content_type;
        let again = delete(deleted.clone(), &ids(&["body"]));

        assert!(!again.needs_persist());
        assert_eq!(again.content_type, deleted);
    }

    #[test]
    fn test_omit_then_delete() {
        let omitted = omit(article(), &ids(&["title", "slug"]));
        let deleted = delete(omitted.content_type, &ids(&["title", "slug"]));

        assert_eq!(deleted.changed, vec!["title", "slug"]);
        assert!(deleted.notices.is_empty());
        for id in ["title", "slug"] {
            let field = deleted.content_type.field(id).unwrap();
            assert_eq!(field.state(), FieldState::Deleted);
        }
    }

    #[test]
    fn test_deleted_implies_omitted_after_every_step() {
        let requests = [ids(&["title"]), ids(&["body", "slug"]), ids(&["title", "body", "slug", "x"])];
        let mut content_type = article();

        for request in &requests {
            content_type = delete(content_type, request).content_type;
            assert!(content_type.lifecycle_consistent());
            content_type = omit(content_type, request).content_type;
            assert!(content_type.lifecycle_consistent());
        }

        assert!(content_type.fields.iter().all(|f| f.state() == FieldState::Deleted));
    }
}

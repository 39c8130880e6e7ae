//! Resolution of selectors against a fetched catalog

use std::collections::BTreeSet;
use std::fmt;

use super::Selector;
use crate::error::{Error, Result};
use crate::model::{Catalog, ContentType};

/// Non-fatal condition found while resolving targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    /// Selector names a store that was not configured
    StoreNotFound {
        /// The selector
        selector: Selector,
    },
    /// Store exists but holds no content type with that id
    ContentTypeNotFound {
        /// The selector
        selector: Selector,
    },
    /// Nothing matched at all
    NoTargets,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreNotFound { selector } => write!(
                f,
                "store '{}' not found for {selector}; did you pass it with --spaces?",
                selector.store
            ),
            Self::ContentTypeNotFound { selector } => {
                write!(f, "content type {selector} not found")
            }
            Self::NoTargets => f.write_str("could not find any content types matching the target selectors"),
        }
    }
}

/// A content type together with the store it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContentType {
    /// Store name
    pub store: String,
    /// Owned copy of the snapshot
    pub content_type: ContentType,
}

impl ResolvedContentType {
    /// `store/content-type-id`
    #[must_use]
    pub fn qualified_id(&self) -> String {
        format!("{}/{}", self.store, self.content_type.id())
    }
}

/// Outcome of target resolution
#[derive(Debug, Clone, Default)]
pub struct TargetResolution {
    /// Matched content types, duplicates collapsed, in selector order
    pub targets: Vec<ResolvedContentType>,
    /// Selectors that matched nothing
    pub warnings: Vec<ResolutionWarning>,
}

fn find_matches<'a>(
    selector: &Selector,
    catalog: &'a Catalog,
) -> std::result::Result<Vec<&'a ContentType>, ResolutionWarning> {
    let Some(content_types) = catalog.get(&selector.store) else {
        return Err(ResolutionWarning::StoreNotFound {
            selector: selector.clone(),
        });
    };

    let found: Vec<_> = content_types
        .iter()
        .filter(|content_type| content_type.id() == selector.content_type_id)
        .collect();

    if found.is_empty() {
        Err(ResolutionWarning::ContentTypeNotFound {
            selector: selector.clone(),
        })
    } else {
        Ok(found)
    }
}

/// Resolve target selectors; missing stores and content types become warnings
#[must_use]
pub fn resolve_targets(selectors: &[Selector], catalog: &Catalog) -> TargetResolution {
    let mut resolution = TargetResolution::default();
    let mut seen = BTreeSet::new();

    for selector in selectors {
        if !seen.insert(selector) {
            continue;
        }

        match find_matches(selector, catalog) {
            Ok(found) => resolution
                .targets
                .extend(found.into_iter().map(|content_type| ResolvedContentType {
                    store: selector.store.clone(),
                    content_type: content_type.clone(),
                })),
            Err(warning) => resolution.warnings.push(warning),
        }
    }

    if resolution.targets.is_empty() {
        resolution.warnings.push(ResolutionWarning::NoTargets);
    }

    resolution
}

/// Resolve the source of a copy; the selectors must match exactly one content type
///
/// # Errors
///
/// Returns [`Error::SourceNotFound`] when nothing matches and
/// [`Error::MultipleSources`] when more than one content type matches.
pub fn resolve_source(selectors: &[Selector], catalog: &Catalog) -> Result<ResolvedContentType> {
    let resolution = resolve_targets(selectors, catalog);
    let mut targets = resolution.targets;

    match targets.len() {
        0 => Err(Error::SourceNotFound(
            selectors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )),
        1 => Ok(targets.remove(0)),
        _ => Err(Error::MultipleSources {
            matches: targets.iter().map(ResolvedContentType::qualified_id).collect(),
        }),
    }
}

//! Project-type compatibility and bundle member resolution
//!
//! An item is compatible with a project when its `project_types` share at
//! least one entry with the project's. The same check gates listing,
//! installation and updates.

use crate::kind::{ItemKind, ProjectType};
use crate::manifest::BundleItemRef;
use crate::registry::{ItemIndex, RegistryItem};
use crate::{Error, Result};
use serde::Serialize;

/// True iff the item's project types intersect `project_types`
///
/// An empty `project_types` is never compatible with anything.
pub fn is_compatible(item: &RegistryItem, project_types: &[ProjectType]) -> bool {
    project_types
        .iter()
        .any(|pt| item.project_types.iter().any(|t| t == pt.as_str()))
}

/// Like [`is_compatible`], but returns [`Error::Incompatible`] on rejection
pub fn ensure_compatible(item: &RegistryItem, project_types: &[ProjectType]) -> Result<()> {
    if is_compatible(item, project_types) {
        return Ok(());
    }

    Err(Error::Incompatible {
        kind: item.kind,
        id: item.id.clone(),
        project_types: project_types.iter().map(|pt| pt.to_string()).collect(),
    })
}

/// Filter a catalog for display
///
/// `project_types: None` shows everything regardless of compatibility;
/// `category: None` keeps every kind. Catalog order is preserved.
pub fn list_items<'a>(
    items: &'a [RegistryItem],
    project_types: Option<&[ProjectType]>,
    category: Option<ItemKind>,
) -> Vec<&'a RegistryItem> {
    items
        .iter()
        .filter(|item| category.map_or(true, |kind| item.kind == kind))
        .filter(|item| project_types.map_or(true, |types| is_compatible(item, types)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Ok,
    Missing,
    Incompatible,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemberStatus::Ok => "ok",
            MemberStatus::Missing => "missing",
            MemberStatus::Incompatible => "incompatible",
        };
        write!(f, "{}", s)
    }
}

/// One bundle member reference and what it resolved to
#[derive(Debug, Clone)]
pub struct ResolvedMember<'a> {
    pub reference: &'a BundleItemRef,
    pub item: Option<&'a RegistryItem>,
    pub status: MemberStatus,
}

/// Resolve each member of a bundle against the catalog index
///
/// Used for inspection only; installation refuses bundles with missing
/// members outright. Members are checked against `project_types` when given.
/// A non-bundle item resolves to an empty list.
pub fn resolve_bundle_members<'a>(
    bundle: &'a RegistryItem,
    index: &ItemIndex<'a>,
    project_types: Option<&[ProjectType]>,
) -> Vec<ResolvedMember<'a>> {
    let Some(refs) = bundle.items.as_ref() else {
        return Vec::new();
    };

    refs.iter()
        .map(|reference| {
            let item = index.get(reference.kind, &reference.id);
            let status = match (item, project_types) {
                (None, _) => MemberStatus::Missing,
                (Some(found), Some(types)) if !is_compatible(found, types) => {
                    MemberStatus::Incompatible
                }
                (Some(_), _) => MemberStatus::Ok,
            };
            ResolvedMember {
                reference,
                item,
                status,
            }
        })
        .collect()
}

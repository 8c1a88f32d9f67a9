//! Registry catalog and registry sources
//!
//! A registry is a directory tree (usually a git checkout) with one directory
//! per category (`agents/`, `rules/`, `skills/`, `bundles/`, `workflows/`,
//! `prompts/`). Each immediate subdirectory is an item whose id is the
//! directory name and whose `manifest.yaml` describes it.
//!
//! The catalog is rebuilt from disk on every command; there is no cache beyond
//! the registry checkout itself.
//!
//! # Examples
//!
//! ```no_run
//! use forge::{get_registry_items, ItemIndex, ItemKind};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let items = get_registry_items(Path::new("/path/to/registry"))?;
//! let index = ItemIndex::new(&items);
//!
//! if let Some(rule) = index.get(ItemKind::Rule, "python-style") {
//!     println!("{} {}", rule.id, rule.version);
//! }
//! # Ok(())
//! # }
//! ```

use crate::git::{GitFetcher, ProgressCallback};
use crate::kind::ItemKind;
use crate::manifest::{
    parse_bundle_manifest, parse_item_manifest, BundleItemRef, ManifestOutcome, SkipReason,
    MANIFEST_FILE,
};
use crate::project::RegistryConfig;
use crate::{Config, Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A catalogued registry entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryItem {
    pub kind: ItemKind,
    pub id: String,
    pub version: String,
    pub project_types: Vec<String>,
    pub description: Option<String>,

    /// Path relative to the registry root, e.g. `agents/backend-engineer`
    pub path: String,

    /// Member references; present only for bundles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BundleItemRef>>,
}

impl RegistryItem {
    /// Directory holding this item's manifest and payload
    pub fn source_dir(&self, registry_root: &Path) -> PathBuf {
        registry_root.join(&self.path)
    }
}

/// An item directory that was left out of the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    pub kind: ItemKind,
    pub id: String,
    pub reason: SkipReason,
}

/// Catalog plus diagnostics for the directories that did not parse
#[derive(Debug, Clone, Default)]
pub struct RegistryScan {
    pub items: Vec<RegistryItem>,
    pub skipped: Vec<SkippedItem>,
}

/// Walk a registry root and parse every item directory
///
/// Categories are visited in [`ItemKind::ALL`] order and items in file-name
/// order. Missing category directories are fine; malformed manifests are
/// recorded in [`RegistryScan::skipped`].
pub fn scan_registry(registry_root: &Path) -> Result<RegistryScan> {
    let mut scan = RegistryScan::default();

    for kind in ItemKind::ALL {
        let category_dir = registry_root.join(kind.category());
        if !category_dir.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&category_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            let manifest_path = entry.path().join(MANIFEST_FILE);
            let path = format!("{}/{}", kind.category(), id);

            let parsed = if kind.is_bundle() {
                match parse_bundle_manifest(&manifest_path)? {
                    ManifestOutcome::Valid(m) => Ok(RegistryItem {
                        kind,
                        id: id.clone(),
                        version: m.version,
                        project_types: m.project_types,
                        description: m.description,
                        path,
                        items: Some(m.items),
                    }),
                    ManifestOutcome::Skipped(reason) => Err(reason),
                }
            } else {
                match parse_item_manifest(&manifest_path)? {
                    ManifestOutcome::Valid(m) => Ok(RegistryItem {
                        kind,
                        id: id.clone(),
                        version: m.version,
                        project_types: m.project_types,
                        description: m.description,
                        path,
                        items: None,
                    }),
                    ManifestOutcome::Skipped(reason) => Err(reason),
                }
            };

            match parsed {
                Ok(item) => scan.items.push(item),
                Err(reason) => scan.skipped.push(SkippedItem { kind, id, reason }),
            }
        }
    }

    Ok(scan)
}

/// Build the full catalog for a registry root
pub fn get_registry_items(registry_root: &Path) -> Result<Vec<RegistryItem>> {
    Ok(scan_registry(registry_root)?.items)
}

/// Read-only `(kind, id) -> item` lookup over a catalog
///
/// Built once per command and shared by the resolver, installer, and updater.
/// A repeated (kind, id) keeps the last entry.
pub struct ItemIndex<'a> {
    items: HashMap<(ItemKind, String), &'a RegistryItem>,
}

impl<'a> ItemIndex<'a> {
    pub fn new(items: &'a [RegistryItem]) -> Self {
        let items = items
            .iter()
            .map(|item| ((item.kind, item.id.clone()), item))
            .collect();
        Self { items }
    }

    pub fn get(&self, kind: ItemKind, id: &str) -> Option<&'a RegistryItem> {
        self.items.get(&(kind, id.to_string())).copied()
    }

    /// Look up an item, turning absence into [`Error::ItemNotFound`]
    pub fn require(&self, kind: ItemKind, id: &str) -> Result<&'a RegistryItem> {
        self.get(kind, id).ok_or_else(|| Error::ItemNotFound {
            kind,
            id: id.to_string(),
        })
    }
}

/// Where a project's registry checkout comes from
pub enum RegistrySource {
    /// Shallow git clone cached under the user's cache root
    Git(GitFetcher),
    /// Pre-fetched directory; url and ref are ignored
    Local(PathBuf),
}

impl RegistrySource {
    /// Pick the source from user settings
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.local_registry_path() {
            Some(path) => Ok(RegistrySource::Local(path)),
            None => Ok(RegistrySource::Git(GitFetcher::from_config(config)?)),
        }
    }

    /// Attach a progress callback to git fetches; local sources are unchanged
    pub fn with_progress(self, progress: ProgressCallback) -> Self {
        match self {
            RegistrySource::Git(fetcher) => RegistrySource::Git(fetcher.with_progress(progress)),
            local => local,
        }
    }

    /// Make the registry available locally and return its root
    pub fn fetch(&self, registry: &RegistryConfig) -> Result<PathBuf> {
        match self {
            RegistrySource::Git(fetcher) => {
                if registry.url.is_empty() {
                    return Err(Error::Fetch(
                        "No registry url configured in .forge/config.yaml".to_string(),
                    ));
                }
                fetcher.fetch(&registry.url, &registry.git_ref)
            }
            RegistrySource::Local(path) => {
                if !path.is_dir() {
                    return Err(Error::Fetch(format!(
                        "Local registry not found: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
        }
    }
}

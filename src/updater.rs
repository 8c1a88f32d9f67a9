//! Re-installing items from a freshly fetched registry
//!
//! An update never compares versions: a handled item is always removed,
//! copied again, and re-recorded with the project's current registry ref.

use crate::installer::{install_item, plan_copy};
use crate::kind::ItemKind;
use crate::project::ProjectConfig;
use crate::registry::{get_registry_items, ItemIndex, RegistryItem, RegistrySource};
use crate::remover::remove_item;
use crate::resolver::is_compatible;
use crate::{Error, Result};
use std::path::Path;

/// Result of updating a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Reinstalled at the given registry version
    Updated { version: String },
    /// No installation record for (kind, id)
    NotInstalled,
    /// The fresh catalog no longer has the item
    NotInRegistry,
    /// The item no longer matches the project's types
    Incompatible,
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }
}

/// Remove, re-read the saved config, then install again
///
/// The fresh payload is located first so a broken registry entry leaves the
/// current install and its record untouched.
fn reinstall(
    registry_root: &Path,
    item: &RegistryItem,
    project_root: &Path,
    config: &mut ProjectConfig,
) -> Result<()> {
    plan_copy(registry_root, item, project_root)?;

    remove_item(project_root, config, item.kind, &item.id)?;
    *config = ProjectConfig::load(project_root)?.ok_or(Error::ProjectNotFound)?;

    let source_ref = config.registry.git_ref.clone();
    install_item(registry_root, item, project_root, config, &source_ref)?;
    Ok(())
}

/// Update one installed item
///
/// Fetches the registry at the project's current url/ref. Items missing from
/// the fresh catalog or no longer compatible are left alone and reported
/// through the returned [`UpdateOutcome`].
pub fn update_item(
    source: &RegistrySource,
    project_root: &Path,
    config: &mut ProjectConfig,
    kind: ItemKind,
    id: &str,
) -> Result<UpdateOutcome> {
    if !config.is_installed(kind, id) {
        return Ok(UpdateOutcome::NotInstalled);
    }

    let registry_root = source.fetch(&config.registry)?;
    let items = get_registry_items(&registry_root)?;
    let index = ItemIndex::new(&items);

    let Some(item) = index.get(kind, id) else {
        return Ok(UpdateOutcome::NotInRegistry);
    };
    if !is_compatible(item, &config.project_types) {
        return Ok(UpdateOutcome::Incompatible);
    }

    reinstall(&registry_root, item, project_root, config)?;
    Ok(UpdateOutcome::Updated {
        version: item.version.clone(),
    })
}

/// Update every installed item
///
/// The registry is fetched and catalogued once. Items are processed in the
/// order they were recorded when the update started; those missing from the
/// catalog or no longer compatible are skipped silently.
///
/// # Returns
///
/// The (kind, id) pairs that were reinstalled, in processing order
pub fn update_all(
    source: &RegistrySource,
    project_root: &Path,
    config: &mut ProjectConfig,
) -> Result<Vec<(ItemKind, String)>> {
    if config.installed.is_empty() {
        return Ok(Vec::new());
    }

    let registry_root = source.fetch(&config.registry)?;
    let items = get_registry_items(&registry_root)?;
    let index = ItemIndex::new(&items);

    let snapshot: Vec<(ItemKind, String)> = config
        .installed
        .iter()
        .map(|record| (record.kind, record.id.clone()))
        .collect();

    let mut updated = Vec::new();
    for (kind, id) in snapshot {
        let Some(item) = index.get(kind, &id) else {
            continue;
        };
        if !is_compatible(item, &config.project_types) {
            continue;
        }

        reinstall(&registry_root, item, project_root, config)?;
        updated.push((kind, id));
    }

    Ok(updated)
}

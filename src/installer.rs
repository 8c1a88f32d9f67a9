//! Item installation into a project's `.cursor/` tree
//!
//! Each installable kind has exactly one destination, derived from its id:
//!
//! | kind  | destination                       |
//! |-------|-----------------------------------|
//! | agent | `.cursor/agents/<id>.md`          |
//! | rule  | `.cursor/rules/<id>/RULE.md`      |
//! | skill | `.cursor/skills/<id>/SKILL.md`    |
//!
//! Compatibility is checked by the caller before anything here runs.
//!
//! # Examples
//!
//! ```no_run
//! use forge::{get_registry_items, install_item, load_project, ItemIndex, ItemKind};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (root, mut config) = load_project(".")?;
//! let registry_root = Path::new("/path/to/registry");
//! let items = get_registry_items(registry_root)?;
//! let index = ItemIndex::new(&items);
//!
//! let rule = index.require(ItemKind::Rule, "python-style")?;
//! let source_ref = config.registry.git_ref.clone();
//! let dest = install_item(registry_root, rule, &root, &mut config, &source_ref)?;
//! println!("Installed to: {}", dest.display());
//! # Ok(())
//! # }
//! ```

use crate::kind::ItemKind;
use crate::project::{InstalledItem, ProjectConfig};
use crate::registry::{ItemIndex, RegistryItem};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory all payloads are installed under
pub const CURSOR_DIR: &str = ".cursor";

/// Where an item of `kind` with `id` lands inside a project
///
/// Bundles, workflows and prompts have no destination.
pub fn destination_path(project_root: &Path, kind: ItemKind, id: &str) -> Result<PathBuf> {
    let base = project_root.join(CURSOR_DIR);
    match kind {
        ItemKind::Agent => Ok(base.join("agents").join(format!("{}.md", id))),
        ItemKind::Rule => Ok(base.join("rules").join(id).join("RULE.md")),
        ItemKind::Skill => Ok(base.join("skills").join(id).join("SKILL.md")),
        other => Err(Error::NotInstallable(other)),
    }
}

/// Find the payload file inside an item's source directory
///
/// Agents use the first `*.md` by file name; rules and skills need an
/// exact `RULE.md` / `SKILL.md`.
fn locate_payload(registry_root: &Path, item: &RegistryItem) -> Result<PathBuf> {
    let source_dir = item.source_dir(registry_root);
    let missing = || Error::PayloadMissing {
        kind: item.kind,
        id: item.id.clone(),
        path: source_dir.clone(),
    };

    match item.kind {
        ItemKind::Agent => {
            if !source_dir.is_dir() {
                return Err(missing());
            }
            for entry in WalkDir::new(&source_dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let entry = entry.map_err(std::io::Error::from)?;
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                    return Ok(path.to_path_buf());
                }
            }
            Err(missing())
        }
        ItemKind::Rule | ItemKind::Skill => {
            let name = if item.kind == ItemKind::Rule {
                "RULE.md"
            } else {
                "SKILL.md"
            };
            let path = source_dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(missing())
            }
        }
        other => Err(Error::NotInstallable(other)),
    }
}

/// A member that passed validation and is ready to copy
pub(crate) struct PlannedCopy<'a> {
    item: &'a RegistryItem,
    payload: PathBuf,
    destination: PathBuf,
}

pub(crate) fn plan_copy<'a>(
    registry_root: &Path,
    item: &'a RegistryItem,
    project_root: &Path,
) -> Result<PlannedCopy<'a>> {
    let destination = destination_path(project_root, item.kind, &item.id)?;
    let payload = locate_payload(registry_root, item)?;
    Ok(PlannedCopy {
        item,
        payload,
        destination,
    })
}

fn copy_payload(plan: &PlannedCopy<'_>) -> Result<()> {
    if let Some(parent) = plan.destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&plan.payload, &plan.destination)?;
    Ok(())
}

/// Add or replace the record for an item
fn record_installed(config: &mut ProjectConfig, record: InstalledItem) {
    config
        .installed
        .retain(|existing| !existing.matches(record.kind, &record.id));
    config.installed.push(record);
}

fn installed_record(item: &RegistryItem, source_ref: &str) -> InstalledItem {
    InstalledItem {
        kind: item.kind,
        id: item.id.clone(),
        version: item.version.clone(),
        source_registry_ref: source_ref.to_string(),
    }
}

/// Install a single agent, rule, or skill
///
/// Copies the payload, records the installation in `config` (replacing any
/// earlier record for the same item) and saves the config.
///
/// # Returns
///
/// The destination path of the copied payload
pub fn install_item(
    registry_root: &Path,
    item: &RegistryItem,
    project_root: &Path,
    config: &mut ProjectConfig,
    source_ref: &str,
) -> Result<PathBuf> {
    let plan = plan_copy(registry_root, item, project_root)?;
    copy_payload(&plan)?;

    record_installed(config, installed_record(item, source_ref));
    config.save(project_root)?;

    Ok(plan.destination)
}

/// Install every member of a bundle
///
/// Runs in two phases. First every member is looked up in `index`, checked to
/// be installable, and its payload located; any failure here aborts before a
/// single file is written. Then the payloads are copied. Records are added
/// only after every copy succeeded, and the config is saved once.
///
/// Member compatibility is not checked; the caller gates on the bundle itself.
pub fn install_bundle(
    registry_root: &Path,
    bundle: &RegistryItem,
    index: &ItemIndex<'_>,
    project_root: &Path,
    config: &mut ProjectConfig,
    source_ref: &str,
) -> Result<Vec<InstalledItem>> {
    let refs = match bundle.items.as_deref() {
        Some(refs) if !refs.is_empty() => refs,
        _ => return Err(Error::InvalidBundle(bundle.id.clone())),
    };

    let mut plans = Vec::with_capacity(refs.len());
    for reference in refs {
        let member = index.require(reference.kind, &reference.id)?;
        plans.push(plan_copy(registry_root, member, project_root)?);
    }

    for plan in &plans {
        copy_payload(plan)?;
    }

    let records: Vec<InstalledItem> = plans
        .iter()
        .map(|plan| installed_record(plan.item, source_ref))
        .collect();
    for record in &records {
        record_installed(config, record.clone());
    }
    config.save(project_root)?;

    Ok(records)
}

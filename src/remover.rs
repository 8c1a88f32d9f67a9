//! Removing installed items from a project

use crate::installer::destination_path;
use crate::kind::ItemKind;
use crate::project::ProjectConfig;
use crate::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Remove an installed item and its record
///
/// Returns `Ok(false)` without touching anything when (kind, id) is not
/// recorded in `config.installed`. Otherwise deletes the agent path (file or
/// directory), or the whole `<id>/` directory for a rule or skill, drops the
/// record, and saves.
/// Payloads that are already gone are not an error.
pub fn remove_item(
    project_root: &Path,
    config: &mut ProjectConfig,
    kind: ItemKind,
    id: &str,
) -> Result<bool> {
    let destination = destination_path(project_root, kind, id)?;

    if !config.is_installed(kind, id) {
        return Ok(false);
    }

    let target = match kind {
        ItemKind::Agent => Some(destination.as_path()),
        _ => destination.parent(),
    };
    if let Some(target) = target {
        remove_path(target)?;
    }

    config.installed.retain(|i| !i.matches(kind, id));
    config.save(project_root)?;
    Ok(true)
}

/// Delete a file or a whole directory; a missing path is fine
fn remove_path(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

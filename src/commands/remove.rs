use anyhow::{bail, Result};
use forge::{remove_item, ItemKind};

use super::open_project;

pub fn run(kind: String, id: String) -> Result<()> {
    let kind: ItemKind = kind.parse()?;
    if !kind.is_installable() {
        bail!("Kind must be agent, rule, or skill.");
    }

    let (project_root, mut config) = open_project()?;

    if !remove_item(&project_root, &mut config, kind, &id)? {
        bail!("{} {} is not installed.", kind, id);
    }

    println!("✓ Removed {} {}", kind, id);
    Ok(())
}

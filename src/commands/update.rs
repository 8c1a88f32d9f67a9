use anyhow::{bail, Result};
use forge::{update_all, update_item, ItemKind, UpdateOutcome};

use super::{open_project, registry_source};

pub fn run(kind: Option<String>, id: Option<String>) -> Result<()> {
    match (kind, id) {
        (Some(kind), Some(id)) => update_one(kind, id),
        (None, None) => update_everything(),
        _ => bail!("Provide both kind and id to update one item, or neither to update all."),
    }
}

fn update_everything() -> Result<()> {
    let (project_root, mut config) = open_project()?;
    let source = registry_source()?;

    let updated = update_all(&source, &project_root, &mut config)?;
    if updated.is_empty() {
        println!("Nothing to update (or no items installed).");
        return Ok(());
    }

    for (kind, id) in &updated {
        println!("✓ Updated {} {}", kind, id);
    }
    Ok(())
}

fn update_one(kind: String, id: String) -> Result<()> {
    let kind: ItemKind = kind.parse()?;
    if !kind.is_installable() {
        bail!("Kind must be agent, rule, or skill.");
    }

    let (project_root, mut config) = open_project()?;
    let source = registry_source()?;

    match update_item(&source, &project_root, &mut config, kind, &id)? {
        UpdateOutcome::Updated { version } => {
            println!("✓ Updated {} {} @ {}", kind, id, version);
            Ok(())
        }
        UpdateOutcome::NotInstalled => bail!("{} {} is not installed.", kind, id),
        UpdateOutcome::NotInRegistry => {
            bail!("{} {} is no longer in the registry; left unchanged.", kind, id)
        }
        UpdateOutcome::Incompatible => bail!(
            "{} {} is no longer compatible with project types [{}]; left unchanged.",
            kind,
            id,
            config.project_type_names().join(", ")
        ),
    }
}

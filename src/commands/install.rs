use anyhow::{bail, Result};
use forge::{ensure_compatible, install_bundle, install_item, ItemIndex, ItemKind};

use super::{fetch_catalog, open_project, registry_source};

pub fn run(kind: String, id: String) -> Result<()> {
    let kind: ItemKind = kind.parse()?;
    if !kind.is_installable() && !kind.is_bundle() {
        bail!("Kind must be agent, rule, skill, or bundle; got {}.", kind);
    }

    let (project_root, mut config) = open_project()?;

    let source = registry_source()?;
    let (registry_root, items) = fetch_catalog(&source, &config)?;
    let index = ItemIndex::new(&items);

    let item = index.require(kind, &id)?;
    ensure_compatible(item, &config.project_types)?;

    let source_ref = config.registry.git_ref.clone();

    if kind.is_bundle() {
        let installed = install_bundle(
            &registry_root,
            item,
            &index,
            &project_root,
            &mut config,
            &source_ref,
        )?;

        println!("✓ Installed bundle {}", id);
        for record in &installed {
            println!("  • {} {} @ {}", record.kind, record.id, record.version);
        }
    } else {
        let dest = install_item(&registry_root, item, &project_root, &mut config, &source_ref)?;
        tracing::debug!(dest = %dest.display(), "payload copied");

        println!("✓ Installed {} {} @ {}", kind, id, item.version);
        if let Ok(relative) = dest.strip_prefix(&project_root) {
            println!("  → {}", relative.display());
        }
    }

    Ok(())
}

//! Registry scaffolding for `forge init --registry`
//!
//! Lays out the category directories of an empty registry and can seed one
//! small `_example` item per installable kind plus a bundle that references
//! the example rule.

use crate::kind::ItemKind;
use crate::manifest::{write_manifest, BundleItemRef, BundleManifest, ItemManifest, MANIFEST_FILE};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Id used for every seeded example item
pub const EXAMPLE_ID: &str = "_example";

/// True when `dir` already has at least one registry category directory
pub fn is_registry_root(dir: &Path) -> bool {
    ItemKind::ALL
        .iter()
        .any(|kind| dir.join(kind.category()).is_dir())
}

/// Create the registry layout in `dir`
///
/// Existing directories and files are left as they are, except that example
/// manifests and payloads are rewritten when `with_examples` is set.
///
/// # Returns
///
/// The example item directories that were written
pub fn scaffold_registry(dir: &Path, with_examples: bool) -> Result<Vec<PathBuf>> {
    for kind in ItemKind::ALL {
        let category = dir.join(kind.category());
        fs::create_dir_all(&category)?;
        let keep = category.join(".gitkeep");
        if !keep.exists() {
            fs::write(keep, "")?;
        }
    }

    if !with_examples {
        return Ok(Vec::new());
    }

    let examples = [
        (
            ItemKind::Agent,
            "agent.md",
            "# Example agent\n\nDescribe the agent's role and how it should work.\n",
        ),
        (
            ItemKind::Rule,
            "RULE.md",
            "# Example rule\n\nState the conventions this rule enforces.\n",
        ),
        (
            ItemKind::Skill,
            "SKILL.md",
            "# Example skill\n\nExplain when to use this skill and the steps it follows.\n",
        ),
    ];

    let mut written = Vec::new();
    for (kind, payload, body) in examples {
        let item_dir = dir.join(kind.category()).join(EXAMPLE_ID);
        fs::create_dir_all(&item_dir)?;
        write_manifest(
            &item_dir.join(MANIFEST_FILE),
            &ItemManifest {
                version: "1.0.0".to_string(),
                project_types: vec!["backend".to_string()],
                description: Some(format!("Example {}", kind)),
            },
        )?;
        fs::write(item_dir.join(payload), body)?;
        written.push(item_dir);
    }

    let bundle_dir = dir.join(ItemKind::Bundle.category()).join(EXAMPLE_ID);
    fs::create_dir_all(&bundle_dir)?;
    write_manifest(
        &bundle_dir.join(MANIFEST_FILE),
        &BundleManifest {
            version: "1.0.0".to_string(),
            project_types: vec!["backend".to_string()],
            description: Some("Example bundle".to_string()),
            items: vec![BundleItemRef {
                kind: ItemKind::Rule,
                id: EXAMPLE_ID.to_string(),
            }],
        },
    )?;
    written.push(bundle_dir);

    Ok(written)
}

use anyhow::Result;
use forge::{list_items, parse_project_types, ItemKind};

use super::{fetch_catalog, open_project, registry_source};

pub fn run(
    category: Option<String>,
    project_type: Option<String>,
    all: bool,
    installed: bool,
    json: bool,
) -> Result<()> {
    let category: Option<ItemKind> = category.as_deref().map(str::parse).transpose()?;
    let (_root, project) = open_project()?;

    if installed {
        let records: Vec<_> = project
            .installed
            .iter()
            .filter(|record| category.map_or(true, |kind| record.kind == kind))
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            println!("No installed items.");
            println!();
            println!("Install items with: forge install <kind> <id>");
            return Ok(());
        }

        for record in &records {
            println!(
                "{}\t{}\t{}\t(ref {})",
                record.kind, record.id, record.version, record.source_registry_ref
            );
        }
        println!();
        println!(
            "Total: {} item{}",
            records.len(),
            if records.len() == 1 { "" } else { "s" }
        );
        return Ok(());
    }

    let project_types = match project_type {
        Some(raw) => parse_project_types(&raw)?,
        None => project.project_types.clone(),
    };

    let source = registry_source()?;
    let (_registry_root, items) = fetch_catalog(&source, &project)?;
    let filter = if all { None } else { Some(project_types.as_slice()) };
    let listed = list_items(&items, filter, category);

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    for item in listed {
        let desc = item
            .description
            .as_deref()
            .map(|d| format!("  {}", d))
            .unwrap_or_default();
        let marker = if project.is_installed(item.kind, &item.id) {
            " [installed]"
        } else {
            ""
        };
        println!("{}\t{}\t{}{}{}", item.kind, item.id, item.version, marker, desc);
    }

    Ok(())
}

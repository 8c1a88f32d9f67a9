use anyhow::Result;
use forge::{describe_item, ItemKind};

use super::{fetch_catalog, open_project, registry_source};

pub fn run(kind: String, id: String, json: bool) -> Result<()> {
    let kind: ItemKind = kind.parse()?;
    let (_root, config) = open_project()?;

    let source = registry_source()?;
    let (_registry_root, items) = fetch_catalog(&source, &config)?;
    let desc = describe_item(&items, kind, &id, Some(&config.project_types))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&desc)?);
        return Ok(());
    }

    println!("{} {}", desc.kind, desc.id);
    println!("  Version:       {}", desc.version);
    println!("  Project types: {}", desc.project_types.join(", "));
    if let Some(ref description) = desc.description {
        println!("  Description:   {}", description);
    }
    println!("  Registry path: {}", desc.path);

    if let Some(ref members) = desc.members {
        println!();
        println!("Bundle members:");
        for member in members {
            let marker = match member.status {
                forge::MemberStatus::Ok => "✓",
                forge::MemberStatus::Missing => "✗",
                forge::MemberStatus::Incompatible => "⚠",
            };
            println!(
                "  {} {} {} @ {} ({})",
                marker,
                member.kind,
                member.id,
                member.version.as_deref().unwrap_or("-"),
                member.status
            );
            if !member.project_types.is_empty() {
                println!("      project types: {}", member.project_types.join(", "));
            }
            if let Some(ref description) = member.description {
                println!("      {}", description);
            }
        }
    }

    Ok(())
}

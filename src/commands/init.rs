use anyhow::{bail, Result};
use forge::{
    find_project_root, init_project, is_registry_root, join_project_types, parse_project_types,
    scaffold_registry, Config, RegistryConfig,
};
use std::env;

pub fn run(
    project_type: String,
    registry_url: Option<String>,
    registry_ref: Option<String>,
    registry: bool,
    with_examples: bool,
) -> Result<()> {
    let current_dir = env::current_dir()?;

    if registry {
        if let Some(existing) = find_project_root(&current_dir) {
            bail!(
                "Cannot initialize registry inside a Forge project ({}).",
                existing.display()
            );
        }
        if is_registry_root(&current_dir) {
            bail!("Registry layout already present in this directory.");
        }

        scaffold_registry(&current_dir, with_examples)?;

        println!("✓ Initialized Forge registry in {}", current_dir.display());
        println!();
        if with_examples {
            println!("Example items were added in agents/, rules/, skills/, and bundles/.");
        } else {
            println!("Add agents, rules, skills, and bundles in the respective directories.");
        }
        return Ok(());
    }

    let project_types = parse_project_types(&project_type)?;
    let user_config = Config::load()?;
    let registry = RegistryConfig {
        url: registry_url.unwrap_or(user_config.registry.default_url),
        git_ref: registry_ref.unwrap_or(user_config.registry.default_ref),
    };

    let config = init_project(&current_dir, project_types, registry)?;

    println!(
        "✓ Initialized Forge in {} with project types [{}]",
        current_dir.display(),
        join_project_types(&config.project_types)
    );
    println!("  Registry: {}@{}", config.registry.url, config.registry.git_ref);
    println!();
    println!("Next steps:");
    println!("  • Browse the registry: forge list");
    println!("  • Install an item: forge install <kind> <id>");

    Ok(())
}

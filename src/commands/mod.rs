pub mod describe;
pub mod init;
pub mod install;
pub mod list;
pub mod remove;
pub mod update;

use anyhow::Result;
use forge::{
    load_project, scan_registry, Config, ProgressCallback, ProjectConfig, RegistryItem,
    RegistrySource,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Create an indicatif-based progress callback for CLI display
pub fn create_spinner_callback() -> ProgressCallback {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let spinner = Arc::new(Mutex::new(spinner));
    Arc::new(move |msg: &str, current: u64, total: u64| {
        if let Ok(s) = spinner.lock() {
            if current >= total && total > 0 {
                s.finish_with_message(format!("✓ {}", msg));
            } else {
                s.set_message(msg.to_string());
            }
        }
    })
}

/// Find the project enclosing the current directory
pub fn open_project() -> Result<(PathBuf, ProjectConfig)> {
    let current_dir = env::current_dir()?;
    Ok(load_project(current_dir)?)
}

/// Registry source from user settings, with a spinner on git fetches
pub fn registry_source() -> Result<RegistrySource> {
    let config = Config::load()?;
    let source = RegistrySource::from_config(&config)?;
    if matches!(source, RegistrySource::Git(_)) {
        return Ok(source.with_progress(create_spinner_callback()));
    }
    Ok(source)
}

/// Fetch the project's registry and build its catalog
pub fn fetch_catalog(
    source: &RegistrySource,
    project: &ProjectConfig,
) -> Result<(PathBuf, Vec<RegistryItem>)> {
    if let RegistrySource::Git(fetcher) = source {
        tracing::debug!(
            url = %project.registry.url,
            git_ref = %project.registry.git_ref,
            cache = %fetcher.repo_path(&project.registry.url, &project.registry.git_ref).display(),
            "fetching registry"
        );
    }
    let registry_root = source.fetch(&project.registry)?;
    tracing::debug!(root = %registry_root.display(), "registry ready");

    let scan = scan_registry(&registry_root)?;
    for skipped in &scan.skipped {
        tracing::debug!(
            kind = %skipped.kind,
            id = %skipped.id,
            reason = %skipped.reason,
            "skipping registry entry"
        );
    }

    Ok((registry_root, scan.items))
}

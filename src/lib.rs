//! Forge - a package manager for AI-assistant artifacts
//!
//! Forge installs agents, rules and skills from a git-hosted registry into a
//! project's `.cursor/` directory, filtered by the project's types. It
//! provides a simple CLI with:
//!
//! - Registry fetching via shallow git clones cached per (url, ref)
//! - Forgiving manifest parsing: a broken registry entry is skipped, not fatal
//! - Project-type compatibility filtering for listing, install and update
//! - Bundles that expand into their member items, installed all-or-nothing
//! - A project state file recording exactly what was installed and from where
//!
//! # Examples
//!
//! ```no_run
//! use forge::{get_registry_items, list_items, load_project, Config, RegistrySource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Locate the enclosing project
//! let (_root, project) = load_project(".")?;
//!
//! // Fetch its registry
//! let source = RegistrySource::from_config(&Config::load()?)?;
//! let registry_root = source.fetch(&project.registry)?;
//!
//! // List what fits this project
//! let items = get_registry_items(&registry_root)?;
//! for item in list_items(&items, Some(&project.project_types), None) {
//!     println!("{} {} {}", item.kind, item.id, item.version);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`manifest`] - Parse registry `manifest.yaml` descriptors
//! - [`registry`] - Build the catalog and fetch registries
//! - [`resolver`] - Project-type compatibility and bundle resolution
//! - [`installer`] - Copy payloads into `.cursor/`
//! - [`remover`] - Remove installed items
//! - [`updater`] - Reinstall items from a fresh registry
//! - [`project`] - Project state (`.forge/config.yaml`)
//! - [`config`] - User settings (`~/.forge/config.toml`)
//! - [`git`] - Shallow clone cache driven by the `git` command
//! - [`error`] - Error types and result handling

pub mod config;
pub mod describe;
pub mod error;
pub mod git;
pub mod installer;
pub mod kind;
pub mod manifest;
pub mod project;
pub mod registry;
pub mod remover;
pub mod resolver;
pub mod scaffold;
pub mod updater;

pub use config::Config;
pub use describe::{describe_item, ItemDescription, MemberDescription};
pub use error::{Error, Result};
pub use git::{registry_cache_key, GitFetcher, ProgressCallback};
pub use installer::{destination_path, install_bundle, install_item};
pub use kind::{join_project_types, parse_project_types, ItemKind, ProjectType};
pub use manifest::{BundleItemRef, ManifestOutcome, SkipReason};
pub use project::{
    find_project_root, init_project, load_project, InstalledItem, ProjectConfig, RegistryConfig,
};
pub use registry::{
    get_registry_items, scan_registry, ItemIndex, RegistryItem, RegistryScan, RegistrySource,
    SkippedItem,
};
pub use remover::remove_item;
pub use resolver::{
    ensure_compatible, is_compatible, list_items, resolve_bundle_members, MemberStatus,
    ResolvedMember,
};
pub use scaffold::{is_registry_root, scaffold_registry};
pub use updater::{update_all, update_item, UpdateOutcome};

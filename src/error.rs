use std::path::PathBuf;
use thiserror::Error;

use crate::kind::ItemKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Not in a Forge project\n\n\
             Hint: No .forge/config.yaml was found in this directory or any parent.\n\n\
             Try: forge init --project-type backend")]
    ProjectNotFound,

    #[error("Forge is already initialized in {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Registry error: {0}\n\n\
             Hint: Forge fetches the registry with git.\n\n\
             Possible solutions:\n\
             1. Make sure git is installed and on PATH\n\
             2. Check the registry url and ref in .forge/config.yaml\n\
             3. Set FORGE_REGISTRY_PATH to use a local registry checkout")]
    Fetch(String),

    #[error("Item not found: {kind}/{id}")]
    ItemNotFound { kind: ItemKind, id: String },

    #[error("{kind}/{id} is not compatible with project types [{}]", .project_types.join(", "))]
    Incompatible {
        kind: ItemKind,
        id: String,
        project_types: Vec<String>,
    },

    #[error("Payload for {kind}/{id} not found in {}", .path.display())]
    PayloadMissing {
        kind: ItemKind,
        id: String,
        path: PathBuf,
    },

    #[error("Items of kind '{0}' cannot be installed directly")]
    NotInstallable(ItemKind),

    #[error("Bundle '{0}' has no installable members")]
    InvalidBundle(String),

    #[error("Invalid project type: {0}. Use data, backend, frontend, infra, or product.")]
    InvalidProjectType(String),

    #[error("Invalid kind: {0}. Use agent, rule, skill, bundle, workflow, or prompt.")]
    InvalidKind(String),

    #[error("{0}")]
    Other(String),
}

//! Project state (`.forge/config.yaml`)
//!
//! A project is any directory containing `.forge/config.yaml`. The file
//! records the project's types, the registry it installs from, and every
//! installed item. The `installed` list is the source of truth for remove and
//! update; the `.cursor/` tree is never scanned to rediscover items.
//!
//! Loading is forgiving about older or hand-edited files: the legacy singular
//! `project_type` key is accepted, unknown project types are dropped, and
//! malformed `installed` entries are ignored.

use crate::kind::{ItemKind, ProjectType};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker directory at the project root
pub const FORGE_DIR: &str = ".forge";

/// Project state file inside [`FORGE_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Registry a project installs from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryConfig {
    pub url: String,

    /// Branch or tag
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Snapshot of one installed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledItem {
    /// Always an installable kind (agent, rule, or skill)
    pub kind: ItemKind,
    pub id: String,
    pub version: String,

    /// Registry ref in effect when the item was installed
    pub source_registry_ref: String,
}

impl InstalledItem {
    pub fn matches(&self, kind: ItemKind, id: &str) -> bool {
        self.kind == kind && self.id == id
    }
}

/// Project-level Forge configuration
///
/// Only ever written through serde; reading goes through a tolerant raw
/// shape that is normalised field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    /// Never empty, no duplicates, first-seen order
    pub project_types: Vec<ProjectType>,

    pub registry: RegistryConfig,

    pub installed: Vec<InstalledItem>,
}

/// On-disk shape before normalisation
#[derive(Debug, Default, Deserialize)]
struct RawProjectConfig {
    #[serde(default)]
    project_types: Option<Value>,

    /// Legacy single-type key
    #[serde(default)]
    project_type: Option<Value>,

    #[serde(default)]
    registry: Option<Value>,

    #[serde(default)]
    installed: Option<Value>,
}

impl ProjectConfig {
    pub fn new(project_types: Vec<ProjectType>, registry: RegistryConfig) -> Self {
        Self {
            project_types: normalize_project_types(project_types),
            registry,
            installed: Vec::new(),
        }
    }

    /// Path of the state file for a project root
    pub fn config_path<P: AsRef<Path>>(project_root: P) -> PathBuf {
        project_root.as_ref().join(FORGE_DIR).join(CONFIG_FILE)
    }

    /// Check if `.forge/config.yaml` exists directly in the given directory
    pub fn exists<P: AsRef<Path>>(project_root: P) -> bool {
        Self::config_path(project_root).is_file()
    }

    /// Load project config from `<project_root>/.forge/config.yaml`
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load<P: AsRef<Path>>(project_root: P) -> Result<Option<Self>> {
        let path = Self::config_path(project_root);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let raw: RawProjectConfig = serde_yaml::from_str(&content).map_err(|e| {
            Error::Other(format!(
                "{} is not a valid Forge config: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(Self::from_raw(raw)))
    }

    /// Save project config, creating `.forge/` if needed
    pub fn save<P: AsRef<Path>>(&self, project_root: P) -> Result<()> {
        let path = Self::config_path(project_root);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Find the installation record for (kind, id)
    pub fn find_installed(&self, kind: ItemKind, id: &str) -> Option<&InstalledItem> {
        self.installed.iter().find(|i| i.matches(kind, id))
    }

    pub fn is_installed(&self, kind: ItemKind, id: &str) -> bool {
        self.find_installed(kind, id).is_some()
    }

    /// Project type names as plain strings (for messages and errors)
    pub fn project_type_names(&self) -> Vec<String> {
        self.project_types.iter().map(|t| t.to_string()).collect()
    }

    fn from_raw(raw: RawProjectConfig) -> Self {
        let registry = raw.registry.as_ref().and_then(Value::as_mapping);
        let url = registry
            .and_then(|r| r.get("url"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let git_ref = registry
            .and_then(|r| r.get("ref"))
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty())
            .unwrap_or(crate::config::DEFAULT_REGISTRY_REF)
            .to_string();

        let installed = raw
            .installed
            .as_ref()
            .and_then(Value::as_sequence)
            .map(|entries| entries.iter().filter_map(installed_entry).collect())
            .unwrap_or_default();

        // A non-empty list wins over the legacy singular key
        let listed: Vec<String> = raw
            .project_types
            .as_ref()
            .and_then(Value::as_sequence)
            .map(|seq| seq.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        let names = if listed.is_empty() {
            raw.project_type
                .as_ref()
                .and_then(Value::as_str)
                .map(|t| vec![t.to_string()])
                .unwrap_or_default()
        } else {
            listed
        };
        let project_types = names.iter().filter_map(|n| n.parse().ok()).collect();

        Self {
            project_types: normalize_project_types(project_types),
            registry: RegistryConfig { url, git_ref },
            installed,
        }
    }
}

fn installed_entry(value: &Value) -> Option<InstalledItem> {
    let map = value.as_mapping()?;
    let field = |name: &str| {
        let value = match map.get(name)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(value).filter(|v| !v.is_empty())
    };

    let kind: ItemKind = field("kind")?.parse().ok()?;
    if !kind.is_installable() {
        return None;
    }

    Some(InstalledItem {
        kind,
        id: field("id")?,
        version: field("version")?,
        source_registry_ref: field("source_registry_ref")?,
    })
}

/// Drop duplicates (keeping first-seen order); empty becomes `[backend]`
fn normalize_project_types(types: Vec<ProjectType>) -> Vec<ProjectType> {
    let mut unique = Vec::with_capacity(types.len());
    for t in types {
        if !unique.contains(&t) {
            unique.push(t);
        }
    }
    if unique.is_empty() {
        unique.push(ProjectType::default());
    }
    unique
}

/// Walk up from `start` until a directory containing `.forge/config.yaml` is found
pub fn find_project_root<P: AsRef<Path>>(start: P) -> Option<PathBuf> {
    let start = start.as_ref();
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    let start = if start.is_dir() {
        start
    } else {
        start.parent()?.to_path_buf()
    };

    start
        .ancestors()
        .find(|dir| ProjectConfig::exists(dir))
        .map(Path::to_path_buf)
}

/// Locate the enclosing project and load its config
pub fn load_project<P: AsRef<Path>>(start: P) -> Result<(PathBuf, ProjectConfig)> {
    let root = find_project_root(start).ok_or(Error::ProjectNotFound)?;
    let config = ProjectConfig::load(&root)?.ok_or(Error::ProjectNotFound)?;
    Ok((root, config))
}

/// Create `.forge/config.yaml` in `dir`
///
/// Fails with [`Error::ConfigExists`] if `dir` or any parent is already a project.
pub fn init_project<P: AsRef<Path>>(
    dir: P,
    project_types: Vec<ProjectType>,
    registry: RegistryConfig,
) -> Result<ProjectConfig> {
    let dir = dir.as_ref();

    if let Some(existing) = find_project_root(dir) {
        return Err(Error::ConfigExists(existing));
    }

    let config = ProjectConfig::new(project_types, registry);
    config.save(dir)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> RegistryConfig {
        RegistryConfig {
            url: "https://example.com/registry.git".to_string(),
            git_ref: "main".to_string(),
        }
    }

    fn write_config(dir: &Path, content: &str) {
        fs::create_dir_all(dir.join(FORGE_DIR)).unwrap();
        fs::write(ProjectConfig::config_path(dir), content).unwrap();
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(ProjectConfig::load(temp_dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ProjectConfig::new(
            vec![ProjectType::Data, ProjectType::Frontend],
            RegistryConfig {
                url: "git@github.com:org/registry.git".to_string(),
                git_ref: "v1.2.0".to_string(),
            },
        );
        config.installed.push(InstalledItem {
            kind: ItemKind::Skill,
            id: "sql-review".to_string(),
            version: "0.3.1".to_string(),
            source_registry_ref: "v1.2.0".to_string(),
        });
        config.save(temp_dir.path()).unwrap();

        let loaded = ProjectConfig::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_saved_file_uses_ref_key() {
        let temp_dir = TempDir::new().unwrap();
        ProjectConfig::new(vec![ProjectType::Backend], registry())
            .save(temp_dir.path())
            .unwrap();

        let content = fs::read_to_string(ProjectConfig::config_path(temp_dir.path())).unwrap();
        assert!(content.contains("ref: main"));
        assert!(content.contains("project_types:"));
        assert!(!content.contains("git_ref"));
    }

    #[test]
    fn test_legacy_project_type_is_migrated() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "project_type: data\nregistry:\n  url: https://example.com/registry.git\n  ref: main\ninstalled: []\n",
        );

        let config = ProjectConfig::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.project_types, vec![ProjectType::Data]);
    }

    #[test]
    fn test_invalid_project_types_are_filtered() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "project_types: [mobile, infra, infra, product]\nregistry:\n  url: u\n",
        );

        let config = ProjectConfig::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(
            config.project_types,
            vec![ProjectType::Infra, ProjectType::Product]
        );
        assert_eq!(config.registry.git_ref, "main");
    }

    #[test]
    fn test_no_valid_project_types_defaults_to_backend() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "project_types: [mobile]\nregistry:\n  url: u\n");

        let config = ProjectConfig::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.project_types, vec![ProjectType::Backend]);
    }

    #[test]
    fn test_malformed_installed_entries_are_dropped() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            r#"project_types: [backend]
registry:
  url: u
  ref: main
installed:
  - kind: rule
    id: good
    version: 1.0.0
    source_registry_ref: main
  - kind: bundle
    id: not-installable
    version: 1.0.0
    source_registry_ref: main
  - kind: agent
    id: no-version
    source_registry_ref: main
  - just-a-string
"#,
        );

        let config = ProjectConfig::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.installed.len(), 1);
        assert_eq!(config.installed[0].id, "good");
    }

    #[test]
    fn test_non_mapping_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "- just\n- a list\n");
        assert!(ProjectConfig::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_find_project_root_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        ProjectConfig::new(vec![ProjectType::Backend], registry())
            .save(&root)
            .unwrap();

        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), Some(root.clone()));
        assert_eq!(find_project_root(&root), Some(root));
    }

    #[test]
    fn test_find_project_root_not_found() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_project_root(temp_dir.path()).is_none());
        assert!(matches!(
            load_project(temp_dir.path()),
            Err(Error::ProjectNotFound)
        ));
    }

    #[test]
    fn test_init_project_refuses_nested_project() {
        let temp_dir = TempDir::new().unwrap();
        init_project(temp_dir.path(), vec![ProjectType::Backend], registry()).unwrap();

        let nested = temp_dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        let err = init_project(&nested, vec![ProjectType::Data], registry()).unwrap_err();
        assert!(matches!(err, Error::ConfigExists(_)));
        assert!(!ProjectConfig::exists(&nested));
    }

    #[test]
    fn test_new_deduplicates_project_types() {
        let config = ProjectConfig::new(
            vec![ProjectType::Data, ProjectType::Data, ProjectType::Infra],
            registry(),
        );
        assert_eq!(config.project_types, vec![ProjectType::Data, ProjectType::Infra]);
    }
}

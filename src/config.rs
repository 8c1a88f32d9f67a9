//! User configuration management
//!
//! This module handles reading and writing Forge's user-level settings.
//! Settings are stored in TOML format at `~/.forge/config.toml` and control
//! where registries are cached, how git is invoked, and which registry a new
//! project points at. Per-project state lives in [`crate::project`] instead.
//!
//! # Examples
//!
//! ```no_run
//! use forge::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//!
//! println!("Cache directory: {}", config.cache_dir()?.display());
//! println!("Default registry: {}", config.registry.default_url);
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Registry new projects point at unless `--registry-url` is given
pub const DEFAULT_REGISTRY_URL: &str = "https://github.com/DrivvenConsulting/forge-registry.git";

/// Branch or tag used unless `--registry-ref` is given
pub const DEFAULT_REGISTRY_REF: &str = "main";

/// User configuration file (`~/.forge/config.toml`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Registry clone cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Git invocation settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Registry defaults
    #[serde(default)]
    pub registry: RegistryDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Root directory holding one clone per (url, ref); `~` is expanded
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

fn default_cache_dir() -> String {
    "~/.forge/cache".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Git executable
    #[serde(default = "default_git")]
    pub git: String,

    /// Ceiling for a fresh `git clone`
    #[serde(default = "default_clone_timeout")]
    pub clone_timeout_seconds: u64,

    /// Ceiling for each `git fetch` / `git checkout` of an existing clone
    #[serde(default = "default_update_timeout")]
    pub update_timeout_seconds: u64,
}

fn default_git() -> String {
    "git".to_string()
}

fn default_clone_timeout() -> u64 {
    120
}

fn default_update_timeout() -> u64 {
    60
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            clone_timeout_seconds: default_clone_timeout(),
            update_timeout_seconds: default_update_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryDefaults {
    #[serde(default = "default_registry_url")]
    pub default_url: String,

    #[serde(default = "default_registry_ref")]
    pub default_ref: String,

    /// Pre-fetched registry directory; when set, git is never invoked
    #[serde(default)]
    pub local_path: Option<String>,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_registry_ref() -> String {
    DEFAULT_REGISTRY_REF.to_string()
}

impl Default for RegistryDefaults {
    fn default() -> Self {
        Self {
            default_url: default_registry_url(),
            default_ref: default_registry_ref(),
            local_path: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses FORGE_CONFIG_DIR if set, otherwise ~/.forge/config.toml
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(config_dir) = std::env::var("FORGE_CONFIG_DIR") {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not find home directory".to_string()))?;

        Ok(home.join(".forge").join("config.toml"))
    }

    /// Load config from file, or the defaults if it doesn't exist
    ///
    /// Environment variable overrides:
    /// - `FORGE_CACHE_DIR`: overrides `cache.dir`
    /// - `FORGE_REGISTRY_PATH`: overrides `registry.local_path`
    /// - `FORGE_CONFIG_DIR`: overrides the config directory location
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Self::default_path()?)?;

        if let Ok(dir) = std::env::var("FORGE_CACHE_DIR") {
            if !dir.is_empty() {
                config.cache.dir = dir;
            }
        }

        if let Ok(path) = std::env::var("FORGE_REGISTRY_PATH") {
            if !path.is_empty() {
                config.registry.local_path = Some(path);
            }
        }

        Ok(config)
    }

    /// Load config from a specific path without applying env overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Cache root with `~` expanded
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.cache.dir)
            .map_err(|e| Error::Other(format!("Invalid cache directory '{}': {}", self.cache.dir, e)))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Local registry override with `~` expanded
    pub fn local_registry_path(&self) -> Option<PathBuf> {
        self.registry
            .local_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }
}

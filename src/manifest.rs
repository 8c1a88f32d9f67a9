//! Manifest handling for registry `manifest.yaml` descriptors
//!
//! Registries are user-authored content spread across many directories, so a
//! malformed manifest never aborts a catalog build. Parsing yields a
//! [`ManifestOutcome`]: either the validated manifest or the reason it was
//! skipped. Only infrastructure problems (a manifest that exists but cannot be
//! read) surface as [`Error`](crate::Error).
//!
//! # Examples
//!
//! ```no_run
//! use forge::manifest::{parse_item_manifest, ManifestOutcome};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! match parse_item_manifest(Path::new("rules/test-rule/manifest.yaml"))? {
//!     ManifestOutcome::Valid(manifest) => println!("version {}", manifest.version),
//!     ManifestOutcome::Skipped(reason) => println!("skipped: {}", reason),
//! }
//! # Ok(())
//! # }
//! ```

use crate::kind::ItemKind;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Descriptor file name inside every item directory
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Manifest for a single agent, rule, skill, workflow, or prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemManifest {
    pub version: String,

    /// Free-form project type tags; unknown tags are kept and simply never match
    pub project_types: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reference to a member item inside a bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleItemRef {
    pub kind: ItemKind,
    pub id: String,
}

/// Manifest for a bundle: item fields plus the ordered member list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub version: String,

    pub project_types: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Never empty and never references another bundle
    pub items: Vec<BundleItemRef>,
}

/// Why a manifest was left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFile,
    InvalidYaml(String),
    NotAMapping,
    MissingField(&'static str),
    InvalidField(&'static str),
    NoBundleItems,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFile => write!(f, "{} not found", MANIFEST_FILE),
            SkipReason::InvalidYaml(e) => write!(f, "invalid YAML: {}", e),
            SkipReason::NotAMapping => write!(f, "manifest is not a mapping"),
            SkipReason::MissingField(name) => write!(f, "missing required field '{}'", name),
            SkipReason::InvalidField(name) => write!(f, "invalid value for '{}'", name),
            SkipReason::NoBundleItems => write!(f, "bundle has no valid item references"),
        }
    }
}

/// Result of parsing one manifest
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestOutcome<T> {
    Valid(T),
    Skipped(SkipReason),
}

impl<T> ManifestOutcome<T> {
    pub fn valid(self) -> Option<T> {
        match self {
            ManifestOutcome::Valid(manifest) => Some(manifest),
            ManifestOutcome::Skipped(_) => None,
        }
    }
}

impl<T> From<std::result::Result<T, SkipReason>> for ManifestOutcome<T> {
    fn from(result: std::result::Result<T, SkipReason>) -> Self {
        match result {
            Ok(manifest) => ManifestOutcome::Valid(manifest),
            Err(reason) => ManifestOutcome::Skipped(reason),
        }
    }
}

/// Parse the manifest of a non-bundle item
pub fn parse_item_manifest(path: &Path) -> Result<ManifestOutcome<ItemManifest>> {
    Ok(match read_manifest(path)? {
        Some(content) => item_manifest_from_str(&content).into(),
        None => ManifestOutcome::Skipped(SkipReason::MissingFile),
    })
}

/// Parse the manifest of a bundle
pub fn parse_bundle_manifest(path: &Path) -> Result<ManifestOutcome<BundleManifest>> {
    Ok(match read_manifest(path)? {
        Some(content) => bundle_manifest_from_str(&content).into(),
        None => ManifestOutcome::Skipped(SkipReason::MissingFile),
    })
}

/// Write a manifest as YAML (used by registry scaffolding)
pub fn write_manifest<T: Serialize>(path: &Path, manifest: &T) -> Result<()> {
    let content = serde_yaml::to_string(manifest)?;
    fs::write(path, content)?;
    Ok(())
}

fn read_manifest(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn item_manifest_from_str(content: &str) -> std::result::Result<ItemManifest, SkipReason> {
    let value = load_yaml(content)?;
    let map = value.as_mapping().ok_or(SkipReason::NotAMapping)?;
    item_fields(map)
}

fn bundle_manifest_from_str(content: &str) -> std::result::Result<BundleManifest, SkipReason> {
    let value = load_yaml(content)?;
    let map = value.as_mapping().ok_or(SkipReason::NotAMapping)?;
    let base = item_fields(map)?;

    let refs = required(map, "items")?
        .as_sequence()
        .ok_or(SkipReason::InvalidField("items"))?;

    // Malformed references are dropped one by one; only an empty result rejects the bundle
    let items: Vec<BundleItemRef> = refs.iter().filter_map(bundle_ref).collect();
    if items.is_empty() {
        return Err(SkipReason::NoBundleItems);
    }

    Ok(BundleManifest {
        version: base.version,
        project_types: base.project_types,
        description: base.description,
        items,
    })
}

fn load_yaml(content: &str) -> std::result::Result<Value, SkipReason> {
    serde_yaml::from_str(content).map_err(|e| SkipReason::InvalidYaml(e.to_string()))
}

fn item_fields(map: &Mapping) -> std::result::Result<ItemManifest, SkipReason> {
    let version = scalar_to_string(required(map, "version")?)
        .filter(|v| !v.is_empty())
        .ok_or(SkipReason::InvalidField("version"))?;

    let project_types = required(map, "project_types")?
        .as_sequence()
        .and_then(|seq| seq.iter().map(scalar_to_string).collect::<Option<Vec<_>>>())
        .filter(|types| !types.is_empty())
        .ok_or(SkipReason::InvalidField("project_types"))?;

    let description = map
        .get("description")
        .and_then(scalar_to_string)
        .filter(|d| !d.is_empty());

    Ok(ItemManifest {
        version,
        project_types,
        description,
    })
}

fn required<'a>(map: &'a Mapping, name: &'static str) -> std::result::Result<&'a Value, SkipReason> {
    map.get(name)
        .filter(|v| !v.is_null())
        .ok_or(SkipReason::MissingField(name))
}

fn bundle_ref(value: &Value) -> Option<BundleItemRef> {
    let map = value.as_mapping()?;
    let kind: ItemKind = map.get("kind")?.as_str()?.parse().ok()?;
    if kind.is_bundle() {
        return None;
    }
    let id = map.get("id").and_then(scalar_to_string)?;
    if id.is_empty() {
        return None;
    }
    Some(BundleItemRef { kind, id })
}

/// YAML scalars are accepted as strings (`version: 1.0` reads as "1.0")
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

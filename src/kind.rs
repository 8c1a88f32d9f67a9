//! Item kinds and project types
//!
//! Every registry entry has an [`ItemKind`] that decides which category
//! directory it lives in and where (if anywhere) it is installed. Projects and
//! items both declare [`ProjectType`] tags; an item is usable in a project when
//! the two sets intersect.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Agent,
    Rule,
    Skill,
    Bundle,
    Workflow,
    Prompt,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Agent,
        ItemKind::Rule,
        ItemKind::Skill,
        ItemKind::Bundle,
        ItemKind::Workflow,
        ItemKind::Prompt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Agent => "agent",
            ItemKind::Rule => "rule",
            ItemKind::Skill => "skill",
            ItemKind::Bundle => "bundle",
            ItemKind::Workflow => "workflow",
            ItemKind::Prompt => "prompt",
        }
    }

    /// Registry directory holding items of this kind (e.g. `agents`)
    pub fn category(&self) -> &'static str {
        match self {
            ItemKind::Agent => "agents",
            ItemKind::Rule => "rules",
            ItemKind::Skill => "skills",
            ItemKind::Bundle => "bundles",
            ItemKind::Workflow => "workflows",
            ItemKind::Prompt => "prompts",
        }
    }

    /// Kinds with a destination layout inside a project
    pub fn is_installable(&self) -> bool {
        matches!(self, ItemKind::Agent | ItemKind::Rule | ItemKind::Skill)
    }

    pub fn is_bundle(&self) -> bool {
        *self == ItemKind::Bundle
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidKind(s.to_string()))
    }
}

/// Kind of codebase a project is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Data,
    Backend,
    Frontend,
    Infra,
    Product,
}

impl ProjectType {
    pub const ALL: [ProjectType; 5] = [
        ProjectType::Data,
        ProjectType::Backend,
        ProjectType::Frontend,
        ProjectType::Infra,
        ProjectType::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Data => "data",
            ProjectType::Backend => "backend",
            ProjectType::Frontend => "frontend",
            ProjectType::Infra => "infra",
            ProjectType::Product => "product",
        }
    }
}

impl Default for ProjectType {
    fn default() -> Self {
        ProjectType::Backend
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidProjectType(s.to_string()))
    }
}

/// Parse a comma-separated project type list (e.g. `"backend, data"`)
///
/// Keeps first-seen order and drops duplicates. An empty list defaults to
/// `[backend]`; any unknown value is rejected.
pub fn parse_project_types(input: &str) -> Result<Vec<ProjectType>> {
    let mut types = Vec::new();
    for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let parsed: ProjectType = raw.parse()?;
        if !types.contains(&parsed) {
            types.push(parsed);
        }
    }
    if types.is_empty() {
        types.push(ProjectType::default());
    }
    Ok(types)
}

/// Render project types the way they appear in messages (`backend, data`)
pub fn join_project_types(types: &[ProjectType]) -> String {
    types
        .iter()
        .map(ProjectType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Detailed view of a single catalog entry

use crate::kind::{ItemKind, ProjectType};
use crate::registry::{ItemIndex, RegistryItem};
use crate::resolver::{resolve_bundle_members, MemberStatus};
use crate::{Error, Result};
use serde::Serialize;

/// Everything `forge describe` shows about an item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDescription {
    pub kind: ItemKind,
    pub id: String,
    pub version: String,
    pub project_types: Vec<String>,
    pub description: Option<String>,
    pub path: String,

    /// Resolved members; bundles only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberDescription>>,
}

/// One bundle member as it resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDescription {
    pub kind: ItemKind,
    pub id: String,
    pub version: Option<String>,
    pub project_types: Vec<String>,
    pub description: Option<String>,
    pub path: Option<String>,
    pub status: MemberStatus,
}

/// Describe (kind, id) from a catalog
///
/// For bundles each member is resolved; when `project_types` is given,
/// members outside it are marked incompatible.
pub fn describe_item(
    items: &[RegistryItem],
    kind: ItemKind,
    id: &str,
    project_types: Option<&[ProjectType]>,
) -> Result<ItemDescription> {
    let index = ItemIndex::new(items);
    let item = index.get(kind, id).ok_or_else(|| Error::ItemNotFound {
        kind,
        id: id.to_string(),
    })?;

    let members = item.items.as_ref().map(|_| {
        resolve_bundle_members(item, &index, project_types)
            .into_iter()
            .map(|member| MemberDescription {
                kind: member.reference.kind,
                id: member.reference.id.clone(),
                version: member.item.map(|i| i.version.clone()),
                project_types: member
                    .item
                    .map(|i| i.project_types.clone())
                    .unwrap_or_default(),
                description: member.item.and_then(|i| i.description.clone()),
                path: member.item.map(|i| i.path.clone()),
                status: member.status,
            })
            .collect()
    });

    Ok(ItemDescription {
        kind: item.kind,
        id: item.id.clone(),
        version: item.version.clone(),
        project_types: item.project_types.clone(),
        description: item.description.clone(),
        path: item.path.clone(),
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::BundleItemRef;

    fn item(kind: ItemKind, id: &str, types: &[&str]) -> RegistryItem {
        RegistryItem {
            kind,
            id: id.to_string(),
            version: "1.0.0".to_string(),
            project_types: types.iter().map(|s| s.to_string()).collect(),
            description: Some(format!("{} {}", kind, id)),
            path: format!("{}/{}", kind.category(), id),
            items: None,
        }
    }

    #[test]
    fn test_describe_plain_item() {
        let items = vec![item(ItemKind::Workflow, "release", &["infra"])];
        let desc = describe_item(&items, ItemKind::Workflow, "release", None).unwrap();
        assert_eq!(desc.path, "workflows/release");
        assert!(desc.members.is_none());

        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["kind"], "workflow");
        assert!(json.get("members").is_none());
    }

    #[test]
    fn test_describe_bundle_members() {
        let mut bundle = item(ItemKind::Bundle, "b", &["backend"]);
        bundle.items = Some(vec![
            BundleItemRef {
                kind: ItemKind::Rule,
                id: "r".to_string(),
            },
            BundleItemRef {
                kind: ItemKind::Skill,
                id: "missing".to_string(),
            },
        ]);
        let items = vec![bundle, item(ItemKind::Rule, "r", &["data"])];

        let desc = describe_item(&items, ItemKind::Bundle, "b", Some(&[ProjectType::Backend]))
            .unwrap();
        let members = desc.members.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].status, MemberStatus::Incompatible);
        assert_eq!(members[0].version.as_deref(), Some("1.0.0"));
        assert_eq!(members[1].status, MemberStatus::Missing);
        assert!(members[1].path.is_none());
    }

    #[test]
    fn test_describe_unknown_item() {
        let items = vec![item(ItemKind::Rule, "r", &["data"])];
        assert!(matches!(
            describe_item(&items, ItemKind::Skill, "r", None),
            Err(Error::ItemNotFound { .. })
        ));
    }
}

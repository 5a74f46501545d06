//! Payloads of the project and data-management APIs, and the report record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const REVIT_EXTENSION: &str = ".rvt";
pub const REVIT_VERSION_FIELD: &str = "revitProjectVersion";

/// `GET /project/v1/hubs/{hub}/projects/{project}`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResponse {
    pub data: ProjectInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub attributes: ProjectAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectAttributes {
    pub name: String,
}

impl ProjectInfo {
    pub fn name(&self) -> &str {
        &self.attributes.name
    }
}

/// `GET .../topFolders`
#[derive(Debug, Clone, Deserialize)]
pub struct TopFoldersResponse {
    #[serde(default)]
    pub data: Vec<FolderNode>,
}

/// `GET /data/v1/projects/{project}/folders/{folder}/contents`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderContents {
    #[serde(default)]
    pub data: Vec<FolderNode>,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "folders")]
    Folder,
    #[serde(rename = "items")]
    Item,
    #[serde(other)]
    Other,
}

/// An entry of a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: String,
    #[serde(default)]
    pub attributes: NodeAttributes,
    #[serde(default)]
    pub relationships: Option<Relationships>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeAttributes {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

impl FolderNode {
    pub fn display_name(&self) -> &str {
        self.attributes.display_name.as_deref().unwrap_or("")
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_item(&self) -> bool {
        self.kind == NodeKind::Item
    }

    /// Id of the item's tip version, when the listing carries it.
    pub fn tip_version_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.tip.as_ref())
            .map(|link| link.data.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationships {
    #[serde(default)]
    pub tip: Option<Link>,
    #[serde(default)]
    pub item: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub data: LinkData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkData {
    pub id: String,
}

/// A side-loaded resource from the `included` list, usually an item version.
#[derive(Debug, Clone, Deserialize)]
pub struct IncludedResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: IncludedAttributes,
    #[serde(default)]
    pub relationships: Option<Relationships>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludedAttributes {
    #[serde(default)]
    pub extension: Option<Extension>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Extension {
    #[serde(default)]
    pub data: Option<serde_json::Map<String, Value>>,
}

impl IncludedResource {
    /// Whether this resource describes (a version of) the given item.
    pub fn belongs_to(&self, item: &FolderNode) -> bool {
        let by_item = self
            .relationships
            .as_ref()
            .and_then(|r| r.item.as_ref())
            .is_some_and(|link| link.data.id == item.id);
        let by_tip = item.tip_version_id().is_some_and(|tip| tip == self.id);
        by_item || by_tip
    }

    /// The non-empty `revitProjectVersion` from the extension data block.
    pub fn revit_version(&self) -> Option<String> {
        let value = self
            .attributes
            .extension
            .as_ref()?
            .data
            .as_ref()?
            .get(REVIT_VERSION_FIELD)?;
        let version = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!version.is_empty()).then_some(version)
    }
}

/// One line of the report. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevitMatch {
    #[serde(rename = "Project ID")]
    pub project_id: String,
    #[serde(rename = "Project name")]
    pub project_name: String,
    #[serde(rename = "Revit file name")]
    pub file_name: String,
    #[serde(rename = "Revit file ID")]
    pub file_id: String,
    #[serde(rename = "Revit version")]
    pub revit_version: String,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevitMatch {
    pub fn new(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        file_name: impl Into<String>,
        file_id: impl Into<String>,
        revit_version: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: project_name.into(),
            file_name: file_name.into(),
            file_id: file_id.into(),
            revit_version: revit_version.into(),
            error: None,
        }
    }

    /// Record for a project without a Revit model.
    pub fn not_found(project_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self::new(project_id, project_name, "", "", "")
    }

    /// Record for a project whose lookup failed and was skipped.
    pub fn failed(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::not_found(project_id, project_name)
        }
    }

    pub fn is_found(&self) -> bool {
        !self.file_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str, tip: Option<&str>) -> FolderNode {
        let mut value = json!({
            "type": "items",
            "id": id,
            "attributes": { "displayName": "Model.rvt" }
        });
        if let Some(tip) = tip {
            value["relationships"] = json!({ "tip": { "data": { "type": "versions", "id": tip } } });
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_folder_node_kinds() {
        let contents: FolderContents = serde_json::from_value(json!({
            "data": [
                { "type": "folders", "id": "f1", "attributes": { "displayName": "Plans" } },
                { "type": "items", "id": "i1", "attributes": { "displayName": "a.rvt" } },
                { "type": "links", "id": "l1" }
            ]
        }))
        .unwrap();

        assert!(contents.data[0].is_folder());
        assert!(contents.data[1].is_item());
        assert_eq!(contents.data[2].kind, NodeKind::Other);
        assert_eq!(contents.data[2].display_name(), "");
        assert!(contents.included.is_empty());
    }

    #[test]
    fn test_included_resource_links_to_item() {
        let by_item: IncludedResource = serde_json::from_value(json!({
            "type": "versions",
            "id": "v1",
            "relationships": { "item": { "data": { "type": "items", "id": "urn:item" } } }
        }))
        .unwrap();
        let unrelated: IncludedResource =
            serde_json::from_value(json!({ "type": "versions", "id": "v9" })).unwrap();

        assert!(by_item.belongs_to(&item("urn:item", None)));
        assert!(!by_item.belongs_to(&item("urn:other", None)));
        assert!(unrelated.belongs_to(&item("urn:x", Some("v9"))));
        assert!(!unrelated.belongs_to(&item("urn:x", Some("v1"))));
    }

    #[test]
    fn test_revit_version_accepts_strings_and_numbers() {
        let with = |data: serde_json::Value| -> IncludedResource {
            serde_json::from_value(json!({
                "id": "v",
                "attributes": { "extension": { "data": data } }
            }))
            .unwrap()
        };

        assert_eq!(with(json!({ "revitProjectVersion": "2023" })).revit_version().as_deref(), Some("2023"));
        assert_eq!(with(json!({ "revitProjectVersion": 2022 })).revit_version().as_deref(), Some("2022"));
        assert_eq!(with(json!({ "revitProjectVersion": "" })).revit_version(), None);
        assert_eq!(with(json!({ "other": "x" })).revit_version(), None);
    }

    #[test]
    fn test_report_record_key_order() {
        let record = RevitMatch::new("b.1", "Alpha", "Model.rvt", "urn:abc", "2023");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"Project ID":"b.1","Project name":"Alpha","Revit file name":"Model.rvt","Revit file ID":"urn:abc","Revit version":"2023"}"#
        );
    }

    #[test]
    fn test_failed_record_carries_error() {
        let record = RevitMatch::failed("b.2", "", "boom");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Error"], "boom");
        assert_eq!(value["Revit file ID"], "");
        assert!(!record.is_found());
    }
}

//! Depth-first search for the first Revit model below a folder.
//!
//! The walk visits listing entries in order and descends into a subfolder
//! before looking at that subfolder's later siblings, exactly like a
//! pre-order recursive walk. An explicit stack of listing frames replaces
//! the call stack, so deep trees cannot overflow it.

use crate::api::{ClientError, DataManagementClient};
use crate::model::{FolderContents, FolderNode, RevitMatch, REVIT_EXTENSION};
use tracing::{debug, trace};

/// Folders whose display name contains this are never descended into.
pub const SHARED_FOLDER_MARKER: &str = "Shared";

pub fn is_searchable_folder(node: &FolderNode) -> bool {
    node.is_folder() && !node.display_name().contains(SHARED_FOLDER_MARKER)
}

pub fn is_revit_item(node: &FolderNode) -> bool {
    node.is_item() && node.display_name().ends_with(REVIT_EXTENSION)
}

/// The Revit project version recorded for `item` in the listing's `included` side-list.
pub fn find_revit_version(contents: &FolderContents, item: &FolderNode) -> Option<String> {
    contents
        .included
        .iter()
        .filter(|resource| resource.belongs_to(item))
        .find_map(|resource| resource.revit_version())
}

struct Frame {
    folder_id: String,
    contents: FolderContents,
    next: usize,
}

/// Walk the tree below `folder_id` and return the first `.rvt` item that has
/// a Revit project version. Stops fetching as soon as a match is found.
pub async fn find_first_revit_match(
    client: &mut DataManagementClient,
    project_id: &str,
    project_name: &str,
    folder_id: &str,
) -> Result<Option<RevitMatch>, ClientError> {
    let contents = client.get_folder_contents(project_id, folder_id).await?;
    let mut stack = vec![Frame {
        folder_id: folder_id.to_string(),
        contents,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(node) = frame.contents.data.get(frame.next).cloned() else {
            trace!("Finished folder {}", frame.folder_id);
            stack.pop();
            continue;
        };
        frame.next += 1;

        if node.is_folder() {
            if !is_searchable_folder(&node) {
                debug!("Skipping shared folder \"{}\"", node.display_name());
                continue;
            }
            debug!("Descending into \"{}\" ({})", node.display_name(), node.id);
            let contents = client.get_folder_contents(project_id, &node.id).await?;
            stack.push(Frame {
                folder_id: node.id,
                contents,
                next: 0,
            });
        } else if is_revit_item(&node) {
            match find_revit_version(&frame.contents, &node) {
                Some(version) => {
                    debug!("Found \"{}\" with Revit version {}", node.display_name(), version);
                    return Ok(Some(RevitMatch::new(
                        project_id,
                        project_name,
                        node.display_name(),
                        node.id.as_str(),
                        version,
                    )));
                }
                None => trace!("\"{}\" carries no Revit version", node.display_name()),
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(kind: &str, id: &str, name: &str) -> FolderNode {
        serde_json::from_value(json!({
            "type": kind,
            "id": id,
            "attributes": { "displayName": name }
        }))
        .unwrap()
    }

    #[test]
    fn test_shared_folders_are_not_searchable() {
        assert!(is_searchable_folder(&node("folders", "1", "Plans")));
        assert!(!is_searchable_folder(&node("folders", "2", "Shared Drawings")));
        assert!(!is_searchable_folder(&node("folders", "3", "Team Shared")));
        assert!(!is_searchable_folder(&node("items", "4", "Plans")));
    }

    #[test]
    fn test_revit_item_requires_exact_suffix() {
        assert!(is_revit_item(&node("items", "1", "Model.rvt")));
        assert!(!is_revit_item(&node("items", "2", "Model.RVT")));
        assert!(!is_revit_item(&node("items", "3", "Model.rvt.bak")));
        assert!(!is_revit_item(&node("folders", "4", "odd.rvt")));
    }

    #[test]
    fn test_find_revit_version_uses_linked_resource() {
        let contents: FolderContents = serde_json::from_value(json!({
            "data": [
                { "type": "items", "id": "urn:a", "attributes": { "displayName": "A.rvt" } },
                { "type": "items", "id": "urn:b", "attributes": { "displayName": "B.rvt" } }
            ],
            "included": [
                {
                    "type": "versions",
                    "id": "urn:b?version=1",
                    "attributes": { "extension": { "data": { "revitProjectVersion": "2024" } } },
                    "relationships": { "item": { "data": { "type": "items", "id": "urn:b" } } }
                }
            ]
        }))
        .unwrap();

        assert_eq!(find_revit_version(&contents, &contents.data[0]), None);
        assert_eq!(
            find_revit_version(&contents, &contents.data[1]).as_deref(),
            Some("2024")
        );
    }
}

use crate::error::AppFetchError;
use crate::remote::{MetadataNode, NodeType, ResourceType};
use crate::utils::decode_remote_path;
use std::path::{Path, PathBuf};

/// Maps a remote file URL to its place under `target`.
///
/// `source_prefix` is the decoded source folder. The decoded URL must start with
/// it, and the remainder must stay inside `target`.
pub fn destination_path(
    target: &Path,
    source_prefix: &str,
    file_url: &str,
) -> Result<PathBuf, AppFetchError> {
    let decoded = decode_remote_path(file_url);
    let remainder =
        decoded
            .strip_prefix(source_prefix)
            .ok_or_else(|| AppFetchError::RemotePath {
                url: file_url.to_string(),
                reason: format!("path does not start with the source folder {source_prefix}"),
            })?;

    let mut destination = target.to_path_buf();
    let mut segments = 0;
    for segment in remainder.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(AppFetchError::RemotePath {
                    url: file_url.to_string(),
                    reason: "path escapes the source folder".to_string(),
                });
            }
            segment => {
                destination.push(segment);
                segments += 1;
            }
        }
    }

    if segments == 0 {
        return Err(AppFetchError::RemotePath {
            url: file_url.to_string(),
            reason: "path names the source folder itself".to_string(),
        });
    }

    Ok(destination)
}

/// File entries of a listing page, depth first, in listing order.
pub fn leaf_files(items: &[MetadataNode]) -> Vec<&MetadataNode> {
    let mut files = Vec::new();
    let mut stack: Vec<&MetadataNode> = items.iter().rev().collect();

    while let Some(node) = stack.pop() {
        // The service marks folders by node type; their resource type may be FILE.
        let is_folder = node.node_type == Some(NodeType::Folder)
            || node.resource_type == ResourceType::Folder;
        if is_folder {
            if let Some(children) = &node.items {
                stack.extend(children.iter().rev());
            }
            continue;
        }

        match node.resource_type {
            ResourceType::File => files.push(node),
            ResourceType::Folder | ResourceType::Other => {
                tracing::debug!(url = %node.url, "Skipping entry that is not a file");
            }
        }
    }

    files
}

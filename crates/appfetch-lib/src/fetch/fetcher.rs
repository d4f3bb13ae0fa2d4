use super::paths::{destination_path, leaf_files};
use crate::error::{AppFetchError, ValidationError};
use crate::remote::{MetadataNode, NodeType, RemoteStore};
use crate::utils::decode_remote_path;
use std::path::Path;
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub pages: usize,
    pub files: usize,
    pub bytes: u64,
}

/// Downloads every file entry of `files_metadata` below `target`.
///
/// Stops at the first failure; files written before it stay on disk.
pub async fn download_files<S: RemoteStore>(
    store: &S,
    source_prefix: &str,
    target: &Path,
    files_metadata: &[MetadataNode],
) -> Result<MirrorSummary, AppFetchError> {
    let mut summary = MirrorSummary::default();

    for file in leaf_files(files_metadata) {
        let destination = destination_path(target, source_prefix, &file.url)?;
        summary.bytes += store.download(&file.url, &destination).await?;
        summary.files += 1;
    }

    Ok(summary)
}

/// Mirrors the remote folder `sources` into `target`, following continuation
/// tokens until the listing is exhausted.
pub async fn mirror_folder<S: RemoteStore>(
    store: &S,
    sources: &str,
    target: &Path,
) -> Result<MirrorSummary, AppFetchError> {
    let source_prefix = decode_remote_path(sources);
    let mut summary = MirrorSummary::default();
    let mut token: Option<String> = None;

    loop {
        let page = store.list_folder(sources, token.as_deref()).await?;
        if page.node_type != NodeType::Folder {
            return Err(ValidationError::SourcesNotAFolder {
                path: sources.to_string(),
            }
            .into());
        }

        summary.pages += 1;
        info!(
            page = summary.pages,
            items = page.items.len(),
            "Processing listing page"
        );

        let page_summary = download_files(store, &source_prefix, target, &page.items).await?;
        summary.files += page_summary.files;
        summary.bytes += page_summary.bytes;

        match page.continuation() {
            Some(next) => token = Some(next.to_string()),
            None => break,
        }
    }

    Ok(summary)
}

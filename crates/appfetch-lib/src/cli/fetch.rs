use crate::cli::FetchParams;
use crate::error::AppFetchError;
use crate::fetch::{MirrorSummary, mirror_folder};
use crate::remote::RemoteClient;
use tracing;

pub async fn run_fetch(params: FetchParams) -> Result<MirrorSummary, AppFetchError> {
    let FetchParams {
        remote,
        sources,
        target_dir,
    } = params;

    tracing::info!("Dial base url: {}", remote.base_url);
    tracing::info!("Sources: {}", sources);
    tracing::info!("Target folder: {}", target_dir.display());

    tokio::fs::create_dir_all(&target_dir).await?;

    let client = RemoteClient::new(&remote)?;
    let summary = mirror_folder(&client, &sources, &target_dir).await?;

    tracing::info!(
        pages = summary.pages,
        files = summary.files,
        bytes = summary.bytes,
        "Sources mirrored to {}",
        target_dir.display()
    );
    Ok(summary)
}

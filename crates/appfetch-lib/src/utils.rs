use crate::error::AppFetchError;
use futures::{Stream, StreamExt};
use percent_encoding::percent_decode_str;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Size of the write buffer used while streaming a download to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Percent-decodes a remote path. Invalid UTF-8 is replaced, not rejected.
pub fn decode_remote_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Streams `chunks` into `destination`, truncating an existing file.
pub async fn write_chunks<S, B, E>(chunks: S, destination: &Path) -> Result<u64, AppFetchError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    AppFetchError: From<E>,
{
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file = tokio::fs::File::create(destination).await?;
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut chunks = std::pin::pin!(chunks);
    let mut written = 0u64;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        let bytes = chunk.as_ref();
        writer.write_all(bytes).await?;
        written += bytes.len() as u64;
    }

    writer.flush().await?;
    Ok(written)
}

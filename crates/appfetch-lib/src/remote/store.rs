use super::types::ListingPage;
use crate::error::AppFetchError;
use std::path::Path;

/// The two calls the fetcher makes against the file service.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Lists `folder` recursively, resuming from `token` when given.
    async fn list_folder(
        &self,
        folder: &str,
        token: Option<&str>,
    ) -> Result<ListingPage, AppFetchError>;

    /// Writes the content of `file_url` to `destination`, creating parent
    /// directories and replacing an existing file. Returns the byte count.
    async fn download(&self, file_url: &str, destination: &Path) -> Result<u64, AppFetchError>;
}

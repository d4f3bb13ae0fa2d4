mod fetcher;
mod paths;

pub use fetcher::{MirrorSummary, download_files, mirror_folder};
pub use paths::{destination_path, leaf_files};

use crate::config::{AllowedPackages, AppLayout};
use crate::remote::RemoteSettings;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FetchParams {
    pub remote: RemoteSettings,
    pub sources: String,
    pub target_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ValidateParams {
    pub target_dir: PathBuf,
    pub layout: AppLayout,
    pub allowed_packages: AllowedPackages,
}

#[derive(Debug, Clone)]
pub struct BuildParams {
    pub fetch: FetchParams,
    pub validate: ValidateParams,
}

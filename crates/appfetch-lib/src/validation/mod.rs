mod entrypoint;
mod packages;

pub use entrypoint::validate_entrypoint;
pub use packages::{check_requirement_line, validate_packages};

use crate::config::{AllowedPackages, AppLayout};
use crate::error::AppFetchError;
use std::path::Path;

/// Runs the entrypoint check, then the package check.
pub fn validate_app(
    target: &Path,
    layout: &AppLayout,
    allowed_packages: &AllowedPackages,
) -> Result<(), AppFetchError> {
    validate_entrypoint(target, layout)?;
    validate_packages(target, layout, allowed_packages)
}

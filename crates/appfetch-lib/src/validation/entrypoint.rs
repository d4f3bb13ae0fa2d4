use crate::config::AppLayout;
use crate::error::{AppFetchError, ValidationError};
use std::path::Path;

pub fn validate_entrypoint(target: &Path, layout: &AppLayout) -> Result<(), AppFetchError> {
    let entrypoint = target.join(&layout.entrypoint);
    tracing::debug!(path = %entrypoint.display(), "Checking entrypoint");

    if !entrypoint.is_file() {
        return Err(ValidationError::MissingEntrypoint {
            file: layout.entrypoint.clone(),
        }
        .into());
    }
    Ok(())
}

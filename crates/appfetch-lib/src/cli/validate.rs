use crate::cli::ValidateParams;
use crate::error::AppFetchError;
use crate::validation::validate_app;
use tracing;

pub fn run_validate(params: &ValidateParams) -> Result<(), AppFetchError> {
    tracing::info!(
        allowed_packages = %params.allowed_packages,
        "Validating application in {}",
        params.target_dir.display()
    );

    validate_app(&params.target_dir, &params.layout, &params.allowed_packages)?;

    tracing::info!("Application is valid");
    Ok(())
}

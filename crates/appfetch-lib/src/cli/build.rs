use crate::cli::{BuildParams, run_fetch, run_validate};
use crate::error::AppFetchError;

/// Mirrors the sources and validates the result. Files already written stay
/// on disk when validation fails.
pub async fn run_build(params: BuildParams) -> Result<(), AppFetchError> {
    let BuildParams { fetch, validate } = params;

    run_fetch(fetch).await?;
    run_validate(&validate)
}

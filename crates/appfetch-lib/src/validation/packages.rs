use crate::config::{AllowedPackages, AppLayout};
use crate::error::{AppFetchError, ValidationError};
use crate::requirement::{Requirement, RequirementParseError};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Checks one line of a requirements file.
///
/// Returns `Ok(None)` for blank and comment lines and the parsed requirement
/// for lines that pass.
pub fn check_requirement_line(
    line: &str,
    requirements_file: &str,
    allowed_packages: &AllowedPackages,
) -> Result<Option<Requirement>, ValidationError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('-') {
        return Err(ValidationError::InstallerOption {
            file: requirements_file.to_string(),
            line: line.to_string(),
        });
    }

    let requirement: Requirement =
        line.parse()
            .map_err(|e: RequirementParseError| ValidationError::UnsupportedRequirement {
                line: line.to_string(),
                reason: e.to_string(),
            })?;

    if let Some(url) = &requirement.url {
        return Err(ValidationError::UrlNotAllowed {
            file: requirements_file.to_string(),
            url: url.clone(),
        });
    }

    if !allowed_packages.contains(&requirement.name) {
        return Err(ValidationError::ForbiddenPackage {
            package: requirement.name,
        });
    }

    Ok(Some(requirement))
}

/// Checks every requirement of the application against `allowed_packages`.
///
/// The requirements file is created empty when the application has none.
pub fn validate_packages(
    target: &Path,
    layout: &AppLayout,
    allowed_packages: &AllowedPackages,
) -> Result<(), AppFetchError> {
    let path = target.join(&layout.requirements_file);
    let file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(&path)?;

    let mut checked = 0usize;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(requirement) =
            check_requirement_line(&line, &layout.requirements_file, allowed_packages)?
        {
            tracing::debug!(package = %requirement.name, "Requirement allowed");
            checked += 1;
        }
    }

    tracing::info!(
        requirements = checked,
        file = %path.display(),
        "Requirements validated"
    );
    Ok(())
}

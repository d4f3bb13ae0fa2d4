use crate::cli::args::{Action, Command};
use crate::cli::params::{BuildParams, FetchParams, ValidateParams};
use crate::config::{AllowedPackages, Config, load_config};
use crate::error::AppFetchError;
use crate::remote::RemoteSettings;
use std::ffi::OsStr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Build(BuildParams),
    Fetch(FetchParams),
    Validate(ValidateParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, AppFetchError> {
    let Command {
        action,
        config_path,
        overrides,
    } = command;

    let app_config = overrides.apply(load_config(config_path.as_deref())?);
    resolve_with_config(action, &app_config)
}

/// Turns loaded settings into the parameters of `action`, failing on the
/// first required setting that is absent.
pub fn resolve_with_config(
    action: Action,
    app_config: &Config,
) -> Result<ResolvedCommand, AppFetchError> {
    match action {
        Action::Build => Ok(ResolvedCommand::Build(BuildParams {
            fetch: fetch_params(app_config)?,
            validate: validate_params(app_config)?,
        })),
        Action::Fetch => Ok(ResolvedCommand::Fetch(fetch_params(app_config)?)),
        Action::Validate => Ok(ResolvedCommand::Validate(validate_params(app_config)?)),
    }
}

/// A location setting; an empty value is as good as none.
fn required<T: Clone + AsRef<OsStr>>(
    value: &Option<T>,
    name: &'static str,
) -> Result<T, AppFetchError> {
    value
        .clone()
        .filter(|value| !value.as_ref().is_empty())
        .ok_or(AppFetchError::MissingSetting { name })
}

fn fetch_params(app_config: &Config) -> Result<FetchParams, AppFetchError> {
    let dial_base_url = required(&app_config.dial_base_url, "DIAL_BASE_URL")?;
    let sources = required(&app_config.sources, "SOURCES")?;
    let target_dir: PathBuf = required(&app_config.target_dir, "TARGET_DIR")?;

    Ok(FetchParams {
        remote: RemoteSettings::new(
            &dial_base_url,
            app_config.api_key.clone(),
            app_config.jwt.clone(),
        )?,
        sources,
        target_dir,
    })
}

fn validate_params(app_config: &Config) -> Result<ValidateParams, AppFetchError> {
    let target_dir = required(&app_config.target_dir, "TARGET_DIR")?;
    // Set but empty means nothing is allowed.
    let allowed_packages = app_config
        .allowed_packages
        .as_deref()
        .ok_or(AppFetchError::MissingSetting {
            name: "ALLOWED_PACKAGES",
        })?;

    Ok(ValidateParams {
        target_dir,
        layout: app_config.layout(),
        allowed_packages: AllowedPackages::from_whitespace_separated(allowed_packages),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_with_env;

    fn config(pairs: &[(&str, &str)]) -> Config {
        load_config_with_env(
            None,
            Some(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        )
        .unwrap()
    }

    const FULL: &[(&str, &str)] = &[
        ("DIAL_BASE_URL", "http://dial:8080"),
        ("SOURCES", "files/bucket/my%20app/"),
        ("TARGET_DIR", "/build/app"),
        ("API_KEY", "secret"),
        ("ALLOWED_PACKAGES", "requests  numpy\tpandas"),
    ];

    #[test]
    fn test_build_resolves_everything() {
        let ResolvedCommand::Build(params) = resolve_with_config(Action::Build, &config(FULL)).unwrap()
        else {
            panic!("expected build params");
        };

        assert_eq!(params.fetch.remote.base_url.as_str(), "http://dial:8080/");
        assert_eq!(params.fetch.remote.api_key.as_deref(), Some("secret"));
        assert_eq!(params.fetch.remote.jwt, None);
        assert_eq!(params.fetch.sources, "files/bucket/my%20app/");
        assert_eq!(params.fetch.target_dir, PathBuf::from("/build/app"));
        assert_eq!(params.validate.target_dir, PathBuf::from("/build/app"));
        assert_eq!(params.validate.allowed_packages.len(), 3);
        assert!(params.validate.allowed_packages.contains("numpy"));
        assert_eq!(params.validate.layout.entrypoint, "app.py");
    }

    #[test]
    fn test_missing_base_url() {
        let err = resolve_with_config(
            Action::Fetch,
            &config(&[("SOURCES", "files/a/"), ("TARGET_DIR", "/t")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppFetchError::MissingSetting {
                name: "DIAL_BASE_URL"
            }
        ));
    }

    #[test]
    fn test_validate_does_not_need_remote_settings() {
        let resolved = resolve_with_config(
            Action::Validate,
            &config(&[("TARGET_DIR", "/t"), ("ALLOWED_PACKAGES", "requests")]),
        )
        .unwrap();
        assert!(matches!(resolved, ResolvedCommand::Validate(_)));
    }

    #[test]
    fn test_empty_allow_list_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.py"), "").unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "# nothing\n").unwrap();
        let target_dir = dir.path().to_str().unwrap();

        let resolved = resolve_with_config(
            Action::Validate,
            &config(&[("TARGET_DIR", target_dir), ("ALLOWED_PACKAGES", "")]),
        )
        .unwrap();
        let ResolvedCommand::Validate(params) = resolved else {
            panic!("expected validate params");
        };
        assert!(params.allowed_packages.is_empty());
        crate::cli::run_validate(&params).unwrap();

        std::fs::write(dir.path().join("requirements.txt"), "requests\n").unwrap();
        let err = crate::cli::run_validate(&params).unwrap_err();
        assert_eq!(err.to_string(), "Package 'requests' is forbidden.");
    }

    #[test]
    fn test_empty_location_counts_as_missing() {
        let err = resolve_with_config(
            Action::Fetch,
            &config(&[
                ("DIAL_BASE_URL", "http://dial"),
                ("SOURCES", "files/a/"),
                ("TARGET_DIR", ""),
            ]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppFetchError::MissingSetting { name: "TARGET_DIR" }
        ));
    }

    #[test]
    fn test_fetch_does_not_need_allow_list() {
        let resolved = resolve_with_config(
            Action::Fetch,
            &config(&[
                ("DIAL_BASE_URL", "http://dial"),
                ("SOURCES", "files/a/"),
                ("TARGET_DIR", "/t"),
            ]),
        )
        .unwrap();
        assert!(matches!(resolved, ResolvedCommand::Fetch(_)));
    }

    #[test]
    fn test_build_reports_missing_allow_list() {
        let pairs: Vec<_> = FULL
            .iter()
            .copied()
            .filter(|(k, _)| *k != "ALLOWED_PACKAGES")
            .collect();
        assert!(matches!(
            resolve_with_config(Action::Build, &config(&pairs)),
            Err(AppFetchError::MissingSetting {
                name: "ALLOWED_PACKAGES"
            })
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut pairs = FULL.to_vec();
        pairs[0] = ("DIAL_BASE_URL", "not a url");
        assert!(matches!(
            resolve_with_config(Action::Build, &config(&pairs)),
            Err(AppFetchError::Url(_))
        ));
    }
}

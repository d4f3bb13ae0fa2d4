use super::Config;
use crate::error::AppFetchError;
use config::Config as ConfigBuilder;
use config::{Environment, Map};

/// Loads settings from an optional file, then from the process environment.
pub fn load_config(config_path: Option<&str>) -> Result<Config, AppFetchError> {
    load_config_with_env(config_path, None)
}

/// Same as [`load_config`], but reads variables from `env` instead of the
/// process environment when it is given.
pub fn load_config_with_env(
    config_path: Option<&str>,
    env: Option<Map<String, String>>,
) -> Result<Config, AppFetchError> {
    let mut builder = ConfigBuilder::builder();
    if let Some(config_path) = config_path {
        builder = builder.add_source(config::File::with_name(config_path));
    }

    let config_builder = builder
        .add_source(Environment::default().source(env))
        .build()?;

    config_builder.try_deserialize().map_err(Into::into)
}

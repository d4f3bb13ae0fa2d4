mod loader;
mod model;

pub use loader::{load_config, load_config_with_env};
pub use model::{
    AllowedPackages, AppLayout, Config, DEFAULT_ENTRYPOINT, DEFAULT_REQUIREMENTS_FILE,
};

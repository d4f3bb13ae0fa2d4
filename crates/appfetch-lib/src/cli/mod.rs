mod args;
mod build;
mod fetch;
mod params;
mod resolved_command;
mod validate;

pub use args::{Action, Args, Command, SettingOverrides, parse_args};
pub use build::run_build;
pub use fetch::run_fetch;
pub use params::{BuildParams, FetchParams, ValidateParams};
pub use resolved_command::{ResolvedCommand, resolve_command, resolve_with_config};
pub use validate::run_validate;

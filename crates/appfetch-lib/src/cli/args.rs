use crate::config::Config;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Action {
    #[default]
    Build,
    Fetch,
    Validate,
}

/// Settings given on the command line. They win over the file and the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
pub struct SettingOverrides {
    #[arg(
        long = "base-url",
        value_name = "URL",
        help = "Overrides DIAL_BASE_URL",
        global = true
    )]
    pub dial_base_url: Option<String>,

    #[arg(
        long = "sources",
        value_name = "PATH",
        help = "Overrides SOURCES, the remote folder to mirror",
        global = true
    )]
    pub sources: Option<String>,

    #[arg(
        long = "target-dir",
        value_name = "DIR",
        help = "Overrides TARGET_DIR",
        global = true
    )]
    pub target_dir: Option<PathBuf>,

    #[arg(
        long = "allowed-packages",
        value_name = "NAMES",
        help = "Overrides ALLOWED_PACKAGES (whitespace-separated)",
        global = true
    )]
    pub allowed_packages: Option<String>,
}

impl SettingOverrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(dial_base_url) = self.dial_base_url {
            config.dial_base_url = Some(dial_base_url);
        }
        if let Some(sources) = self.sources {
            config.sources = Some(sources);
        }
        if let Some(target_dir) = self.target_dir {
            config.target_dir = Some(target_dir);
        }
        if let Some(allowed_packages) = self.allowed_packages {
            config.allowed_packages = Some(allowed_packages);
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct Command {
    pub action: Action,
    pub config_path: Option<String>,
    pub overrides: SettingOverrides,
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "appfetch",
    version,
    about = "Mirror an application's sources from DIAL storage and check that it can be deployed"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file; environment variables take precedence over it",
        global = true
    )]
    config: Option<String>,

    #[command(flatten)]
    overrides: SettingOverrides,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Mirror the sources, then validate them (default)
    Build,
    /// Mirror the sources only
    Fetch,
    /// Validate an already populated target directory
    Validate,
}

impl Cli {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn into_args(self) -> Args {
        let log_level = self.log_level();
        let action = match self.command {
            None | Some(CliCommand::Build) => Action::Build,
            Some(CliCommand::Fetch) => Action::Fetch,
            Some(CliCommand::Validate) => Action::Validate,
        };

        Args {
            command: Command {
                action,
                config_path: self.config,
                overrides: self.overrides,
            },
            log_level,
        }
    }
}

pub fn parse_args() -> Args {
    let args = Cli::parse().into_args();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(args.log_level.into())
                .from_env_lossy(),
        )
        .init();

    args
}

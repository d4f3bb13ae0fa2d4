use thiserror::Error;

/// Prefix the build controller searches for in job logs to tell validation
/// failures apart from infrastructure failures.
pub const VALIDATION_ERROR_MARKER: &str = "AppValidationException: ";

#[derive(Error, Debug)]
pub enum AppFetchError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing required setting {name}")]
    MissingSetting { name: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid value for header {name}")]
    InvalidHeader { name: &'static str },

    #[error("Request to {url} failed with status {status}")]
    Transport {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Cannot map remote file {url} into the target directory: {reason}")]
    RemotePath { url: String, reason: String },

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

/// Reasons an application source tree is refused for deployment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Sources path must be a folder")]
    SourcesNotAFolder { path: String },

    #[error("Missing entrypoint file: {file}")]
    MissingEntrypoint { file: String },

    #[error("Pip options aren't allowed in {file}: {line}")]
    InstallerOption { file: String, line: String },

    #[error("Unsupported requirement: {line}")]
    UnsupportedRequirement { line: String, reason: String },

    #[error("URLs are not allowed in {file}: {url}")]
    UrlNotAllowed { file: String, url: String },

    #[error("Package '{package}' is forbidden.")]
    ForbiddenPackage { package: String },
}

impl ValidationError {
    /// Renders the line the build controller extracts from the job log.
    pub fn log_line(&self) -> String {
        format!("{VALIDATION_ERROR_MARKER}{self}")
    }
}

impl AppFetchError {
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_ENTRYPOINT: &str = "app.py";
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Settings as read from the configuration file and the environment.
///
/// Every remote or local location is optional here because each command needs a
/// different subset; `resolve_command` turns the missing ones into errors.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub dial_base_url: Option<String>,
    pub sources: Option<String>,
    pub target_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub jwt: Option<String>,
    pub allowed_packages: Option<String>,
    #[serde(default = "default_entrypoint")]
    pub app_entrypoint: String,
    #[serde(default = "default_requirements_file")]
    pub app_requirements_file: String,
}

fn default_entrypoint() -> String {
    DEFAULT_ENTRYPOINT.to_string()
}

fn default_requirements_file() -> String {
    DEFAULT_REQUIREMENTS_FILE.to_string()
}

impl Config {
    pub fn layout(&self) -> AppLayout {
        AppLayout {
            entrypoint: self.app_entrypoint.clone(),
            requirements_file: self.app_requirements_file.clone(),
        }
    }
}

/// Relative names of the files that make a directory a deployable application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub entrypoint: String,
    pub requirements_file: String,
}

impl Default for AppLayout {
    fn default() -> Self {
        Self {
            entrypoint: default_entrypoint(),
            requirements_file: default_requirements_file(),
        }
    }
}

/// Package names a requirements file may reference. Matching is exact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowedPackages(BTreeSet<String>);

impl AllowedPackages {
    pub fn from_whitespace_separated(value: &str) -> Self {
        Self(value.split_whitespace().map(str::to_string).collect())
    }

    pub fn contains(&self, package: &str) -> bool {
        self.0.contains(package)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedPackages {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for AllowedPackages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod remote;
pub mod requirement;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use error::AppFetchError;

//! Error types for the Knobs configuration layer

use knobs_common::{ErrorSeverity, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to assemble [`PromptSettings`](crate::PromptSettings)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A file passed with `--config` is missing; discovered files never are
    #[error("No configuration file at {path}")]
    FileNotFound { path: PathBuf },

    /// Any source produced a value figment could not extract
    #[error("Invalid prompt settings: {source}")]
    ParseError { source: figment::Error },

    #[error("{path} is not a .toml, .yaml, .yml or .json file")]
    UnsupportedFormat { path: PathBuf },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError { source: error }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

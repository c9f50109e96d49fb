//! Parameter and command manifests
//!
//! A manifest lists parameters and commands in YAML or JSON:
//!
//! ```yaml
//! parameters:
//!   - name: region
//!     type: choice
//!     choices: [eu-west, us-east]
//!     required: true
//!     prompt:
//!       text: "Deployment region"
//! commands:
//!   - name: deploy
//!     requires: [region]
//!     prompts:
//!       - name: confirm
//!         type: boolean
//!         prompt:
//!           text: "Deploy now?"
//! ```
//!
//! Parameters are registered in order, then commands in order.

use crate::command::CommandDefinition;
use crate::error::RegistrationError;
use crate::registry::Registry;
use knobs_common::{ErrorSeverity, Parameter, Severity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML manifest: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),
}

impl Severity for ManifestError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

impl Manifest {
    pub fn from_yaml_str(source: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a manifest file, reading `.json` files as JSON and anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!(path = %path.display(), json = is_json, "Loading manifest");
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }

    /// Register everything in the manifest
    pub fn register_into(self, registry: &mut Registry) -> Result<(), RegistrationError> {
        for param in self.parameters {
            registry.register_parameter(param)?;
        }
        for command in self.commands {
            registry.register_command(command)?;
        }
        Ok(())
    }
}

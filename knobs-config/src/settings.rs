//! Settings read from configuration

use knobs_common::{RetryBound, DEFAULT_RETRIES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prompt settings for a run
///
/// ```toml
/// retries = 5
///
/// [values]
/// region = "eu-west"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Default retry bound; negative means unlimited
    #[serde(default = "default_retries")]
    pub retries: i64,

    /// Parameter values supplied up front, treated like command-line values
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
}

fn default_retries() -> i64 {
    DEFAULT_RETRIES
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            values: BTreeMap::new(),
        }
    }
}

impl PromptSettings {
    pub fn retry_bound(&self) -> RetryBound {
        RetryBound::from(self.retries)
    }
}

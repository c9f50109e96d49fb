//! Command definitions and their prompt entries

use knobs_common::Parameter;
use serde::{Deserialize, Deserializer, Serialize};

/// One entry in a command's explicit prompt list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PromptEntry {
    /// Name of a parameter registered elsewhere
    Reference(String),
    /// Parameter defined in place, registered together with the command
    Inline(Box<Parameter>),
    /// Anything else found in a manifest; rejected at registration
    Unrecognized(serde_json::Value),
}

impl PromptEntry {
    /// Name of the parameter this entry points at
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            PromptEntry::Reference(name) => Some(name),
            PromptEntry::Inline(param) => Some(&param.name),
            PromptEntry::Unrecognized(_) => None,
        }
    }
}

impl From<&str> for PromptEntry {
    fn from(name: &str) -> Self {
        PromptEntry::Reference(name.to_string())
    }
}

impl From<String> for PromptEntry {
    fn from(name: String) -> Self {
        PromptEntry::Reference(name)
    }
}

impl From<Parameter> for PromptEntry {
    fn from(param: Parameter) -> Self {
        PromptEntry::Inline(Box::new(param))
    }
}

impl<'de> Deserialize<'de> for PromptEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Shape errors surface at registration, naming the command
        let value = serde_json::Value::deserialize(deserializer)?;
        let entry = match value {
            serde_json::Value::String(name) => PromptEntry::Reference(name),
            serde_json::Value::Object(_) => match serde_json::from_value::<Parameter>(value.clone()) {
                Ok(param) => PromptEntry::Inline(Box::new(param)),
                Err(_) => PromptEntry::Unrecognized(value),
            },
            other => PromptEntry::Unrecognized(other),
        };
        Ok(entry)
    }
}

/// A named operation that can trigger prompts before it runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Parameters the command needs; prompting ones with no timing of their
    /// own become bound to this command
    #[serde(default, alias = "required")]
    pub requires: Vec<String>,

    /// Parameters that prompt before this command runs
    #[serde(default)]
    pub prompts: Vec<PromptEntry>,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            requires: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Add required parameters
    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add explicit prompt entries
    pub fn prompts<I, E>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<PromptEntry>,
    {
        self.prompts.extend(entries.into_iter().map(Into::into));
        self
    }
}

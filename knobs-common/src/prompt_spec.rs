//! Prompt configuration attached to a parameter
//!
//! A [`PromptSpec`] says what to ask, when to ask it and how often to retry.
//! The trigger relationship between a parameter and the commands it prompts
//! before is owned by the prompt graph in the `knobs` crate; `commands` here
//! only records what the parameter declared.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_RETRIES;

/// When a parameter prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTiming {
    /// Once, after arguments and configuration are parsed and before dispatch
    AtStart,
    /// Immediately before each triggering command runs
    AtCommand,
}

impl PromptTiming {
    /// Get the string representation of this timing mode
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptTiming::AtStart => "at_start",
            PromptTiming::AtCommand => "at_command",
        }
    }
}

impl FromStr for PromptTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "at_start" | "start" => Ok(PromptTiming::AtStart),
            "at_command" | "command" => Ok(PromptTiming::AtCommand),
            other => Err(format!(
                "Unknown prompt timing '{other}'. Expected at_start or at_command"
            )),
        }
    }
}

/// Whether a command-bound prompt recurs across invocations of its commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Prompt on every invocation
    #[default]
    Always,
    /// Prompt only while the stored value is blank
    IfBlank,
    /// Prompt only until the parameter has prompted successfully once
    Never,
}

impl RepeatPolicy {
    /// Get the string representation of this policy
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatPolicy::Always => "always",
            RepeatPolicy::IfBlank => "if_blank",
            RepeatPolicy::Never => "never",
        }
    }
}

impl FromStr for RepeatPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "always" => Ok(RepeatPolicy::Always),
            "if_blank" | "ifblank" => Ok(RepeatPolicy::IfBlank),
            "never" | "once" => Ok(RepeatPolicy::Never),
            other => Err(format!(
                "Unknown repeat policy '{other}'. Expected always, if_blank or never"
            )),
        }
    }
}

/// Progress of automatic command linking for one parameter
///
/// - `Unset`: not yet registered, or registered without prompt text.
/// - `Pending`: registered with prompt text but no explicit timing; the first
///   command that requires it may claim it.
/// - `Resolved`: timing is settled, either declared or claimed. Later
///   registrations never auto-link it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Unset,
    Pending,
    Resolved,
}

/// How many times a failed prompt may be retried
///
/// Configured as a signed integer: negative means unlimited, zero fails after
/// the first invalid answer, a positive count allows that many retries after
/// the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RetryBound {
    Unlimited,
    Retries(u32),
}

impl RetryBound {
    /// Whether another attempt is allowed after `failures` invalid answers
    pub fn allows_retry(self, failures: u32) -> bool {
        match self {
            RetryBound::Unlimited => true,
            RetryBound::Retries(limit) => failures <= limit,
        }
    }
}

impl Default for RetryBound {
    fn default() -> Self {
        RetryBound::from(DEFAULT_RETRIES)
    }
}

impl From<i64> for RetryBound {
    fn from(count: i64) -> Self {
        if count < 0 {
            RetryBound::Unlimited
        } else {
            RetryBound::Retries(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }
}

impl From<RetryBound> for i64 {
    fn from(bound: RetryBound) -> Self {
        match bound {
            RetryBound::Unlimited => -1,
            RetryBound::Retries(limit) => i64::from(limit),
        }
    }
}

impl fmt::Display for RetryBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryBound::Unlimited => write!(f, "unlimited"),
            RetryBound::Retries(limit) => write!(f, "{limit}"),
        }
    }
}

/// Interactive prompt configuration for a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Question shown to the user
    pub text: String,

    /// Explicit timing; `None` leaves it to command auto-linking and
    /// otherwise behaves as [`PromptTiming::AtStart`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<PromptTiming>,

    /// Commands this parameter declared it prompts before
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,

    /// Repeat policy for command-bound prompting
    #[serde(default)]
    pub repeat: RepeatPolicy,

    /// Per-parameter retry bound overriding the session default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<RetryBound>,

    #[serde(skip)]
    pub link_state: LinkState,
}

impl PromptSpec {
    /// Create a prompt with the given text and no timing configuration
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timing: None,
            commands: Vec::new(),
            repeat: RepeatPolicy::default(),
            retries: None,
            link_state: LinkState::Unset,
        }
    }

    /// Timing used for evaluation once registration is complete
    pub fn effective_timing(&self) -> PromptTiming {
        self.timing.unwrap_or(PromptTiming::AtStart)
    }

    /// Whether the declaration settles timing without help from a command
    pub fn has_explicit_timing(&self) -> bool {
        self.timing.is_some() || !self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_bound_from_signed_count() {
        assert_eq!(RetryBound::from(-1), RetryBound::Unlimited);
        assert_eq!(RetryBound::from(-40), RetryBound::Unlimited);
        assert_eq!(RetryBound::from(0), RetryBound::Retries(0));
        assert_eq!(RetryBound::from(3), RetryBound::Retries(3));
        assert_eq!(i64::from(RetryBound::Unlimited), -1);
    }

    #[test]
    fn test_retry_bound_allows_retry() {
        let none = RetryBound::Retries(0);
        assert!(!none.allows_retry(1));

        let one = RetryBound::Retries(1);
        assert!(one.allows_retry(1));
        assert!(!one.allows_retry(2));

        assert!(RetryBound::Unlimited.allows_retry(u32::MAX));
    }

    #[test]
    fn test_default_retry_bound_matches_constant() {
        assert_eq!(RetryBound::default(), RetryBound::Retries(2));
    }

    #[test]
    fn test_repeat_policy_parsing() {
        assert_eq!("if-blank".parse::<RepeatPolicy>(), Ok(RepeatPolicy::IfBlank));
        assert_eq!("NEVER".parse::<RepeatPolicy>(), Ok(RepeatPolicy::Never));
        assert!("sometimes".parse::<RepeatPolicy>().is_err());
    }

    #[test]
    fn test_prompt_spec_deserialization() {
        let yaml = r#"
text: "Deployment region"
timing: at_command
commands: [deploy, rollback]
repeat: if_blank
retries: -1
"#;
        let spec: PromptSpec = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(spec.timing, Some(PromptTiming::AtCommand));
        assert_eq!(spec.commands, vec!["deploy", "rollback"]);
        assert_eq!(spec.repeat, RepeatPolicy::IfBlank);
        assert_eq!(spec.retries, Some(RetryBound::Unlimited));
        assert_eq!(spec.link_state, LinkState::Unset);
    }

    #[test]
    fn test_unset_timing_behaves_as_start() {
        let spec = PromptSpec::new("Name");
        assert_eq!(spec.effective_timing(), PromptTiming::AtStart);
        assert!(!spec.has_explicit_timing());
    }
}

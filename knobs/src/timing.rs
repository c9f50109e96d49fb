//! Timing and repeat evaluation
//!
//! [`evaluate`] decides whether one parameter should prompt in the current
//! context. It reads the value store and the set of parameters that already
//! prompted, and changes nothing.

use crate::store::ValueStore;
use indexmap::IndexSet;
use knobs_common::{Parameter, PromptTiming, RepeatPolicy};
use std::fmt;

/// Point in execution at which prompts are being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptContext<'a> {
    /// After arguments and configuration are parsed, before dispatch
    Start,
    /// Immediately before the named command runs
    Command(&'a str),
}

impl fmt::Display for PromptContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptContext::Start => write!(f, "start"),
            PromptContext::Command(name) => write!(f, "command '{name}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The parameter has no prompt text
    NotPrompting,
    /// A non-blank value was supplied from outside
    ValueSupplied,
    /// The parameter prompts at a different point
    TimingMismatch,
    /// `if_blank` and the value is already set
    AlreadySet,
    /// `never` and the parameter already prompted once
    AlreadyPrompted,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotPrompting => "not prompting",
            SkipReason::ValueSupplied => "value supplied",
            SkipReason::TimingMismatch => "timing mismatch",
            SkipReason::AlreadySet => "already set",
            SkipReason::AlreadyPrompted => "already prompted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDecision {
    Prompt,
    Skip(SkipReason),
}

impl PromptDecision {
    pub fn should_prompt(&self) -> bool {
        matches!(self, PromptDecision::Prompt)
    }
}

/// Decide whether `param` prompts now
///
/// `triggers` is the parameter's trigger set from the prompt graph. With
/// `honor_existing` set, any non-blank stored value skips the prompt before
/// timing or repeat policy are considered. Repeat policy applies only in a
/// command context; start prompts run at most once per resolution.
pub fn evaluate(
    param: &Parameter,
    triggers: Option<&IndexSet<String>>,
    context: PromptContext<'_>,
    honor_existing: bool,
    store: &ValueStore,
    prompted: &IndexSet<String>,
) -> PromptDecision {
    let Some(spec) = param.prompt.as_ref() else {
        return PromptDecision::Skip(SkipReason::NotPrompting);
    };

    if honor_existing && !store.is_blank(&param.name) {
        return PromptDecision::Skip(SkipReason::ValueSupplied);
    }

    let command = match (spec.effective_timing(), context) {
        (PromptTiming::AtStart, PromptContext::Start) => return PromptDecision::Prompt,
        (PromptTiming::AtCommand, PromptContext::Command(command))
            if triggers.is_some_and(|commands| commands.contains(command)) =>
        {
            command
        }
        _ => return PromptDecision::Skip(SkipReason::TimingMismatch),
    };

    match spec.repeat {
        RepeatPolicy::Always => PromptDecision::Prompt,
        RepeatPolicy::IfBlank if store.is_blank(&param.name) => PromptDecision::Prompt,
        RepeatPolicy::IfBlank => PromptDecision::Skip(SkipReason::AlreadySet),
        RepeatPolicy::Never if prompted.contains(&param.name) => {
            tracing::trace!(parameter = %param.name, command, "Already prompted once");
            PromptDecision::Skip(SkipReason::AlreadyPrompted)
        }
        RepeatPolicy::Never => PromptDecision::Prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knobs_common::ParameterType;
    use serde_json::json;

    fn triggers(commands: &[&str]) -> IndexSet<String> {
        commands.iter().map(|c| c.to_string()).collect()
    }

    fn command_param(repeat: RepeatPolicy) -> Parameter {
        Parameter::new("region", "Region", ParameterType::String)
            .with_prompt("Region?")
            .prompt_before(["deploy"])
            .with_repeat(repeat)
    }

    #[test]
    fn test_existing_value_short_circuits() {
        let mut store = ValueStore::new();
        store.set("region", json!("eu"));
        let prompted = IndexSet::new();
        let deploy = triggers(&["deploy"]);

        for repeat in [RepeatPolicy::Always, RepeatPolicy::IfBlank, RepeatPolicy::Never] {
            let decision = evaluate(
                &command_param(repeat),
                Some(&deploy),
                PromptContext::Command("deploy"),
                true,
                &store,
                &prompted,
            );
            assert_eq!(decision, PromptDecision::Skip(SkipReason::ValueSupplied));
        }

        let start = Parameter::new("token", "Token", ParameterType::String).with_prompt("Token?");
        store.set("token", json!("abc"));
        assert_eq!(
            evaluate(&start, None, PromptContext::Start, true, &store, &prompted),
            PromptDecision::Skip(SkipReason::ValueSupplied)
        );
    }

    #[test]
    fn test_blank_existing_value_does_not_short_circuit() {
        let mut store = ValueStore::new();
        store.set("token", json!("  "));
        let start = Parameter::new("token", "Token", ParameterType::String).with_prompt("Token?");
        assert_eq!(
            evaluate(&start, None, PromptContext::Start, true, &store, &IndexSet::new()),
            PromptDecision::Prompt
        );
    }

    #[test]
    fn test_timing_matching() {
        let store = ValueStore::new();
        let prompted = IndexSet::new();
        let param = command_param(RepeatPolicy::Always);
        let deploy = triggers(&["deploy"]);

        assert_eq!(
            evaluate(&param, Some(&deploy), PromptContext::Start, true, &store, &prompted),
            PromptDecision::Skip(SkipReason::TimingMismatch)
        );
        assert_eq!(
            evaluate(&param, Some(&deploy), PromptContext::Command("status"), true, &store, &prompted),
            PromptDecision::Skip(SkipReason::TimingMismatch)
        );
        assert_eq!(
            evaluate(&param, Some(&deploy), PromptContext::Command("deploy"), true, &store, &prompted),
            PromptDecision::Prompt
        );

        let unset = Parameter::new("token", "Token", ParameterType::String).with_prompt("Token?");
        assert_eq!(
            evaluate(&unset, None, PromptContext::Start, true, &store, &prompted),
            PromptDecision::Prompt
        );
        assert_eq!(
            evaluate(&unset, None, PromptContext::Command("deploy"), true, &store, &prompted),
            PromptDecision::Skip(SkipReason::TimingMismatch)
        );
    }

    #[test]
    fn test_never_policy_after_prompting() {
        let store = ValueStore::new();
        let param = command_param(RepeatPolicy::Never);
        let deploy = triggers(&["deploy"]);
        let mut prompted = IndexSet::new();

        let context = PromptContext::Command("deploy");
        assert!(evaluate(&param, Some(&deploy), context, false, &store, &prompted).should_prompt());

        prompted.insert("region".to_string());
        assert_eq!(
            evaluate(&param, Some(&deploy), context, false, &store, &prompted),
            PromptDecision::Skip(SkipReason::AlreadyPrompted)
        );
    }

    #[test]
    fn test_if_blank_policy_tracks_value() {
        let mut store = ValueStore::new();
        let param = command_param(RepeatPolicy::IfBlank);
        let deploy = triggers(&["deploy"]);
        let mut prompted = IndexSet::new();
        prompted.insert("region".to_string());
        let context = PromptContext::Command("deploy");

        assert!(evaluate(&param, Some(&deploy), context, false, &store, &prompted).should_prompt());

        store.set("region", json!("eu"));
        assert_eq!(
            evaluate(&param, Some(&deploy), context, false, &store, &prompted),
            PromptDecision::Skip(SkipReason::AlreadySet)
        );

        store.set("region", json!(""));
        assert!(evaluate(&param, Some(&deploy), context, false, &store, &prompted).should_prompt());
    }

    #[test]
    fn test_always_policy_reprompts_over_prompted_value() {
        let mut store = ValueStore::new();
        store.set("region", json!("eu"));
        let mut prompted = IndexSet::new();
        prompted.insert("region".to_string());
        let deploy = triggers(&["deploy"]);

        let decision = evaluate(
            &command_param(RepeatPolicy::Always),
            Some(&deploy),
            PromptContext::Command("deploy"),
            false,
            &store,
            &prompted,
        );
        assert_eq!(decision, PromptDecision::Prompt);
    }

    #[test]
    fn test_parameter_without_prompt_never_prompts() {
        let param = Parameter::new("verbose", "Verbose", ParameterType::Boolean);
        assert_eq!(
            evaluate(
                &param,
                None,
                PromptContext::Start,
                true,
                &ValueStore::new(),
                &IndexSet::new()
            ),
            PromptDecision::Skip(SkipReason::NotPrompting)
        );
    }
}

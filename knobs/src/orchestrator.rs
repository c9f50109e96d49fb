//! Retry orchestration for a single prompt
//!
//! Runs handler, validation and storage in a loop until the value is stored
//! or the retry bound is spent. Every failure is reported to the log and to
//! the handler; for sensitive parameters both only ever see the parameter
//! name.

use crate::error::PromptError;
use crate::handler::{InputError, PromptRequest};
use crate::identifier::PendingPrompt;
use crate::store::ValueStore;
use indexmap::IndexSet;
use knobs_common::{ErrorMessageEnhancer, ParameterError, RetryBound};
use tracing::{info, warn};

/// How a prompt ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Input was validated and stored
    Stored { attempts: u32 },
    /// Retries ran out for an optional parameter; its value was not changed
    Skipped { attempts: u32 },
}

impl PromptOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            PromptOutcome::Stored { attempts } | PromptOutcome::Skipped { attempts } => *attempts,
        }
    }
}

/// Prompt for one parameter until its input validates or retries run out
///
/// The bound is the parameter's own retry setting, else `default_bound`.
/// A required parameter that runs out fails with the last (redacted)
/// validation error; an optional one is skipped. Input interruptions end
/// the prompt at once. On success the parameter joins `prompted`.
pub fn execute_prompt(
    pending: &PendingPrompt,
    store: &mut ValueStore,
    default_bound: RetryBound,
    prompted: &mut IndexSet<String>,
) -> Result<PromptOutcome, PromptError> {
    let param = &pending.parameter;
    let bound = param
        .prompt
        .as_ref()
        .and_then(|spec| spec.retries)
        .unwrap_or(default_bound);
    let enhancer = ErrorMessageEnhancer::new();
    let mut failures: u32 = 0;

    loop {
        let attempt = failures.saturating_add(1);
        let request = PromptRequest::for_parameter(param, attempt);
        let raw = pending
            .handler
            .read(&request)
            .map_err(|e| interruption(&param.name, e))?;

        let error = match store.store_input(param, &raw) {
            Ok(()) => {
                prompted.insert(param.name.clone());
                info!(parameter = %param.name, attempts = attempt, "Stored prompted value");
                return Ok(PromptOutcome::Stored { attempts: attempt });
            }
            Err(error) => error.surfaced_for(param),
        };

        failures = attempt;
        warn!(parameter = %param.name, attempt, %bound, "Invalid input: {error}");

        if !bound.allows_retry(failures) {
            if param.required {
                pending.handler.notify(&format!(
                    "{error}. Giving up after {failures} attempt(s)."
                ));
                return Err(PromptError::Validation {
                    parameter: param.name.clone(),
                    source: error,
                });
            }

            pending.handler.notify(&format!(
                "{error}. Leaving '{}' unset after {failures} attempt(s).",
                param.name
            ));
            info!(parameter = %param.name, attempts = failures, "Optional parameter left unset");
            return Ok(PromptOutcome::Skipped { attempts: failures });
        }

        pending
            .handler
            .notify(&retry_message(&error, &enhancer, failures, bound));
    }
}

fn retry_message(
    error: &ParameterError,
    enhancer: &ErrorMessageEnhancer,
    failures: u32,
    bound: RetryBound,
) -> String {
    let mut message = error.to_string();
    if let Some(hint) = enhancer.hint_for(error) {
        message.push_str(&format!(" ({hint})"));
    }
    match bound {
        RetryBound::Retries(limit) => {
            let total = limit.saturating_add(1);
            message.push_str(&format!(". Please try again ({failures}/{total})."));
        }
        RetryBound::Unlimited => message.push_str(". Please try again."),
    }
    message
}

fn interruption(parameter: &str, error: InputError) -> PromptError {
    let parameter = parameter.to_string();
    match error {
        InputError::EndOfInput => PromptError::EndOfInput { parameter },
        InputError::Aborted => PromptError::Aborted { parameter },
        InputError::Io(source) => PromptError::Io { parameter, source },
    }
}

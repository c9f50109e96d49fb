//! Prompt set identification
//!
//! Narrows the registry down to the parameters that should prompt in a
//! context and pairs each with the handler that will read its input.

use crate::error::PromptError;
use crate::handler::{Handlers, SharedHandler};
use crate::registry::Registry;
use crate::store::ValueStore;
use crate::timing::{evaluate, PromptContext, PromptDecision};
use indexmap::IndexSet;
use knobs_common::Parameter;
use tracing::debug;

/// A parameter ready to prompt, with its resolved handler
pub struct PendingPrompt {
    pub parameter: Parameter,
    pub handler: SharedHandler,
}

impl PendingPrompt {
    pub fn name(&self) -> &str {
        &self.parameter.name
    }
}

impl std::fmt::Debug for PendingPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPrompt")
            .field("parameter", &self.parameter.name)
            .finish_non_exhaustive()
    }
}

/// List the prompts to run for a context, in the order they must run
///
/// The start context walks every parameter in registration order and lets
/// any stored value skip the prompt. A command context walks the command's
/// prompt set in link order; there, a stored value only skips the prompt if
/// it did not come from an earlier prompt, so repeat policies stay in
/// charge of prompted values.
pub fn identify(
    registry: &Registry,
    store: &ValueStore,
    prompted: &IndexSet<String>,
    handlers: &Handlers,
    context: PromptContext<'_>,
) -> Result<Vec<PendingPrompt>, PromptError> {
    let candidates: Vec<&Parameter> = match context {
        PromptContext::Start => registry.parameters().collect(),
        PromptContext::Command(command) => {
            if !registry.knows_command(command) {
                return Err(PromptError::UnknownCommand {
                    name: command.to_string(),
                });
            }
            registry
                .graph()
                .prompts_of(command)
                .filter_map(|name| registry.parameter(name))
                .collect()
        }
    };

    let mut pending = Vec::new();
    for param in candidates {
        let honor_existing = match context {
            PromptContext::Start => true,
            PromptContext::Command(_) => !prompted.contains(&param.name),
        };
        let triggers = registry.graph().triggers_of(&param.name);

        match evaluate(param, triggers, context, honor_existing, store, prompted) {
            PromptDecision::Prompt => {
                let handler = handlers.resolve(registry.parameter_handler(&param.name));
                pending.push(PendingPrompt {
                    parameter: param.clone(),
                    handler,
                });
            }
            PromptDecision::Skip(reason) => {
                if param.is_prompting() {
                    debug!(
                        parameter = %param.name,
                        %context,
                        reason = reason.as_str(),
                        "Skipping prompt"
                    );
                }
            }
        }
    }

    debug!(%context, count = pending.len(), "Identified prompts");
    Ok(pending)
}

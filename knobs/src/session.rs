//! Prompt session state
//!
//! A [`PromptSession`] owns everything about prompting that outlives a
//! single prompt: the installed handler, the default retry bound and the
//! set of parameters that have prompted successfully during this run.

use crate::error::PromptError;
use crate::handler::{Handlers, SharedHandler};
use crate::identifier::identify;
use crate::orchestrator::{execute_prompt, PromptOutcome};
use crate::registry::Registry;
use crate::store::ValueStore;
use crate::timing::PromptContext;
use indexmap::IndexSet;
use knobs_common::{ErrorChainExt, RetryBound};
use tracing::debug;

/// What one round of prompting did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptReport {
    /// Parameters whose input was stored, in prompt order
    pub stored: Vec<String>,
    /// Optional parameters left unset after running out of retries
    pub skipped: Vec<String>,
}

impl PromptReport {
    pub fn is_empty(&self) -> bool {
        self.stored.is_empty() && self.skipped.is_empty()
    }
}

#[derive(Default)]
pub struct PromptSession {
    handlers: Handlers,
    retry_bound: RetryBound,
    prompted: IndexSet<String>,
}

impl PromptSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a handler for every parameter without its own, or clear it
    pub fn install_handler(&mut self, handler: Option<SharedHandler>) {
        debug!(installed = handler.is_some(), "Prompt handler changed");
        self.handlers.install(handler);
    }

    /// Set the retry bound used by parameters that do not set their own
    pub fn set_retry_bound(&mut self, bound: impl Into<RetryBound>) {
        self.retry_bound = bound.into();
        debug!(bound = %self.retry_bound, "Default retry bound changed");
    }

    pub fn retry_bound(&self) -> RetryBound {
        self.retry_bound
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Parameters that prompted successfully, in the order they did
    pub fn prompted(&self) -> &IndexSet<String> {
        &self.prompted
    }

    pub fn has_prompted(&self, name: &str) -> bool {
        self.prompted.contains(name)
    }

    /// Run start prompts, after arguments and configuration are in place
    pub fn resolve_prompts_for_start(
        &mut self,
        registry: &Registry,
        store: &mut ValueStore,
    ) -> Result<PromptReport, PromptError> {
        self.resolve(registry, store, PromptContext::Start)
    }

    /// Run the prompts bound to a command, immediately before it runs
    pub fn resolve_prompts_for_command(
        &mut self,
        registry: &Registry,
        store: &mut ValueStore,
        command: &str,
    ) -> Result<PromptReport, PromptError> {
        self.resolve(registry, store, PromptContext::Command(command))
    }

    fn resolve(
        &mut self,
        registry: &Registry,
        store: &mut ValueStore,
        context: PromptContext<'_>,
    ) -> Result<PromptReport, PromptError> {
        let pending = identify(registry, store, &self.prompted, &self.handlers, context)?;

        let mut report = PromptReport::default();
        for prompt in &pending {
            let outcome = execute_prompt(prompt, store, self.retry_bound, &mut self.prompted)
                .inspect_err(|error| {
                    debug!(%context, "Prompting stopped:\n{}", error.error_chain());
                })?;
            match outcome {
                PromptOutcome::Stored { .. } => report.stored.push(prompt.name().to_string()),
                PromptOutcome::Skipped { .. } => report.skipped.push(prompt.name().to_string()),
            }
        }

        debug!(
            %context,
            stored = report.stored.len(),
            skipped = report.skipped.len(),
            "Prompt resolution finished"
        );
        Ok(report)
    }
}

//! # Knobs
//!
//! Named, typed parameters that can ask a human for their values at
//! controlled points in a program's execution.
//!
//! A parameter with prompt text prompts either once at start or immediately
//! before the commands it is bound to. Bindings come from the parameter's
//! own declaration, from a command's explicit prompt list, or automatically
//! from a command's required parameters. Failed input is retried up to a
//! bound and sensitive values never appear in messages.
//!
//! ```no_run
//! use knobs::{CommandDefinition, Knobs, Parameter, ParameterType};
//!
//! let mut knobs = Knobs::new();
//! knobs.register_parameter(
//!     Parameter::new("region", "Deployment region", ParameterType::Choice)
//!         .with_choices(vec!["eu-west".into(), "us-east".into()])
//!         .required(true)
//!         .with_prompt("Which region?"),
//! )?;
//! knobs.register_command(CommandDefinition::new("deploy", "Ship it").requires(["region"]))?;
//!
//! knobs.resolve_prompts_for_start()?;
//! knobs.resolve_prompts_for_command("deploy")?;
//! println!("{:?}", knobs.value("region"));
//! # Ok::<(), knobs::KnobsError>(())
//! ```
//!
//! ## Modules
//!
//! - [`registry`] - Parameter and command registration
//! - [`linker`] - The parameter/command prompt graph
//! - [`handler`] - Input handlers and their resolution
//! - [`timing`] - Whether a parameter prompts in a context
//! - [`identifier`] - Which parameters prompt in a context
//! - [`orchestrator`] - Retry loop for a single prompt
//! - [`session`] - State shared across prompts
//! - [`manifest`] - YAML and JSON definitions

pub mod command;
pub mod error;
pub mod handler;
pub mod identifier;
pub mod linker;
pub mod manifest;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod store;
pub mod timing;

pub use command::{CommandDefinition, PromptEntry};
pub use error::{KnobsError, KnobsResult, PromptError, RegistrationError};
pub use handler::{shared, InputError, PromptHandler, PromptRequest, SharedHandler, StdinHandler};
pub use knobs_common::{
    Parameter, ParameterError, ParameterType, PromptSpec, PromptTiming, RepeatPolicy, RetryBound,
    ValidationRules,
};
pub use manifest::{Manifest, ManifestError};
pub use registry::Registry;
pub use session::{PromptReport, PromptSession};
pub use store::ValueStore;

/// Registry, value store and prompt session bundled together
#[derive(Default)]
pub struct Knobs {
    registry: Registry,
    store: ValueStore,
    session: PromptSession,
}

impl Knobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a manifest, registering its parameters and commands
    pub fn from_manifest(manifest: Manifest) -> KnobsResult<Self> {
        let mut knobs = Self::new();
        manifest.register_into(&mut knobs.registry)?;
        Ok(knobs)
    }

    pub fn register_parameter(&mut self, param: Parameter) -> KnobsResult<()> {
        Ok(self.registry.register_parameter(param)?)
    }

    pub fn register_command(&mut self, command: CommandDefinition) -> KnobsResult<()> {
        Ok(self.registry.register_command(command)?)
    }

    /// Use `handler` for this parameter regardless of the installed handler
    pub fn set_parameter_handler(&mut self, name: &str, handler: SharedHandler) -> KnobsResult<()> {
        self.registry.set_parameter_handler(name, handler)
    }

    /// Install the handler used by parameters without their own, or clear it
    pub fn install_handler(&mut self, handler: Option<SharedHandler>) {
        self.session.install_handler(handler);
    }

    pub fn set_retry_bound(&mut self, bound: impl Into<RetryBound>) {
        self.session.set_retry_bound(bound);
    }

    pub fn set_allowed_values(&mut self, name: &str, values: Vec<String>) -> KnobsResult<()> {
        self.registry.set_allowed_values(name, values)
    }

    /// Supply a value from outside any prompt, validating it first
    ///
    /// Validation errors for sensitive parameters are redacted.
    pub fn set_value(&mut self, name: &str, value: serde_json::Value) -> KnobsResult<()> {
        let param = self
            .registry
            .parameter(name)
            .ok_or_else(|| KnobsError::UnknownParameter {
                name: name.to_string(),
            })?;

        self.store
            .store_external(param, value)
            .map_err(|e| KnobsError::Parameter(e.surfaced_for(param)))
    }

    pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
        self.store.get(name)
    }

    pub fn values(&self) -> &ValueStore {
        &self.store
    }

    /// Values with sensitive ones masked, suitable for display
    pub fn masked_values(&self) -> serde_json::Map<String, serde_json::Value> {
        self.store.masked(&self.registry)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn session(&self) -> &PromptSession {
        &self.session
    }

    pub fn resolve_prompts_for_start(&mut self) -> KnobsResult<PromptReport> {
        Ok(self
            .session
            .resolve_prompts_for_start(&self.registry, &mut self.store)?)
    }

    pub fn resolve_prompts_for_command(&mut self, command: &str) -> KnobsResult<PromptReport> {
        Ok(self
            .session
            .resolve_prompts_for_command(&self.registry, &mut self.store, command)?)
    }

    /// Parameters marked required that still have no value
    pub fn missing_required(&self) -> Vec<&str> {
        self.registry
            .parameters()
            .filter(|param| param.required && self.store.is_blank(&param.name))
            .map(|param| param.name.as_str())
            .collect()
    }
}

//! Parameter and command registry
//!
//! Registration is the only phase that mutates definitions. Each call either
//! applies completely or leaves the registry untouched: command registration
//! validates every entry before it registers inline parameters or links
//! anything.

use crate::command::{CommandDefinition, PromptEntry};
use crate::error::{KnobsError, KnobsResult, RegistrationError};
use crate::handler::SharedHandler;
use crate::linker::{self, PromptGraph};
use indexmap::{IndexMap, IndexSet};
use knobs_common::{Parameter, PromptTiming};
use std::collections::HashMap;
use tracing::debug;

#[derive(Default)]
pub struct Registry {
    parameters: IndexMap<String, Parameter>,
    commands: IndexMap<String, CommandDefinition>,
    graph: PromptGraph,
    handlers: HashMap<String, SharedHandler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter and link any commands it declares
    pub fn register_parameter(&mut self, mut param: Parameter) -> Result<(), RegistrationError> {
        if self.parameters.contains_key(&param.name) {
            return Err(RegistrationError::DuplicateParameter { name: param.name });
        }
        check_declaration(&param)?;

        linker::link_declared(&mut self.graph, &mut param);
        debug!(
            parameter = %param.name,
            prompting = param.is_prompting(),
            "Registered parameter"
        );
        self.parameters.insert(param.name.clone(), param);
        Ok(())
    }

    /// Register a command, registering inline prompt parameters and linking
    /// required and explicit prompt parameters to it
    ///
    /// Registering a command again replaces its definition; links it already
    /// created are kept and never duplicated.
    pub fn register_command(&mut self, command: CommandDefinition) -> Result<(), RegistrationError> {
        let plan = self.plan_command(&command)?;

        for mut param in plan.inline {
            linker::link_declared(&mut self.graph, &mut param);
            debug!(parameter = %param.name, command = %command.name, "Registered inline parameter");
            self.parameters.insert(param.name.clone(), param);
        }

        linker::auto_link_required(&mut self.graph, &mut self.parameters, &command);
        linker::link_explicit(
            &mut self.graph,
            &mut self.parameters,
            &command.name,
            &plan.explicit,
        );

        debug!(command = %command.name, "Registered command");
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    /// Validate a command against the current registry without changing it
    fn plan_command(&self, command: &CommandDefinition) -> Result<CommandPlan, RegistrationError> {
        let mut inline: IndexMap<String, Parameter> = IndexMap::new();
        let mut explicit: IndexSet<String> = IndexSet::new();

        for entry in &command.prompts {
            match entry {
                PromptEntry::Reference(name) => {
                    explicit.insert(name.clone());
                }
                PromptEntry::Inline(param) => {
                    let conflict = || RegistrationError::ConflictingInlineDefinition {
                        command: command.name.clone(),
                        parameter: param.name.clone(),
                    };

                    if let Some(existing) = self.parameters.get(&param.name) {
                        if !existing.declaration_matches(param) {
                            return Err(conflict());
                        }
                    } else if let Some(pending) = inline.get(&param.name) {
                        if !pending.declaration_matches(param) {
                            return Err(conflict());
                        }
                    } else {
                        check_declaration(param)?;
                        inline.insert(param.name.clone(), (**param).clone());
                    }
                    explicit.insert(param.name.clone());
                }
                PromptEntry::Unrecognized(value) => {
                    return Err(RegistrationError::InvalidPromptEntry {
                        command: command.name.clone(),
                        entry: value.to_string(),
                    });
                }
            }
        }

        let lookup = |name: &str| self.parameters.get(name).or_else(|| inline.get(name));

        for name in &command.requires {
            if lookup(name).is_none() {
                return Err(RegistrationError::UnknownParameter {
                    command: command.name.clone(),
                    parameter: name.clone(),
                });
            }
        }

        for name in &explicit {
            let Some(param) = lookup(name) else {
                return Err(RegistrationError::UnknownParameter {
                    command: command.name.clone(),
                    parameter: name.clone(),
                });
            };
            let Some(spec) = param.prompt.as_ref() else {
                return Err(RegistrationError::NotPrompting {
                    command: command.name.clone(),
                    parameter: name.clone(),
                });
            };
            if spec.timing == Some(PromptTiming::AtStart) {
                return Err(RegistrationError::ConflictingTiming {
                    parameter: name.clone(),
                    command: command.name.clone(),
                });
            }
        }

        Ok(CommandPlan {
            inline: inline.into_values().collect(),
            explicit: explicit.into_iter().collect(),
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Parameters in registration order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    /// Commands in registration order
    pub fn commands(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.values()
    }

    pub fn graph(&self) -> &PromptGraph {
        &self.graph
    }

    /// Whether prompts can be resolved for this command
    ///
    /// Parameters may declare commands that were never registered, so a
    /// command known only from the prompt graph counts.
    pub fn knows_command(&self, name: &str) -> bool {
        self.commands.contains_key(name) || self.graph.has_command(name)
    }

    /// Install a handler used only for this parameter
    pub fn set_parameter_handler(&mut self, name: &str, handler: SharedHandler) -> KnobsResult<()> {
        if !self.parameters.contains_key(name) {
            return Err(KnobsError::UnknownParameter {
                name: name.to_string(),
            });
        }
        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    pub fn parameter_handler(&self, name: &str) -> Option<&SharedHandler> {
        self.handlers.get(name)
    }

    /// Replace the allowed values of a parameter
    pub fn set_allowed_values(&mut self, name: &str, values: Vec<String>) -> KnobsResult<()> {
        let param = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| KnobsError::UnknownParameter {
                name: name.to_string(),
            })?;
        debug!(parameter = %name, count = values.len(), "Updated allowed values");
        param.choices = Some(values);
        Ok(())
    }
}

struct CommandPlan {
    inline: Vec<Parameter>,
    explicit: Vec<String>,
}

/// Checks a single parameter declaration on its own
fn check_declaration(param: &Parameter) -> Result<(), RegistrationError> {
    let Some(spec) = param.prompt.as_ref() else {
        return Ok(());
    };

    if param.parameter_type.is_none() {
        return Err(RegistrationError::MissingParameterType {
            name: param.name.clone(),
        });
    }

    if spec.timing == Some(PromptTiming::AtStart) {
        if let Some(command) = spec.commands.first() {
            return Err(RegistrationError::ConflictingTiming {
                parameter: param.name.clone(),
                command: command.clone(),
            });
        }
    }

    Ok(())
}

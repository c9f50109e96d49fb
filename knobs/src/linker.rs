//! Reciprocal links between parameters and the commands that trigger them
//!
//! [`PromptGraph`] holds both directions of the relationship: the commands a
//! parameter prompts before (its trigger set) and the parameters a command
//! prompts for (its prompt set). [`PromptGraph::link`] is the only way to add
//! an edge, so the two indices never disagree.
//!
//! The free functions here decide which edges registration creates and
//! settle each parameter's timing and link state as they do.

use crate::command::CommandDefinition;
use indexmap::{IndexMap, IndexSet};
use knobs_common::{LinkState, Parameter, PromptTiming};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptGraph {
    triggers: IndexMap<String, IndexSet<String>>,
    prompts: IndexMap<String, IndexSet<String>>,
}

impl PromptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge in both directions; returns false if it already existed
    pub fn link(&mut self, parameter: &str, command: &str) -> bool {
        let added = self
            .triggers
            .entry(parameter.to_string())
            .or_default()
            .insert(command.to_string());
        self.prompts
            .entry(command.to_string())
            .or_default()
            .insert(parameter.to_string());

        if added {
            trace!(parameter, command, "Linked parameter to command");
        }
        added
    }

    /// Commands that trigger a parameter, in link order
    pub fn triggers_of(&self, parameter: &str) -> Option<&IndexSet<String>> {
        self.triggers.get(parameter)
    }

    /// Parameters a command prompts for, in link order
    pub fn prompts_of(&self, command: &str) -> impl Iterator<Item = &str> {
        self.prompts
            .get(command)
            .into_iter()
            .flat_map(|params| params.iter().map(String::as_str))
    }

    pub fn is_linked(&self, parameter: &str, command: &str) -> bool {
        self.triggers
            .get(parameter)
            .is_some_and(|commands| commands.contains(command))
    }

    /// Whether any parameter is linked to this command
    pub fn has_command(&self, command: &str) -> bool {
        self.prompts.contains_key(command)
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.triggers.values().map(IndexSet::len).sum()
    }
}

/// Settle timing and link state for a freshly registered parameter and link
/// the commands it declares
///
/// The caller has already checked that declared commands do not conflict
/// with an explicit `at_start` timing.
pub(crate) fn link_declared(graph: &mut PromptGraph, param: &mut Parameter) {
    let name = param.name.clone();
    let Some(spec) = param.prompt.as_mut() else {
        return;
    };

    if !spec.commands.is_empty() && spec.timing.is_none() {
        spec.timing = Some(PromptTiming::AtCommand);
    }

    spec.link_state = if spec.has_explicit_timing() {
        LinkState::Resolved
    } else {
        LinkState::Pending
    };

    for command in &spec.commands {
        graph.link(&name, command);
    }
}

/// Bind pending prompting parameters from a command's required list
///
/// Only parameters still waiting for a timing are claimed; once claimed they
/// are resolved and no later command can claim them again.
pub(crate) fn auto_link_required(
    graph: &mut PromptGraph,
    parameters: &mut IndexMap<String, Parameter>,
    command: &CommandDefinition,
) {
    for name in &command.requires {
        let Some(spec) = parameters
            .get_mut(name)
            .and_then(|param| param.prompt.as_mut())
        else {
            continue;
        };

        if spec.link_state != LinkState::Pending {
            trace!(parameter = %name, command = %command.name, "Timing already settled; not auto-linking");
            continue;
        }

        spec.timing = Some(PromptTiming::AtCommand);
        spec.link_state = LinkState::Resolved;
        graph.link(name, &command.name);
        debug!(parameter = %name, command = %command.name, "Auto-linked required parameter to command");
    }
}

/// Link every parameter in a command's explicit prompt list
///
/// Names must already be registered with prompt text and must not be fixed
/// to `at_start`; the caller validates that before mutating anything.
pub(crate) fn link_explicit(
    graph: &mut PromptGraph,
    parameters: &mut IndexMap<String, Parameter>,
    command: &str,
    names: &[String],
) {
    for name in names {
        if let Some(spec) = parameters
            .get_mut(name)
            .and_then(|param| param.prompt.as_mut())
        {
            if spec.timing.is_none() {
                spec.timing = Some(PromptTiming::AtCommand);
            }
            spec.link_state = LinkState::Resolved;
        }
        if graph.link(name, command) {
            debug!(parameter = %name, command, "Linked prompt parameter to command");
        }
    }
}

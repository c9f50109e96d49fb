//! `knobs check`: validate a manifest and summarize its prompts

use super::load_manifest;
use crate::cli::CheckArgs;
use knobs::{Knobs, PromptTiming};
use std::fmt::Write;

pub fn handle_command(args: &CheckArgs) -> anyhow::Result<()> {
    let knobs = load_manifest(&args.manifest)?;
    print!("{}", summarize(&knobs));
    Ok(())
}

/// One line per parameter and command, in declaration order
fn summarize(knobs: &Knobs) -> String {
    let registry = knobs.registry();
    let mut out = String::new();

    let parameters: Vec<_> = registry.parameters().collect();
    let _ = writeln!(out, "Parameters ({}):", parameters.len());
    for param in parameters {
        let kind = param
            .parameter_type
            .map(|t| t.as_str())
            .unwrap_or("untyped");
        let when = match &param.prompt {
            None => "not prompted".to_string(),
            Some(spec) => match spec.effective_timing() {
                PromptTiming::AtStart => "prompted at start".to_string(),
                PromptTiming::AtCommand => {
                    let commands: Vec<&str> = registry
                        .graph()
                        .triggers_of(&param.name)
                        .map(|set| set.iter().map(String::as_str).collect())
                        .unwrap_or_default();
                    format!(
                        "prompted before {}, {}",
                        commands.join(", "),
                        spec.repeat.as_str()
                    )
                }
            },
        };
        let flags = match (param.required, param.sensitive) {
            (true, true) => " (required, sensitive)",
            (true, false) => " (required)",
            (false, true) => " (sensitive)",
            (false, false) => "",
        };
        let _ = writeln!(out, "  {} [{kind}]{flags}: {when}", param.name);
    }

    let commands: Vec<_> = registry.commands().collect();
    let _ = writeln!(out, "Commands ({}):", commands.len());
    for command in commands {
        let prompts: Vec<&str> = registry.graph().prompts_of(&command.name).collect();
        let listed = if prompts.is_empty() {
            "no prompts".to_string()
        } else {
            format!("prompts {}", prompts.join(", "))
        };
        let _ = writeln!(out, "  {}: {listed}", command.name);
    }

    out
}

//! `knobs run`: collect values, resolve prompts and print the result

use super::load_manifest;
use crate::cli::{OutputFormat, RunArgs};
use anyhow::Context;
use knobs::Knobs;
use knobs_common::Pretty;
use knobs_config::{ConfigProvider, PromptSettings};
use serde_json::Value;
use tracing::{debug, info, warn};

pub fn handle_command(args: &RunArgs) -> anyhow::Result<()> {
    let mut knobs = load_manifest(&args.manifest)?;

    let mut provider = ConfigProvider::new();
    if let Some(path) = &args.config {
        provider = provider.with_file(path);
    }
    let settings = provider
        .load_settings()
        .context("Failed to load configuration")?;

    apply_settings(&mut knobs, &settings)?;
    if let Some(retries) = args.retries {
        knobs.set_retry_bound(retries);
    }

    for (name, raw) in &args.vars {
        knobs
            .set_value(name, Value::String(raw.clone()))
            .with_context(|| format!("Invalid --var for '{name}'"))?;
    }

    let start = knobs.resolve_prompts_for_start()?;
    let command = knobs.resolve_prompts_for_command(&args.command)?;
    info!(
        command = %args.command,
        stored = start.stored.len() + command.stored.len(),
        skipped = start.skipped.len() + command.skipped.len(),
        "Prompts resolved"
    );

    let missing = knobs.missing_required();
    if !missing.is_empty() {
        warn!("Required parameters without a value: {}", missing.join(", "));
    }

    print!("{}", render(&knobs, args.format)?);
    Ok(())
}

/// Seed the retry bound and configured values
///
/// Configured values for parameters the manifest does not declare are ignored.
fn apply_settings(knobs: &mut Knobs, settings: &PromptSettings) -> anyhow::Result<()> {
    knobs.set_retry_bound(settings.retry_bound());

    for (name, value) in &settings.values {
        if knobs.registry().parameter(name).is_none() {
            warn!("Ignoring configured value for unknown parameter '{name}'");
            continue;
        }
        knobs
            .set_value(name, value.clone())
            .with_context(|| format!("Invalid configured value for '{name}'"))?;
    }
    Ok(())
}

fn render(knobs: &Knobs, format: OutputFormat) -> anyhow::Result<String> {
    let values = Value::Object(knobs.masked_values());
    debug!("Resolved values: {}", Pretty(&values));
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(&values)?,
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&values)?),
    };
    Ok(rendered)
}

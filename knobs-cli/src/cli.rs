use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "knobs")]
#[command(version)]
#[command(about = "Check parameter manifests and prompt for parameter values")]
#[command(long_about = "
knobs loads a manifest of parameters and commands, collects values from
configuration files, KNOBS_ environment variables and --var switches, and
prompts for whatever is still needed at start and before the chosen command.

Example:
  knobs check --manifest knobs.yaml
  knobs run --manifest knobs.yaml deploy --var region=eu-west
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a manifest and show which parameters prompt where
    Check(CheckArgs),

    /// Resolve prompts for a command and print the resulting values
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Manifest file (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub manifest: PathBuf,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Manifest file (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Command whose prompts run after the start prompts
    pub command: String,

    /// Parameter values as key=value pairs
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Retries after a failed prompt; negative means unlimited
    #[arg(long, allow_negative_numbers = true)]
    pub retries: Option<i64>,

    /// Extra configuration file merged over the discovered ones
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format for the resolved values
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Parse a `KEY=VALUE` switch; the value may itself contain `=`
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("region=eu-west"),
            Ok(("region".to_string(), "eu-west".to_string()))
        );
        assert_eq!(
            parse_var("query=a=b"),
            Ok(("query".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_var("note="), Ok(("note".to_string(), String::new())));
        assert!(parse_var("region").is_err());
        assert!(parse_var("=value").is_err());
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "knobs",
            "--debug",
            "run",
            "--manifest",
            "knobs.yaml",
            "deploy",
            "--var",
            "region=eu",
            "--var",
            "replicas=2",
            "--retries",
            "-1",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(cli.debug);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.command, "deploy");
                assert_eq!(args.vars.len(), 2);
                assert_eq!(args.retries, Some(-1));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("Expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_var_without_equals_rejected() {
        let result = Cli::try_parse_from(["knobs", "run", "-m", "k.yaml", "deploy", "--var", "x"]);
        assert!(result.is_err());
    }
}

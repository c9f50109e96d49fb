//! Mapping errors to exit codes

use crate::exit_codes::{EXIT_CONFIG_ERROR, EXIT_ERROR};
use knobs::{KnobsError, ManifestError, RegistrationError};
use knobs_common::{ErrorSeverity, Severity};
use knobs_config::ConfigError;

/// Exit code for an error returned by a command handler
///
/// Critical errors mean the manifest or configuration is unusable.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match severity_of(error) {
        Some(ErrorSeverity::Critical) => EXIT_CONFIG_ERROR,
        _ => EXIT_ERROR,
    }
}

/// Severity of the first known error type behind any added context
fn severity_of(error: &anyhow::Error) -> Option<ErrorSeverity> {
    error
        .downcast_ref::<KnobsError>()
        .map(Severity::severity)
        .or_else(|| error.downcast_ref::<ConfigError>().map(Severity::severity))
        .or_else(|| error.downcast_ref::<ManifestError>().map(Severity::severity))
        .or_else(|| error.downcast_ref::<RegistrationError>().map(Severity::severity))
}

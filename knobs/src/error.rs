//! Error types for registration and prompting

use crate::manifest::ManifestError;
use knobs_common::{ErrorSeverity, ParameterError, Severity};
use thiserror::Error;

/// Configuration problems detected while registering parameters or commands
///
/// Raised synchronously during the registration phase and always fatal: a
/// registry that failed to register is left exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistrationError {
    /// A parameter with this name already exists
    #[error("Parameter '{name}' is already registered")]
    DuplicateParameter { name: String },

    /// A prompting parameter must declare how its input is parsed
    #[error("Parameter '{name}' declares prompt text but no type")]
    MissingParameterType { name: String },

    /// A command refers to a parameter that was never registered
    #[error("Command '{command}' references unknown parameter '{parameter}'")]
    UnknownParameter { command: String, parameter: String },

    /// A command lists a parameter as a prompt but the parameter has no prompt text
    #[error("Command '{command}' lists parameter '{parameter}' as a prompt, but it declares no prompt text")]
    NotPrompting { command: String, parameter: String },

    /// A prompt entry is neither a name nor an inline parameter definition
    #[error("Command '{command}' has an invalid prompt entry: {entry}")]
    InvalidPromptEntry { command: String, entry: String },

    /// A parameter fixed to prompt at start is bound to a command
    #[error("Parameter '{parameter}' prompts at start and cannot be bound to command '{command}'")]
    ConflictingTiming { parameter: String, command: String },

    /// An inline definition disagrees with the parameter already registered under that name
    #[error("Command '{command}' redefines parameter '{parameter}' inline with a different definition")]
    ConflictingInlineDefinition { command: String, parameter: String },
}

impl Severity for RegistrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

/// Failures while collecting input for a parameter
#[derive(Debug, Error)]
pub enum PromptError {
    /// Retries were exhausted for a required parameter
    ///
    /// `source` is already redacted when the parameter is sensitive.
    #[error("Parameter '{parameter}' could not be set: {source}")]
    Validation {
        parameter: String,
        #[source]
        source: ParameterError,
    },

    /// The input stream closed while a prompt was waiting
    #[error("Input ended while prompting for '{parameter}'")]
    EndOfInput { parameter: String },

    /// The user interrupted a prompt
    #[error("Prompt for '{parameter}' was aborted")]
    Aborted { parameter: String },

    /// Reading input failed
    #[error("Failed to read input for '{parameter}': {source}")]
    Io {
        parameter: String,
        #[source]
        source: std::io::Error,
    },

    /// Prompts were requested for a command nothing knows about
    #[error("Unknown command '{name}'")]
    UnknownCommand { name: String },
}

impl PromptError {
    /// Name of the parameter being prompted when the error happened
    pub fn parameter(&self) -> Option<&str> {
        match self {
            PromptError::Validation { parameter, .. }
            | PromptError::EndOfInput { parameter }
            | PromptError::Aborted { parameter }
            | PromptError::Io { parameter, .. } => Some(parameter),
            PromptError::UnknownCommand { .. } => None,
        }
    }

    /// Whether the error came from the input stream rather than bad input
    pub fn is_interruption(&self) -> bool {
        matches!(
            self,
            PromptError::EndOfInput { .. } | PromptError::Aborted { .. } | PromptError::Io { .. }
        )
    }
}

impl Severity for PromptError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

/// Top-level error for the [`crate::Knobs`] facade
#[derive(Debug, Error)]
pub enum KnobsError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl KnobsError {
    /// Whether this error means the parameter and command definitions are unusable
    pub fn is_configuration_error(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

impl Severity for KnobsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            KnobsError::Registration(e) => e.severity(),
            KnobsError::Prompt(e) => e.severity(),
            KnobsError::Parameter(e) => e.severity(),
            KnobsError::Manifest(e) => e.severity(),
            KnobsError::UnknownParameter { .. } => ErrorSeverity::Error,
        }
    }
}

/// Result type for facade operations
pub type KnobsResult<T> = Result<T, KnobsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_error_severity() {
        let validation = PromptError::Validation {
            parameter: "region".to_string(),
            source: ParameterError::MissingRequired {
                name: "region".to_string(),
            },
        };
        assert_eq!(validation.severity(), ErrorSeverity::Error);
        assert!(!validation.is_interruption());

        let eof = PromptError::EndOfInput {
            parameter: "region".to_string(),
        };
        assert_eq!(eof.severity(), ErrorSeverity::Error);
        assert!(eof.is_interruption());
        assert_eq!(eof.parameter(), Some("region"));
    }

    #[test]
    fn test_registration_errors_are_configuration_errors() {
        let error = KnobsError::from(RegistrationError::DuplicateParameter {
            name: "region".to_string(),
        });
        assert!(error.is_configuration_error());
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert_eq!(error.to_string(), "Parameter 'region' is already registered");
    }

    #[test]
    fn test_validation_error_names_parameter() {
        let error = PromptError::Validation {
            parameter: "token".to_string(),
            source: ParameterError::InvalidSensitiveValue {
                name: "token".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "Parameter 'token' could not be set: Invalid value for parameter 'token'"
        );
    }
}

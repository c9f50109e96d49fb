//! Input handlers and handler resolution
//!
//! A [`PromptHandler`] turns a [`PromptRequest`] into raw text. Three sources
//! can supply one for a parameter, checked in this order:
//!
//! 1. a handler registered for that parameter on the registry,
//! 2. the handler installed on the prompt session,
//! 3. [`StdinHandler`], which reads from standard input.
//!
//! [`Handlers::resolve`] applies that precedence and never fails.

use dialoguer::{theme::ColorfulTheme, Input, Password};
use knobs_common::{Parameter, ParameterType};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use thiserror::Error;

/// Everything a handler needs to ask for one value
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    /// Parameter identifier
    pub name: String,
    /// Question shown to the user
    pub text: String,
    /// Semantic type used to parse the answer
    pub parameter_type: Option<ParameterType>,
    /// Allowed values, empty when unrestricted
    pub choices: Vec<String>,
    /// Default rendered for display; always `None` for sensitive parameters
    pub default: Option<String>,
    /// Input must not be echoed
    pub sensitive: bool,
    /// Blank input is rejected unless a default exists
    pub required: bool,
    /// 1-based attempt number
    pub attempt: u32,
}

impl PromptRequest {
    /// Build the request for one attempt at prompting `param`
    pub fn for_parameter(param: &Parameter, attempt: u32) -> Self {
        let text = match param.prompt_text() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ if !param.description.is_empty() => param.description.clone(),
            _ => param.name.clone(),
        };

        Self {
            name: param.name.clone(),
            text,
            parameter_type: param.parameter_type,
            choices: param.choices.clone().unwrap_or_default(),
            default: param.default_display(),
            sensitive: param.sensitive,
            required: param.required,
            attempt,
        }
    }

    /// Prompt line with choices and default appended
    pub fn label(&self) -> String {
        let mut label = self.text.clone();
        if !self.choices.is_empty() {
            label.push_str(&format!(" [{}]", self.choices.join("/")));
        } else if self.parameter_type == Some(ParameterType::Boolean) {
            label.push_str(" [y/n]");
        }
        if let Some(default) = &self.default {
            label.push_str(&format!(" (default: {default})"));
        }
        label
    }
}

/// Why a handler could not produce any text
#[derive(Debug, Error)]
pub enum InputError {
    /// The input stream is exhausted
    #[error("input ended before a value was entered")]
    EndOfInput,

    /// The user interrupted the prompt
    #[error("input was interrupted")]
    Aborted,

    /// Any other read failure
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    fn from_io(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => InputError::EndOfInput,
            io::ErrorKind::Interrupted => InputError::Aborted,
            _ => InputError::Io(error),
        }
    }

    fn from_dialoguer(error: dialoguer::Error) -> Self {
        match error {
            dialoguer::Error::IO(error) => InputError::from_io(error),
        }
    }
}

/// Source of raw input for a parameter
pub trait PromptHandler: Send + Sync {
    /// Produce raw text for one attempt
    fn read(&self, request: &PromptRequest) -> Result<String, InputError>;

    /// Show a message to whoever is answering, such as a retry notice
    fn notify(&self, message: &str) {
        eprintln!("❌ {message}");
    }
}

impl<F> PromptHandler for F
where
    F: Fn(&PromptRequest) -> Result<String, InputError> + Send + Sync,
{
    fn read(&self, request: &PromptRequest) -> Result<String, InputError> {
        self(request)
    }
}

/// Handler shared between the registry, the session and pending prompts
pub type SharedHandler = Arc<dyn PromptHandler>;

/// Wrap a handler for installation
pub fn shared<H: PromptHandler + 'static>(handler: H) -> SharedHandler {
    Arc::new(handler)
}

/// Built-in handler reading standard input
///
/// Uses dialoguer when stdin is a terminal, with a non-echoing password
/// prompt for sensitive parameters. Otherwise reads one line per prompt so
/// piped input works.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinHandler;

impl StdinHandler {
    fn read_interactive(&self, request: &PromptRequest) -> Result<String, InputError> {
        let theme = ColorfulTheme::default();

        let result = if request.sensitive {
            Password::with_theme(&theme)
                .with_prompt(request.label())
                .allow_empty_password(true)
                .interact()
        } else {
            Input::<String>::with_theme(&theme)
                .with_prompt(request.label())
                .allow_empty(true)
                .interact_text()
        };

        result.map_err(InputError::from_dialoguer)
    }

    fn read_line(&self, request: &PromptRequest) -> Result<String, InputError> {
        let mut stderr = io::stderr();
        write!(stderr, "{}: ", request.label()).map_err(InputError::from_io)?;
        stderr.flush().map_err(InputError::from_io)?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(InputError::from_io)?;

        if read == 0 {
            return Err(InputError::EndOfInput);
        }
        Ok(line)
    }
}

impl PromptHandler for StdinHandler {
    fn read(&self, request: &PromptRequest) -> Result<String, InputError> {
        if io::stdin().is_terminal() {
            self.read_interactive(request)
        } else {
            self.read_line(request)
        }
    }
}

/// Process-wide handler slot plus the built-in fallback
pub struct Handlers {
    installed: Option<SharedHandler>,
    fallback: SharedHandler,
}

impl Handlers {
    pub fn new() -> Self {
        Self {
            installed: None,
            fallback: Arc::new(StdinHandler),
        }
    }

    /// Install or clear the process-wide handler
    pub fn install(&mut self, handler: Option<SharedHandler>) {
        self.installed = handler;
    }

    pub fn installed(&self) -> Option<&SharedHandler> {
        self.installed.as_ref()
    }

    /// Pick the handler for a parameter given its own override, if any
    pub fn resolve(&self, parameter_override: Option<&SharedHandler>) -> SharedHandler {
        let handler = parameter_override
            .or(self.installed.as_ref())
            .unwrap_or(&self.fallback);
        Arc::clone(handler)
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed(answer: &'static str) -> SharedHandler {
        shared(move |_: &PromptRequest| -> Result<String, InputError> {
            Ok(answer.to_string())
        })
    }

    fn request() -> PromptRequest {
        let param = Parameter::new("region", "Deployment region", ParameterType::String);
        PromptRequest::for_parameter(&param, 1)
    }

    #[test]
    fn test_parameter_override_wins() {
        let mut handlers = Handlers::new();
        handlers.install(Some(fixed("installed")));
        let own = fixed("own");

        let resolved = handlers.resolve(Some(&own));
        assert_eq!(resolved.read(&request()).unwrap(), "own");
    }

    #[test]
    fn test_installed_handler_beats_fallback() {
        let mut handlers = Handlers::new();
        handlers.install(Some(fixed("installed")));

        let resolved = handlers.resolve(None);
        assert_eq!(resolved.read(&request()).unwrap(), "installed");
    }

    #[test]
    fn test_clearing_installed_handler_restores_fallback() {
        let mut handlers = Handlers::new();
        handlers.install(Some(fixed("installed")));
        handlers.install(None);
        assert!(handlers.installed().is_none());
    }

    #[test]
    fn test_request_hides_sensitive_default() {
        let param = Parameter::new("password", "Database password", ParameterType::String)
            .with_default(json!("changeme"))
            .sensitive(true)
            .with_prompt("Password");

        let request = PromptRequest::for_parameter(&param, 2);
        assert_eq!(request.default, None);
        assert!(request.sensitive);
        assert_eq!(request.attempt, 2);
        assert_eq!(request.label(), "Password");
    }

    #[test]
    fn test_request_label_lists_choices_and_default() {
        let param = Parameter::new("region", "Region", ParameterType::Choice)
            .with_choices(vec!["eu".to_string(), "us".to_string()])
            .with_default(json!("eu"))
            .with_prompt("Region");

        let request = PromptRequest::for_parameter(&param, 1);
        assert_eq!(request.label(), "Region [eu/us] (default: eu)");
    }

    #[test]
    fn test_request_text_falls_back_to_description() {
        let param = Parameter::new("region", "Deployment region", ParameterType::String)
            .with_prompt("");
        assert_eq!(PromptRequest::for_parameter(&param, 1).text, "Deployment region");
    }

    #[test]
    fn test_io_error_kinds_map_to_interruptions() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "closed");
        assert!(matches!(InputError::from_io(eof), InputError::EndOfInput));

        let interrupted = io::Error::new(io::ErrorKind::Interrupted, "ctrl-c");
        assert!(matches!(InputError::from_io(interrupted), InputError::Aborted));

        let other = io::Error::other("broken");
        assert!(matches!(InputError::from_io(other), InputError::Io(_)));
    }

    #[test]
    fn test_terminal_interrupt_maps_to_abort() {
        let ctrl_c = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(matches!(InputError::from_dialoguer(ctrl_c), InputError::Aborted));

        let closed = dialoguer::Error::IO(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"));
        assert!(matches!(InputError::from_dialoguer(closed), InputError::EndOfInput));
    }
}

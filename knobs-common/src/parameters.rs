//! Parameter definitions, raw-input parsing and validation
//!
//! A [`Parameter`] is a named, typed configuration value. Values are held as
//! `serde_json::Value`; raw text collected from a human or the command line is
//! turned into a value by [`parse_input`] and checked by
//! [`ParameterValidator`]. Errors carry the offending value so they can explain
//! themselves, which is why every error surfaced for a sensitive parameter
//! must go through [`ParameterError::redacted`] first.

use crate::error::{ErrorSeverity, Severity};
use crate::prompt_spec::{PromptSpec, PromptTiming, RepeatPolicy, RetryBound};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Why a value was rejected for a parameter
///
/// Every variant except [`ParameterError::InvalidSensitiveValue`] may quote
/// the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Invalid parameter definition: {message}")]
    ValidationFailed { message: String },

    #[error("'{name}' is required but has no value")]
    MissingRequired { name: String },

    /// The stored JSON value has the wrong shape for the declared type
    #[error("'{name}' should be a {expected_type} but got a {actual_type}")]
    TypeMismatch {
        name: String,
        expected_type: String,
        actual_type: String,
    },

    /// Raw text that cannot be read as the declared type
    #[error("'{value}' is not a valid {expected} for '{name}'")]
    InvalidInput {
        name: String,
        value: String,
        expected: String,
    },

    #[error("'{value}' is not an allowed value for '{name}' (one of: {})", .choices.join(", "))]
    InvalidChoice {
        name: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("{value} is outside the allowed range for '{name}' [{}, {}]", bound(.min), bound(.max))]
    OutOfRange {
        name: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("'{value}' for '{name}' does not match /{pattern}/")]
    PatternMismatch {
        name: String,
        value: String,
        pattern: String,
    },

    #[error("'{name}' needs at least {min_length} characters, got {actual_length}")]
    StringTooShort {
        name: String,
        min_length: usize,
        actual_length: usize,
    },

    #[error("'{name}' allows at most {max_length} characters, got {actual_length}")]
    StringTooLong {
        name: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("{value} for '{name}' is not a multiple of {step}")]
    InvalidStep { name: String, value: f64, step: f64 },

    /// Stand-in for any of the above on a sensitive parameter
    #[error("Invalid value for parameter '{name}'")]
    InvalidSensitiveValue { name: String },
}

fn bound(limit: &Option<f64>) -> String {
    limit.map_or_else(|| "any".to_string(), |v| v.to_string())
}

impl ParameterError {
    /// Name of the parameter this error is about, when it names one
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            ParameterError::ValidationFailed { .. } => None,
            ParameterError::MissingRequired { name }
            | ParameterError::TypeMismatch { name, .. }
            | ParameterError::InvalidInput { name, .. }
            | ParameterError::InvalidChoice { name, .. }
            | ParameterError::OutOfRange { name, .. }
            | ParameterError::PatternMismatch { name, .. }
            | ParameterError::StringTooShort { name, .. }
            | ParameterError::StringTooLong { name, .. }
            | ParameterError::InvalidStep { name, .. }
            | ParameterError::InvalidSensitiveValue { name } => Some(name),
        }
    }

    /// Replace this error with one that only names the parameter
    ///
    /// Used for sensitive parameters: the returned error never contains the
    /// offending value, a default or a pattern derived from either.
    pub fn redacted(&self, name: &str) -> ParameterError {
        ParameterError::InvalidSensitiveValue {
            name: name.to_string(),
        }
    }

    /// Redact this error if the parameter it belongs to is sensitive
    pub fn surfaced_for(self, param: &Parameter) -> ParameterError {
        if param.sensitive {
            self.redacted(&param.name)
        } else {
            self
        }
    }
}

impl Severity for ParameterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

pub type ParameterResult<T> = Result<T, ParameterError>;

/// Semantic types of parameter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Free text
    String,
    /// Integer or float
    Number,
    /// On/off toggle
    Boolean,
    /// One value from an enumerated set
    Choice,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Choice => "choice",
        }
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "text" | "str" => Ok(ParameterType::String),
            "number" | "numeric" | "int" | "integer" | "float" => Ok(ParameterType::Number),
            "boolean" | "bool" | "toggle" | "flag" => Ok(ParameterType::Boolean),
            "choice" | "select" | "enum" | "enumerated" => Ok(ParameterType::Choice),
            other => Err(format!("Unknown parameter type '{other}'")),
        }
    }
}

/// Constraints checked after a value has the right type
///
/// Length and pattern rules apply to strings, `min`/`max`/`step` to numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the whole input is searched with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length_range(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        (self.min_length, self.max_length) = (min, max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_numeric_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        (self.min, self.max) = (min, max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
}

/// A named, typed configuration value that may prompt for its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Unique identifier
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Whether this parameter must end up with a value
    #[serde(default)]
    pub required: bool,

    /// Semantic type used to interpret raw input
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<ParameterType>,

    /// Value used when input is left blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Allowed values; also checked for string parameters when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,

    /// Suppresses echo, default display and values in error messages
    #[serde(default)]
    pub sensitive: bool,

    /// Interactive prompt configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptSpec>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter_type: ParameterType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
            parameter_type: Some(parameter_type),
            default: None,
            choices: None,
            validation: None,
            sensitive: false,
            prompt: None,
        }
    }

    /// Create a parameter without a declared semantic type
    ///
    /// Such a parameter accepts any text and cannot prompt.
    pub fn untyped(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            parameter_type: None,
            ..Self::new(name, description, ParameterType::String)
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Suppress echo, default display and values in errors
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Apply `update` to the rules, starting from empty ones
    fn update_rules(mut self, update: impl FnOnce(ValidationRules) -> ValidationRules) -> Self {
        self.validation = Some(update(self.validation.take().unwrap_or_default()));
        self
    }

    pub fn with_pattern(self, pattern: impl Into<String>) -> Self {
        self.update_rules(|rules| rules.with_pattern(pattern))
    }

    pub fn with_range(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.update_rules(|rules| rules.with_numeric_range(min, max))
    }

    pub fn with_length_range(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.update_rules(|rules| rules.with_length_range(min, max))
    }

    pub fn with_step(self, step: f64) -> Self {
        self.update_rules(|rules| rules.with_step(step))
    }

    /// Attach prompt text, leaving timing to command auto-linking
    pub fn with_prompt(mut self, text: impl Into<String>) -> Self {
        self.prompt = Some(PromptSpec::new(text));
        self
    }

    /// Prompt once at start of execution
    pub fn prompt_at_start(mut self) -> Self {
        let spec = self.prompt_spec_mut();
        spec.timing = Some(PromptTiming::AtStart);
        self
    }

    /// Prompt immediately before each of the given commands
    pub fn prompt_before<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self.prompt_spec_mut();
        spec.timing = Some(PromptTiming::AtCommand);
        spec.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    /// Set the repeat policy for command-bound prompting
    pub fn with_repeat(mut self, repeat: RepeatPolicy) -> Self {
        self.prompt_spec_mut().repeat = repeat;
        self
    }

    /// Override the session retry bound for this parameter
    pub fn with_retries(mut self, retries: impl Into<RetryBound>) -> Self {
        self.prompt_spec_mut().retries = Some(retries.into());
        self
    }

    fn prompt_spec_mut(&mut self) -> &mut PromptSpec {
        let description = self.description.clone();
        self.prompt
            .get_or_insert_with(|| PromptSpec::new(description))
    }

    /// Whether this parameter declares prompt text
    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    /// Prompt text, if any
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_ref().map(|spec| spec.text.as_str())
    }

    /// Default value rendered for display, withheld for sensitive parameters
    pub fn default_display(&self) -> Option<String> {
        if self.sensitive {
            return None;
        }
        self.default.as_ref().map(display_value)
    }

    /// Whether two declarations describe the same parameter
    ///
    /// Ignores state the linker fills in during registration, so a registered
    /// parameter still matches the declaration it was created from.
    pub fn declaration_matches(&self, other: &Parameter) -> bool {
        let normalize = |param: &Parameter| {
            let mut param = param.clone();
            if let Some(spec) = param.prompt.as_mut() {
                spec.link_state = Default::default();
                if spec.commands.is_empty() {
                    spec.timing = None;
                }
            }
            param
        };
        normalize(self) == normalize(other)
    }
}

/// Render a value the way a user would type it
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Whether a stored value counts as absent
///
/// Missing, null, whitespace-only strings and empty arrays are blank.
pub fn is_blank(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(serde_json::Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Parse raw text according to the parameter type
///
/// Untyped parameters keep the text as a string.
pub fn parse_input(param: &Parameter, raw: &str) -> ParameterResult<serde_json::Value> {
    use serde_json::Value;

    match param.parameter_type {
        None | Some(ParameterType::String) => Ok(Value::String(raw.to_string())),
        Some(ParameterType::Choice) => Ok(Value::String(raw.trim().to_string())),
        Some(ParameterType::Boolean) => parse_toggle(raw.trim())
            .map(Value::Bool)
            .ok_or_else(|| ParameterError::InvalidInput {
                name: param.name.clone(),
                value: raw.to_string(),
                expected: "boolean (yes/no, true/false, on/off, 1/0)".to_string(),
            }),
        Some(ParameterType::Number) => {
            let trimmed = raw.trim();
            // Try parsing as integer first, then float
            if let Ok(int_val) = trimmed.parse::<i64>() {
                return Ok(Value::Number(int_val.into()));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| ParameterError::InvalidInput {
                    name: param.name.clone(),
                    value: raw.to_string(),
                    expected: "number".to_string(),
                })
        }
    }
}

fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Checks a typed value against a parameter's type, choices and rules
///
/// Parameters without a declared type accept anything.
pub struct ParameterValidator;

impl ParameterValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_parameter(
        &self,
        param: &Parameter,
        value: &serde_json::Value,
    ) -> ParameterResult<()> {
        let Some(parameter_type) = param.parameter_type else {
            return Ok(());
        };

        match parameter_type {
            ParameterType::String => {
                let Some(str_value) = value.as_str() else {
                    return Err(self.type_mismatch(param, "string", value));
                };

                if let Some(validation) = &param.validation {
                    self.validate_string_with_rules(param, str_value, validation)?;
                }

                self.validate_choice(param, str_value)?;
            }

            ParameterType::Boolean => {
                if !value.is_boolean() {
                    return Err(self.type_mismatch(param, "boolean", value));
                }
            }

            ParameterType::Number => {
                let Some(num_value) = value.as_f64() else {
                    return Err(self.type_mismatch(param, "number", value));
                };

                if let Some(validation) = &param.validation {
                    self.validate_number_with_rules(param, num_value, validation)?;
                }
            }

            ParameterType::Choice => {
                let Some(str_value) = value.as_str() else {
                    return Err(self.type_mismatch(param, "string", value));
                };

                match &param.choices {
                    Some(choices) if !choices.is_empty() => {
                        self.validate_choice(param, str_value)?;
                    }
                    _ => {
                        return Err(ParameterError::ValidationFailed {
                            message: format!(
                                "Choice parameter '{}' has no choices defined",
                                param.name
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_choice(&self, param: &Parameter, str_value: &str) -> ParameterResult<()> {
        if let Some(choices) = &param.choices {
            if !choices.iter().any(|choice| choice == str_value) {
                return Err(ParameterError::InvalidChoice {
                    name: param.name.clone(),
                    value: str_value.to_string(),
                    choices: choices.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_string_with_rules(
        &self,
        param: &Parameter,
        text: &str,
        rules: &ValidationRules,
    ) -> ParameterResult<()> {
        if let Some(pattern) = &rules.pattern {
            match regex::Regex::new(pattern) {
                Ok(regex) if !regex.is_match(text) => {
                    return Err(ParameterError::PatternMismatch {
                        name: param.name.clone(),
                        value: text.to_string(),
                        pattern: pattern.clone(),
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(parameter = %param.name, "Ignoring invalid pattern: {e}");
                }
            }
        }

        // Lengths count chars, not bytes
        let length = text.chars().count();
        match (rules.min_length, rules.max_length) {
            (Some(min), _) if length < min => Err(ParameterError::StringTooShort {
                name: param.name.clone(),
                min_length: min,
                actual_length: length,
            }),
            (_, Some(max)) if length > max => Err(ParameterError::StringTooLong {
                name: param.name.clone(),
                max_length: max,
                actual_length: length,
            }),
            _ => Ok(()),
        }
    }

    fn validate_number_with_rules(
        &self,
        param: &Parameter,
        number: f64,
        rules: &ValidationRules,
    ) -> ParameterResult<()> {
        let below = rules.min.is_some_and(|min| number < min);
        let above = rules.max.is_some_and(|max| number > max);
        if below || above {
            return Err(ParameterError::OutOfRange {
                name: param.name.clone(),
                value: number,
                min: rules.min,
                max: rules.max,
            });
        }

        match rules.step {
            Some(step) if step > 0.0 && !is_multiple(number, step) => {
                Err(ParameterError::InvalidStep {
                    name: param.name.clone(),
                    value: number,
                    step,
                })
            }
            _ => Ok(()),
        }
    }

    fn type_mismatch(
        &self,
        param: &Parameter,
        expected: &str,
        value: &serde_json::Value,
    ) -> ParameterError {
        let actual = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "list",
            serde_json::Value::Object(_) => "mapping",
        };
        ParameterError::TypeMismatch {
            name: param.name.clone(),
            expected_type: expected.to_string(),
            actual_type: actual.to_string(),
        }
    }
}

/// Within float tolerance of a whole number of steps
fn is_multiple(number: f64, step: f64) -> bool {
    let remainder = (number % step).abs();
    remainder <= f64::EPSILON || step - remainder <= f64::EPSILON
}

impl Default for ParameterValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Suggests fixes for invalid input on non-sensitive parameters
pub struct ErrorMessageEnhancer;

impl ErrorMessageEnhancer {
    pub fn new() -> Self {
        Self
    }

    /// A short hint to print under a validation error, if one helps
    pub fn hint_for(&self, error: &ParameterError) -> Option<String> {
        match error {
            ParameterError::InvalidChoice { value, choices, .. } => {
                match self.suggest_closest_match(value, choices) {
                    Some(suggestion) => Some(format!("Did you mean '{suggestion}'?")),
                    None if choices.len() <= 5 => {
                        Some(format!("Valid options: {}", choices.join(", ")))
                    }
                    None => Some(format!("{} options available", choices.len())),
                }
            }
            ParameterError::OutOfRange { min, max, .. } => match (min, max) {
                (Some(min), Some(max)) => Some(format!("Value must be between {min} and {max}")),
                (Some(min), None) => Some(format!("Value must be at least {min}")),
                (None, Some(max)) => Some(format!("Value must be at most {max}")),
                (None, None) => None,
            },
            ParameterError::StringTooShort { min_length, .. } => {
                Some(format!("Must be at least {min_length} characters long"))
            }
            ParameterError::StringTooLong { max_length, .. } => {
                Some(format!("Must be at most {max_length} characters long"))
            }
            _ => None,
        }
    }

    /// The closest choice, if it is close enough to be a plausible typo
    fn suggest_closest_match(&self, input: &str, choices: &[String]) -> Option<String> {
        let typed = input.to_lowercase();
        let reach = (input.len() + 2).max(6).min(input.len().max(3) * 2);

        choices
            .iter()
            .map(|choice| (levenshtein_distance(&typed, &choice.to_lowercase()), choice))
            .filter(|(distance, _)| *distance <= reach)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, choice)| choice.clone())
    }
}

impl Default for ErrorMessageEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

/// Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = std::cmp::min(
                std::cmp::min(previous[j + 1] + 1, current[j] + 1),
                previous[j] + cost,
            );
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn region() -> Parameter {
        Parameter::new("region", "Deployment region", ParameterType::Choice).with_choices(vec![
            "eu-west".to_string(),
            "us-east".to_string(),
            "ap-south".to_string(),
        ])
    }

    #[test]
    fn test_parse_input_by_type() {
        let text = Parameter::new("name", "Name", ParameterType::String);
        assert_eq!(parse_input(&text, " padded ").unwrap(), json!(" padded "));

        let number = Parameter::new("replicas", "Replicas", ParameterType::Number);
        assert_eq!(parse_input(&number, "42").unwrap(), json!(42));
        assert_eq!(parse_input(&number, "2.5").unwrap(), json!(2.5));

        let toggle = Parameter::new("verbose", "Verbose", ParameterType::Boolean);
        assert_eq!(parse_input(&toggle, "Yes").unwrap(), json!(true));
        assert_eq!(parse_input(&toggle, "off").unwrap(), json!(false));

        assert_eq!(parse_input(&region(), " us-east ").unwrap(), json!("us-east"));
    }

    #[test]
    fn test_parse_input_rejects_malformed_numbers_and_toggles() {
        let number = Parameter::new("replicas", "Replicas", ParameterType::Number);
        match parse_input(&number, "three") {
            Err(ParameterError::InvalidInput { name, value, .. }) => {
                assert_eq!(name, "replicas");
                assert_eq!(value, "three");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let toggle = Parameter::new("verbose", "Verbose", ParameterType::Boolean);
        assert!(parse_input(&toggle, "maybe").is_err());
    }

    #[test]
    fn test_validate_choice() {
        let validator = ParameterValidator::new();
        assert!(validator
            .validate_parameter(&region(), &json!("eu-west"))
            .is_ok());

        match validator.validate_parameter(&region(), &json!("eu-wset")) {
            Err(ParameterError::InvalidChoice { value, .. }) => assert_eq!(value, "eu-wset"),
            other => panic!("Expected InvalidChoice, got {other:?}"),
        }
    }

    #[test]
    fn test_choice_without_choices_fails() {
        let validator = ParameterValidator::new();
        let param = Parameter::new("target", "Target", ParameterType::Choice);
        assert!(matches!(
            validator.validate_parameter(&param, &json!("anything")),
            Err(ParameterError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_validate_number_rules() {
        let validator = ParameterValidator::new();
        let param = Parameter::new("replicas", "Replicas", ParameterType::Number)
            .with_range(Some(1.0), Some(10.0))
            .with_step(1.0);

        assert!(validator.validate_parameter(&param, &json!(3)).is_ok());
        assert!(matches!(
            validator.validate_parameter(&param, &json!(0)),
            Err(ParameterError::OutOfRange { .. })
        ));
        assert!(matches!(
            validator.validate_parameter(&param, &json!(2.5)),
            Err(ParameterError::InvalidStep { .. })
        ));
        assert!(matches!(
            validator.validate_parameter(&param, &json!("3")),
            Err(ParameterError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_string_rules() {
        let validator = ParameterValidator::new();
        let param = Parameter::new("token", "API token", ParameterType::String)
            .with_pattern(r"^tok_[a-z0-9]+$")
            .with_length_range(Some(6), Some(12));

        assert!(validator.validate_parameter(&param, &json!("tok_abc")).is_ok());
        assert!(matches!(
            validator.validate_parameter(&param, &json!("abc")),
            Err(ParameterError::PatternMismatch { .. })
        ));
        assert!(matches!(
            validator.validate_parameter(&param, &json!("tok_abcdefghijk")),
            Err(ParameterError::StringTooLong { .. })
        ));
    }

    #[test]
    fn test_redaction_hides_value() {
        let param = Parameter::new("token", "API token", ParameterType::String)
            .sensitive(true)
            .with_pattern(r"^tok_");
        let error = ParameterValidator::new()
            .validate_parameter(&param, &json!("hunter2"))
            .unwrap_err();
        assert!(error.to_string().contains("hunter2"));

        let surfaced = error.surfaced_for(&param);
        assert_eq!(
            surfaced,
            ParameterError::InvalidSensitiveValue {
                name: "token".to_string()
            }
        );
        assert!(!surfaced.to_string().contains("hunter2"));
        assert!(surfaced.to_string().contains("token"));
    }

    #[test]
    fn test_surfaced_for_keeps_plain_errors() {
        let error = ParameterError::InvalidChoice {
            name: "region".to_string(),
            value: "mars".to_string(),
            choices: vec![],
        };
        assert_eq!(error.clone().surfaced_for(&region()), error);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!(null))));
        assert!(is_blank(Some(&json!("   "))));
        assert!(is_blank(Some(&json!([]))));
        assert!(!is_blank(Some(&json!(false))));
        assert!(!is_blank(Some(&json!(0))));
        assert!(!is_blank(Some(&json!("x"))));
    }

    #[test]
    fn test_default_display_withheld_for_sensitive() {
        let plain = Parameter::new("port", "Port", ParameterType::Number).with_default(json!(8080));
        assert_eq!(plain.default_display(), Some("8080".to_string()));

        let secret = Parameter::new("password", "Password", ParameterType::String)
            .with_default(json!("changeme"))
            .sensitive(true);
        assert_eq!(secret.default_display(), None);
    }

    #[test]
    fn test_prompt_builders() {
        let param = Parameter::new("region", "Region", ParameterType::Choice)
            .with_prompt("Which region?")
            .prompt_before(["deploy"])
            .with_repeat(RepeatPolicy::Never)
            .with_retries(-1i64);

        let spec = param.prompt.as_ref().unwrap();
        assert_eq!(spec.text, "Which region?");
        assert_eq!(spec.timing, Some(PromptTiming::AtCommand));
        assert_eq!(spec.commands, vec!["deploy"]);
        assert_eq!(spec.retries, Some(RetryBound::Unlimited));
        assert!(param.is_prompting());
    }

    #[test]
    fn test_declaration_matches_ignores_linker_state() {
        let declared = Parameter::new("region", "Region", ParameterType::String).with_prompt("Region?");
        let mut registered = declared.clone();
        if let Some(spec) = registered.prompt.as_mut() {
            spec.timing = Some(PromptTiming::AtCommand);
            spec.link_state = crate::prompt_spec::LinkState::Resolved;
        }
        assert!(declared.declaration_matches(&registered));

        let different = declared.clone().required(true);
        assert!(!declared.declaration_matches(&different));
    }

    #[test]
    fn test_parameter_deserialization() {
        let yaml = r#"
name: api_token
description: Token used to call the API
type: string
required: true
sensitive: true
prompt:
  text: "API token"
  timing: at_start
"#;
        let param: Parameter = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(param.parameter_type, Some(ParameterType::String));
        assert!(param.sensitive);
        assert_eq!(param.prompt_text(), Some("API token"));
    }

    #[test]
    fn test_hint_for_invalid_choice() {
        let enhancer = ErrorMessageEnhancer::new();
        let error = ParameterError::InvalidChoice {
            name: "region".to_string(),
            value: "us-eats".to_string(),
            choices: vec!["eu-west".to_string(), "us-east".to_string()],
        };
        assert_eq!(
            enhancer.hint_for(&error),
            Some("Did you mean 'us-east'?".to_string())
        );
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("prod", "production"), 6);
        assert_eq!(levenshtein_distance("stage", "staging"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }
}

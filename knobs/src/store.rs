//! Parameter value store
//!
//! Holds the current value of every parameter that has one. Values arrive
//! either from outside (command line, configuration) through
//! [`ValueStore::store_external`] or from a prompt through
//! [`ValueStore::store_input`]; both validate before writing.

use crate::registry::Registry;
use indexmap::IndexMap;
use knobs_common::{
    display_value, is_blank, parse_input, Parameter, ParameterError, ParameterResult, ParameterType,
    ParameterValidator, REDACTED_PLACEHOLDER,
};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: IndexMap<String, Value>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set a value without validation
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Whether the parameter has no usable value
    pub fn is_blank(&self, name: &str) -> bool {
        is_blank(self.values.get(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in the order they were first set
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Store raw prompt input for a parameter
    ///
    /// A trailing line ending is dropped. Blank input falls back to the
    /// default; without one it fails for required parameters and clears the
    /// value of optional ones. Other input is parsed by type and validated.
    /// Errors are not redacted here.
    pub fn store_input(&mut self, param: &Parameter, raw: &str) -> ParameterResult<()> {
        let raw = raw.trim_end_matches(['\n', '\r']);

        if raw.trim().is_empty() {
            if let Some(default) = &param.default {
                ParameterValidator::new().validate_parameter(param, default)?;
                self.set(param.name.clone(), default.clone());
            } else if param.required {
                return Err(ParameterError::MissingRequired {
                    name: param.name.clone(),
                });
            } else {
                self.remove(&param.name);
            }
            return Ok(());
        }

        let value = parse_input(param, raw)?;
        ParameterValidator::new().validate_parameter(param, &value)?;
        self.set(param.name.clone(), value);
        Ok(())
    }

    /// Store a value supplied from outside any prompt
    ///
    /// Strings given for non-text parameters are parsed first, so `--var
    /// replicas=3` stores the number 3.
    pub fn store_external(&mut self, param: &Parameter, value: Value) -> ParameterResult<()> {
        let value = coerce_external(param, value)?;
        ParameterValidator::new().validate_parameter(param, &value)?;
        self.set(param.name.clone(), value);
        Ok(())
    }

    /// All values, with sensitive ones replaced by a placeholder
    pub fn masked(&self, registry: &Registry) -> serde_json::Map<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| {
                let sensitive = registry
                    .parameter(name)
                    .is_some_and(|param| param.sensitive);
                let shown = if sensitive {
                    Value::String(REDACTED_PLACEHOLDER.to_string())
                } else {
                    value.clone()
                };
                (name.clone(), shown)
            })
            .collect()
    }
}

fn coerce_external(param: &Parameter, value: Value) -> ParameterResult<Value> {
    match (&value, param.parameter_type) {
        (Value::String(raw), Some(ParameterType::Number | ParameterType::Boolean)) => {
            parse_input(param, raw)
        }
        // Config and environment sources type `1234` or `true` themselves
        (Value::Number(_) | Value::Bool(_), Some(ParameterType::String | ParameterType::Choice)) => {
            Ok(Value::String(display_value(&value)))
        }
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knobs_common::ParameterType;
    use serde_json::json;

    #[test]
    fn test_store_input_parses_by_type() {
        let mut store = ValueStore::new();
        let param = Parameter::new("replicas", "Replicas", ParameterType::Number);
        store.store_input(&param, "3\n").unwrap();
        assert_eq!(store.get("replicas"), Some(&json!(3)));
    }

    #[test]
    fn test_store_input_keeps_inner_whitespace_for_text() {
        let mut store = ValueStore::new();
        let param = Parameter::new("greeting", "Greeting", ParameterType::String);
        store.store_input(&param, "  hello there \r\n").unwrap();
        assert_eq!(store.get("greeting"), Some(&json!("  hello there ")));
    }

    #[test]
    fn test_blank_input_uses_default() {
        let mut store = ValueStore::new();
        let param = Parameter::new("region", "Region", ParameterType::String)
            .required(true)
            .with_default(json!("eu-west"));
        store.store_input(&param, "\n").unwrap();
        assert_eq!(store.get("region"), Some(&json!("eu-west")));
    }

    #[test]
    fn test_blank_input_for_required_parameter_fails() {
        let mut store = ValueStore::new();
        let param = Parameter::new("region", "Region", ParameterType::String).required(true);
        assert_eq!(
            store.store_input(&param, "   "),
            Err(ParameterError::MissingRequired {
                name: "region".to_string()
            })
        );
    }

    #[test]
    fn test_blank_input_clears_optional_parameter() {
        let mut store = ValueStore::new();
        let param = Parameter::new("note", "Note", ParameterType::String);
        store.set("note", json!("old"));
        store.store_input(&param, "").unwrap();
        assert!(store.get("note").is_none());
        assert!(store.is_blank("note"));
    }

    #[test]
    fn test_invalid_input_leaves_value_untouched() {
        let mut store = ValueStore::new();
        let param = Parameter::new("region", "Region", ParameterType::Choice)
            .with_choices(vec!["eu".to_string(), "us".to_string()]);
        store.set("region", json!("eu"));
        assert!(store.store_input(&param, "mars").is_err());
        assert_eq!(store.get("region"), Some(&json!("eu")));
    }

    #[test]
    fn test_store_external_coerces_strings() {
        let mut store = ValueStore::new();
        let param = Parameter::new("dry_run", "Dry run", ParameterType::Boolean);
        store.store_external(&param, json!("yes")).unwrap();
        assert_eq!(store.get("dry_run"), Some(&json!(true)));

        let number = Parameter::new("replicas", "Replicas", ParameterType::Number)
            .with_range(Some(1.0), None);
        assert!(matches!(
            store.store_external(&number, json!("0")),
            Err(ParameterError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_store_external_renders_scalars_as_text() {
        let mut store = ValueStore::new();
        let pin = Parameter::new("pin", "PIN", ParameterType::String).with_length_range(Some(4), None);
        store.store_external(&pin, json!(1234)).unwrap();
        assert_eq!(store.get("pin"), Some(&json!("1234")));

        let year = Parameter::new("year", "Year", ParameterType::Choice)
            .with_choices(vec!["2024".to_string(), "2025".to_string()]);
        store.store_external(&year, json!(2024)).unwrap();
        assert_eq!(store.get("year"), Some(&json!("2024")));
        assert!(matches!(
            store.store_external(&year, json!(2023)),
            Err(ParameterError::InvalidChoice { .. })
        ));

        let note = Parameter::new("note", "Note", ParameterType::String);
        store.store_external(&note, json!(false)).unwrap();
        assert_eq!(store.get("note"), Some(&json!("false")));
    }

    #[test]
    fn test_masked_hides_sensitive_values() {
        let mut registry = Registry::new();
        registry
            .register_parameter(
                Parameter::new("token", "Token", ParameterType::String).sensitive(true),
            )
            .unwrap();
        registry
            .register_parameter(Parameter::new("region", "Region", ParameterType::String))
            .unwrap();

        let mut store = ValueStore::new();
        store.set("token", json!("hunter2"));
        store.set("region", json!("eu"));

        let masked = store.masked(&registry);
        assert_eq!(masked["token"], json!(REDACTED_PLACEHOLDER));
        assert_eq!(masked["region"], json!("eu"));
    }
}

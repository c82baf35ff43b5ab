// Validation errors

use crate::{Value, ValueKind};
use std::fmt;
use thiserror::Error;

/// One failed rule evaluation on one field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation (`Address.City`, `Tags[key]`)
    pub field: String,

    /// Rule token that failed (`min=3`)
    pub rule: String,

    /// Value that failed validation
    pub value: Value,

    /// Error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        value: Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            value,
            message: message.into(),
        }
    }

    /// Replace the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed '{}': {}",
            self.field, self.rule, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Get errors for a specific field
    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// `Ok(())` when nothing failed, the errors otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "rule": e.rule,
                    "value": e.value.to_string(),
                    "message": e.message,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Broken directive metadata or misuse of the engine.
///
/// These abort the validation call instead of being collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("malformed conditional directive on '{field}': {directive:?} ({reason})")]
    MalformedCondition {
        field: String,
        directive: String,
        reason: &'static str,
    },

    #[error("conditional directive on '{field}' refers to unknown field '{condition_field}'")]
    UnknownConditionField {
        field: String,
        condition_field: String,
    },

    #[error("input must be a struct, got {0}")]
    NotARecord(ValueKind),

    #[error("invalid bound in rule '{rule}' on '{field}'")]
    InvalidBound { field: String, rule: String },

    #[error("unknown rule '{rule}' on '{field}'")]
    UnknownRule { field: String, rule: String },
}

/// Registry operation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("pattern not found: {0}")]
    PatternNotFound(String),

    #[error("rule already exists: {0}")]
    RuleAlreadyExists(String),

    #[error("custom rule not found: {0}")]
    RuleNotFound(String),
}

/// Result of invoking a custom rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomRuleError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The rule ran and rejected the value
    #[error("{0}")]
    Rejected(String),
}

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidationErrors {
        ValidationErrors::new(vec![
            ValidationError::new("Name", "min=3", Value::Str("Jo".into()), "too short"),
            ValidationError::new("Age", "min=18", Value::Int(17), "too young"),
            ValidationError::new("Name", "regex=username", Value::Str("Jo".into()), "no match"),
        ])
    }

    #[test]
    fn test_field_errors() {
        let errors = sample();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get_field_errors("Name").len(), 2);
        assert!(errors.get_field_errors("Email").is_empty());
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        let entries = json["errors"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1]["field"], "Age");
        assert_eq!(entries[1]["rule"], "min=18");
        assert_eq!(entries[1]["value"], "17");
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::default().into_result().is_ok());
        assert_eq!(sample().into_result().unwrap_err().len(), 3);
    }

    #[test]
    fn test_display() {
        let error = ValidationError::new("Age", "min=18", Value::Int(17), "too young");
        assert_eq!(error.to_string(), "Age failed 'min=18': too young");
        assert_eq!(
            DirectiveError::NotARecord(ValueKind::Int).to_string(),
            "input must be a struct, got int"
        );
    }
}

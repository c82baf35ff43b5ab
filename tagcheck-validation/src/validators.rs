// Built-in validators
//
// Each validator checks one scalar value and returns the failure cause.
// Sequence handling lives in the dispatcher.

use crate::{NamedPattern, Value, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});

/// Render a bound the way values of `kind` render: integral bounds on
/// integer and string fields print without decimals, float fields keep
/// their fractional part.
fn format_bound(bound: f64, kind: ValueKind) -> String {
    if kind == ValueKind::Float || bound.fract() != 0.0 {
        format!("{:?}", bound)
    } else {
        format!("{}", bound as i64)
    }
}

/// Validates that a value is present: not nil, zero, or empty
pub struct Required;

impl Required {
    pub fn validate(value: &Value) -> Result<(), String> {
        if value.is_empty() {
            Err("field is required".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validates a lower bound: numeric value, or string length
pub struct Min(pub f64);

impl Min {
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        check_bound(value, self.0, "min", "greater than or equal to", |actual, bound| {
            actual >= bound
        })
    }
}

/// Validates an upper bound: numeric value, or string length
pub struct Max(pub f64);

impl Max {
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        check_bound(value, self.0, "max", "less than or equal to", |actual, bound| {
            actual <= bound
        })
    }
}

/// Shared min/max comparison. Strings compare by character count; an
/// absent value passes, presence is left to `required`.
fn check_bound(
    value: &Value,
    bound: f64,
    rule: &str,
    relation: &str,
    within: impl Fn(f64, f64) -> bool,
) -> Result<(), String> {
    let kind = value.kind();
    let (subject, actual) = match value {
        Value::Null => return Ok(()),
        Value::Str(s) => ("length", s.chars().count() as f64),
        other => match other.as_f64() {
            Some(n) => ("value", n),
            None => return Err(format!("{} is not supported for {} values", rule, kind)),
        },
    };

    if within(actual, bound) {
        Ok(())
    } else {
        Err(format!(
            "{} must be {} {}",
            subject,
            relation,
            format_bound(bound, kind)
        ))
    }
}

/// Validates email format
pub struct IsEmail;

impl IsEmail {
    pub fn validate(value: &Value) -> Result<(), String> {
        let Some(s) = value.as_str() else {
            return Err("email validation only supports strings".to_string());
        };

        if EMAIL_REGEX.is_match(s) {
            Ok(())
        } else {
            Err("invalid email format".to_string())
        }
    }
}

/// Validates a boolean literal (`isTrue` / `isFalse`)
pub struct IsBool(pub bool);

impl IsBool {
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match value.as_bool() {
            Some(b) if b == self.0 => Ok(()),
            Some(_) => Err(format!("value must be {}", self.0)),
            None => Err(format!(
                "{} only supports bool values",
                if self.0 { "isTrue" } else { "isFalse" }
            )),
        }
    }
}

/// Validates that a value is a sequence
pub struct IsSlice;

impl IsSlice {
    pub fn validate(value: &Value) -> Result<(), String> {
        match value {
            Value::Seq(_) => Ok(()),
            _ => Err("value must be a sequence".to_string()),
        }
    }
}

/// Validates that a value is a key-value collection
pub struct IsMap;

impl IsMap {
    pub fn validate(value: &Value) -> Result<(), String> {
        match value {
            Value::Map(_) => Ok(()),
            _ => Err("value must be a map".to_string()),
        }
    }
}

/// Validates that a value is a nested record
pub struct IsStruct;

impl IsStruct {
    pub fn validate(value: &Value) -> Result<(), String> {
        match value {
            Value::Record(_) => Ok(()),
            _ => Err("value must be a struct".to_string()),
        }
    }
}

/// Named-pattern validator
pub struct Matches<'a>(pub &'a NamedPattern);

impl Matches<'_> {
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        let Some(s) = value.as_str() else {
            return Err("regex validation only supports strings".to_string());
        };

        if !self.0.is_valid() {
            return Err(format!(
                "pattern '{}' is not a valid regular expression",
                self.0.name()
            ));
        }

        if self.0.is_match(s) {
            Ok(())
        } else {
            Err(format!("value does not match pattern '{}'", self.0.name()))
        }
    }
}

//! Directive-driven validation for tagcheck
//!
//! Fields carry comma-separated rule directives (`"required,min=3"`); the
//! engine walks a record, applies every rule and reports all failures at
//! once instead of stopping at the first.
//!
//! # Examples
//!
//! ## Basic Validation
//!
//! ```
//! use tagcheck_validation::{Field, Record, validate_struct};
//!
//! let user = Record::new("User")
//!     .field(Field::new("Name", "Jo").validate("required,min=3"))
//!     .field(Field::new("Age", 17).validate("min=18,max=99"))
//!     .field(Field::new("Email", "invalid_email").validate("required,email"));
//!
//! let errors = validate_struct(&user).unwrap();
//! assert_eq!(errors.len(), 3);
//! assert_eq!(errors.errors[0].field, "Name");
//! assert_eq!(errors.errors[0].rule, "min=3");
//! ```
//!
//! ## Named Patterns
//!
//! ```
//! use tagcheck_validation::{Field, Record, get_pattern, put_pattern, validate_struct};
//!
//! put_pattern("ticket_id", r"^TCK-[0-9]{4}$");
//! assert!(get_pattern("ticket_id").unwrap().is_match("TCK-0042"));
//!
//! let ticket = Record::new("Ticket")
//!     .field(Field::new("Id", "TCK-42").validate("regex=ticket_id"));
//! assert_eq!(validate_struct(&ticket).unwrap().len(), 1);
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use tagcheck_validation::{Field, Record, Value, register_custom_rule, validate_struct};
//!
//! register_custom_rule("even", |field: &str, value: &Value| match value.as_f64() {
//!     Some(n) if n % 2.0 == 0.0 => Ok(()),
//!     _ => Err(format!("{} must be even", field)),
//! })
//! .unwrap();
//!
//! let order = Record::new("Order").field(Field::new("Quantity", 3).validate("custom=even"));
//! let errors = validate_struct(&order).unwrap();
//! assert_eq!(errors.errors[0].message, "Quantity must be even");
//! ```

mod config;
mod custom;
mod directive;
mod dispatch;
mod engine;
mod errors;
mod patterns;
mod traits;
mod validators;
mod value;

pub use config::*;
pub use custom::*;
pub use directive::*;
pub use dispatch::*;
pub use engine::*;
pub use errors::*;
pub use patterns::*;
pub use traits::*;
pub use validators::*;
pub use value::*;

/// Validate a value against the process-wide registries.
///
/// Data failures are collected in the returned [`ValidationErrors`]; a
/// broken directive aborts with a [`DirectiveError`].
pub fn validate_struct<T: Validate + ?Sized>(
    target: &T,
) -> Result<ValidationErrors, DirectiveError> {
    Validator::new().validate(target)
}

/// Validate a dynamic value; it must be a [`Value::Record`].
pub fn validate_value(value: &Value) -> Result<ValidationErrors, DirectiveError> {
    Validator::new().validate_value(value)
}

/// Apply one rule token to one value.
pub fn apply_rule(field: &str, value: &Value, rule: &str) -> Result<RuleOutcome, DirectiveError> {
    Validator::new().apply_rule(field, value, rule)
}

/// Register a process-wide custom rule, used as `custom=<name>`.
pub fn register_custom_rule<F>(name: impl Into<String>, rule: F) -> Result<(), RegistryError>
where
    F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
{
    custom_rules().register(name, rule)
}

/// Look up a named pattern in the process-wide registry.
pub fn get_pattern(name: &str) -> Result<NamedPattern, RegistryError> {
    patterns().get(name)
}

/// Add or replace a named pattern in the process-wide registry.
pub fn put_pattern(name: impl Into<String>, source: impl Into<String>) {
    patterns().put(name, source)
}

/// Remove a named pattern from the process-wide registry.
pub fn delete_pattern(name: &str) -> Result<(), RegistryError> {
    patterns().delete(name)
}

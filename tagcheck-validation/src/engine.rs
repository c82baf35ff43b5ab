//! Structural traversal: walks a record's fields, dispatches every rule
//! and collects all failures.

use crate::{
    Condition, CustomRuleRegistry, Dispatcher, DirectiveError, Field, FieldRules,
    PatternRegistry, Record, RuleOutcome, RuleToken, Validate, ValidationError,
    ValidationErrors, ValidatorConfig, Value, custom_rules, patterns,
};

/// Validation engine bound to a pair of registries and a configuration.
///
/// [`Validator::new`] uses the process-wide registries; tests and embedded
/// setups can supply their own with [`Validator::with_registries`].
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    patterns: &'a PatternRegistry,
    custom_rules: &'a CustomRuleRegistry,
    config: ValidatorConfig,
}

impl Validator<'static> {
    /// Validator over the process-wide registries with default settings
    pub fn new() -> Self {
        Self::with_registries(patterns(), custom_rules())
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Validator<'a> {
    pub fn with_registries(
        patterns: &'a PatternRegistry,
        custom_rules: &'a CustomRuleRegistry,
    ) -> Self {
        Self {
            patterns,
            custom_rules,
            config: ValidatorConfig::default(),
        }
    }

    /// Replace the settings
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> Dispatcher<'a> {
        Dispatcher::new(self.patterns, self.custom_rules, self.config.unknown_rules)
    }

    /// Apply a single rule token to a value
    pub fn apply_rule(
        &self,
        field: &str,
        value: &Value,
        rule: &str,
    ) -> Result<RuleOutcome, DirectiveError> {
        self.dispatcher().apply(field, value, &RuleToken::parse(rule))
    }

    /// Validate a value's record description
    pub fn validate<T: Validate + ?Sized>(
        &self,
        target: &T,
    ) -> Result<ValidationErrors, DirectiveError> {
        self.validate_record(&target.record())
    }

    /// Validate a dynamic value; anything but a record is rejected.
    pub fn validate_value(&self, value: &Value) -> Result<ValidationErrors, DirectiveError> {
        match value {
            Value::Record(record) => self.validate_record(record),
            other => Err(DirectiveError::NotARecord(other.kind())),
        }
    }

    /// Validate every field of `record`.
    ///
    /// Errors are ordered by field, then rule, then conditional rules, then
    /// collection members. Nested record fields are reported as
    /// `Outer.Inner`, sequence elements as `Field[index]` and map entries as
    /// `Field[key]`.
    pub fn validate_record(&self, record: &Record) -> Result<ValidationErrors, DirectiveError> {
        let mut errors = ValidationErrors::default();
        self.walk(record, None, &mut errors)?;

        tracing::debug!(
            record = record.type_name(),
            errors = errors.len(),
            "record validated"
        );
        Ok(errors)
    }

    fn walk(
        &self,
        record: &Record,
        prefix: Option<&str>,
        errors: &mut ValidationErrors,
    ) -> Result<(), DirectiveError> {
        for field in record.fields() {
            if field.directive().is_none() && field.condition().is_none() {
                continue;
            }

            let path = match prefix {
                Some(prefix) => format!("{}{}{}", prefix, self.config.path_separator, field.name()),
                None => field.name().to_string(),
            };

            self.check_field(record, field, &path, errors)?;
        }

        Ok(())
    }

    fn check_field(
        &self,
        record: &Record,
        field: &Field,
        path: &str,
        errors: &mut ValidationErrors,
    ) -> Result<(), DirectiveError> {
        let dispatcher = self.dispatcher();
        let rules = field.directive().map(FieldRules::parse).unwrap_or_default();
        let mut sink = FieldSink {
            errors,
            message_override: field.message_override(),
        };

        for token in &rules.rules {
            self.apply_token(&dispatcher, &mut sink, field.name(), path, field.value(), token)?;
        }

        if let Some(raw) = field.condition() {
            let condition = Condition::parse(field.name(), raw)?;
            let source = record.get(&condition.field).ok_or_else(|| {
                DirectiveError::UnknownConditionField {
                    field: field.name().to_string(),
                    condition_field: condition.field.clone(),
                }
            })?;

            if condition.holds(source.value()) {
                for token in &condition.rules {
                    self.apply_token(
                        &dispatcher,
                        &mut sink,
                        field.name(),
                        path,
                        field.value(),
                        token,
                    )?;
                }
            }
        }

        if let Value::Map(entries) = field.value() {
            if !rules.elements.is_empty() {
                for (key, value) in entries {
                    let entry_path = format!("{}[{}]", path, key);
                    for token in &rules.elements.keys {
                        let outcome = dispatcher.apply(field.name(), key, token)?;
                        sink.record(&entry_path, token, key, outcome);
                    }
                    for token in &rules.elements.values {
                        self.apply_token(
                            &dispatcher,
                            &mut sink,
                            field.name(),
                            &entry_path,
                            value,
                            token,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Dispatch one token; a `struct` token on a record also walks it.
    fn apply_token(
        &self,
        dispatcher: &Dispatcher<'_>,
        sink: &mut FieldSink<'_>,
        field: &str,
        path: &str,
        value: &Value,
        token: &RuleToken,
    ) -> Result<(), DirectiveError> {
        let outcome = dispatcher.apply(field, value, token)?;
        sink.record(path, token, value, outcome);

        if token.is_struct() {
            if let Some(nested) = value.as_record() {
                self.walk(nested, Some(path), sink.errors)?;
            }
        }

        Ok(())
    }
}

/// Turns rule outcomes of one field into error entries.
struct FieldSink<'e> {
    errors: &'e mut ValidationErrors,
    // replaces every cause reported for the field
    message_override: Option<&'e str>,
}

impl FieldSink<'_> {
    fn record(&mut self, path: &str, token: &RuleToken, value: &Value, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::Pass => {}
            RuleOutcome::Fail(message) => {
                self.push(path.to_string(), token, value.clone(), message);
            }
            RuleOutcome::Elements(failures) => {
                for failure in failures {
                    let element_path = format!("{}[{}]", path, failure.index);
                    self.push(element_path, token, failure.value, failure.message);
                }
            }
        }
    }

    fn push(&mut self, field: String, token: &RuleToken, value: Value, message: String) {
        let error = ValidationError::new(field, token.as_str(), value, message);
        self.errors.add(match self.message_override {
            Some(custom) => error.with_message(custom),
            None => error,
        });
    }
}

//! Rule dispatch: resolves one rule token against one field value.

use crate::validators::{IsBool, IsEmail, IsMap, IsSlice, IsStruct, Matches, Max, Min, Required};
use crate::{
    CustomRuleError, CustomRuleRegistry, DirectiveError, PatternRegistry, RuleToken,
    UnknownRulePolicy, Value,
};

/// A failing element of a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFailure {
    pub index: usize,
    pub value: Value,
    pub message: String,
}

/// Outcome of applying one rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Pass,
    Fail(String),
    /// Per-element rule on a sequence with at least one failing element
    Elements(Vec<ElementFailure>),
}

impl RuleOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleOutcome::Pass)
    }

    /// Failure cause; element failures are combined into one description
    /// naming each offending element.
    pub fn description(&self) -> Option<String> {
        match self {
            RuleOutcome::Pass => None,
            RuleOutcome::Fail(message) => Some(message.clone()),
            RuleOutcome::Elements(failures) => Some(
                failures
                    .iter()
                    .map(|f| format!("element '{}': {}", f.value, f.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }

    fn from_check(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => RuleOutcome::Pass,
            Err(message) => RuleOutcome::Fail(message),
        }
    }

    /// Apply `check` to each element of a sequence, or to the value itself.
    fn per_element(value: &Value, check: impl Fn(&Value) -> Result<(), String>) -> Self {
        let Value::Seq(items) = value else {
            return Self::from_check(check(value));
        };

        let failures: Vec<ElementFailure> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                check(item).err().map(|message| ElementFailure {
                    index,
                    value: item.clone(),
                    message,
                })
            })
            .collect();

        if failures.is_empty() {
            RuleOutcome::Pass
        } else {
            RuleOutcome::Elements(failures)
        }
    }
}

/// Resolves rule tokens through the builtin table and the two registries.
#[derive(Clone, Copy)]
pub struct Dispatcher<'a> {
    patterns: &'a PatternRegistry,
    custom_rules: &'a CustomRuleRegistry,
    unknown_rules: UnknownRulePolicy,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        patterns: &'a PatternRegistry,
        custom_rules: &'a CustomRuleRegistry,
        unknown_rules: UnknownRulePolicy,
    ) -> Self {
        Self {
            patterns,
            custom_rules,
            unknown_rules,
        }
    }

    /// Apply one rule to a field value.
    ///
    /// Data failures come back as [`RuleOutcome::Fail`] or
    /// [`RuleOutcome::Elements`]; broken rule syntax is a [`DirectiveError`].
    pub fn apply(
        &self,
        field: &str,
        value: &Value,
        token: &RuleToken,
    ) -> Result<RuleOutcome, DirectiveError> {
        tracing::trace!(field, rule = %token, "applying rule");

        let outcome = match (token.name(), token.param()) {
            ("required", None) => RuleOutcome::from_check(Required::validate(value)),
            ("min", param) => {
                let bound = parse_bound(field, token, param)?;
                RuleOutcome::per_element(value, |v| Min(bound).validate(v))
            }
            ("max", param) => {
                let bound = parse_bound(field, token, param)?;
                RuleOutcome::per_element(value, |v| Max(bound).validate(v))
            }
            ("email", None) => RuleOutcome::per_element(value, IsEmail::validate),
            ("isTrue", None) => RuleOutcome::from_check(IsBool(true).validate(value)),
            ("isFalse", None) => RuleOutcome::from_check(IsBool(false).validate(value)),
            ("slice", None) => RuleOutcome::from_check(IsSlice::validate(value)),
            ("map", None) => RuleOutcome::from_check(IsMap::validate(value)),
            _ if token.is_struct() => RuleOutcome::from_check(IsStruct::validate(value)),
            ("regex", name) => self.apply_pattern(name.unwrap_or_default(), value),
            ("custom", name) => self.apply_custom(name.unwrap_or_default(), field, value),
            _ if token.is_element_rules() => RuleOutcome::Pass,
            _ => return self.unknown(field, token),
        };

        Ok(outcome)
    }

    fn apply_pattern(&self, name: &str, value: &Value) -> RuleOutcome {
        match self.patterns.get(name) {
            Ok(pattern) => RuleOutcome::per_element(value, |v| Matches(&pattern).validate(v)),
            Err(e) => RuleOutcome::Fail(e.to_string()),
        }
    }

    fn apply_custom(&self, name: &str, field: &str, value: &Value) -> RuleOutcome {
        match self.custom_rules.invoke(name, field, value) {
            Ok(()) => RuleOutcome::Pass,
            Err(CustomRuleError::Registry(e)) => RuleOutcome::Fail(e.to_string()),
            Err(CustomRuleError::Rejected(message)) => RuleOutcome::Fail(message),
        }
    }

    fn unknown(&self, field: &str, token: &RuleToken) -> Result<RuleOutcome, DirectiveError> {
        match self.unknown_rules {
            UnknownRulePolicy::Ignore => {
                tracing::warn!(field, rule = %token, "ignoring unknown rule");
                Ok(RuleOutcome::Pass)
            }
            UnknownRulePolicy::Reject => Err(DirectiveError::UnknownRule {
                field: field.to_string(),
                rule: token.to_string(),
            }),
        }
    }
}

fn parse_bound(field: &str, token: &RuleToken, param: Option<&str>) -> Result<f64, DirectiveError> {
    param
        .and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|bound| bound.is_finite())
        .ok_or_else(|| DirectiveError::InvalidBound {
            field: field.to_string(),
            rule: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    struct Fixture {
        patterns: PatternRegistry,
        custom_rules: CustomRuleRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                patterns: PatternRegistry::with_defaults(),
                custom_rules: CustomRuleRegistry::new(),
            }
        }

        fn apply(&self, value: &Value, rule: &str) -> Result<RuleOutcome, DirectiveError> {
            Dispatcher::new(&self.patterns, &self.custom_rules, UnknownRulePolicy::Ignore)
                .apply("Field", value, &RuleToken::parse(rule))
        }

        fn outcome(&self, value: &Value, rule: &str) -> RuleOutcome {
            self.apply(value, rule).unwrap()
        }
    }

    fn strs(values: &[&str]) -> Value {
        Value::Seq(values.iter().map(|v| Value::Str(v.to_string())).collect())
    }

    #[test]
    fn test_required_on_sequence() {
        let fx = Fixture::new();
        assert!(fx.outcome(&strs(&["a"]), "required").is_pass());
        assert!(!fx.outcome(&strs(&[]), "required").is_pass());
    }

    #[test]
    fn test_min_per_element() {
        let fx = Fixture::new();
        let outcome = fx.outcome(&strs(&["John", "Do", "JD"]), "min=3");

        let RuleOutcome::Elements(failures) = &outcome else {
            panic!("expected element failures, got {outcome:?}");
        };
        let indexes: Vec<_> = failures.iter().map(|f| f.index).collect();
        assert_eq!(indexes, [1, 2]);

        let description = outcome.description().unwrap();
        assert!(description.contains("element 'Do'"));
        assert!(description.contains("element 'JD'"));
    }

    #[test]
    fn test_max_per_element_ints() {
        let fx = Fixture::new();
        let ages = Value::Seq(vec![Value::Int(17), Value::Int(31)]);
        let RuleOutcome::Elements(failures) = fx.outcome(&ages, "max=30") else {
            panic!("expected element failures");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].value, Value::Int(31));
    }

    #[test]
    fn test_invalid_bound_is_fatal() {
        let fx = Fixture::new();
        for rule in ["min=abc", "max=", "min", "max=NaN"] {
            assert!(
                matches!(
                    fx.apply(&Value::Int(1), rule),
                    Err(DirectiveError::InvalidBound { .. })
                ),
                "{rule} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_type_mismatch() {
        let fx = Fixture::new();
        assert_eq!(
            fx.outcome(&Value::Int(5), "email"),
            RuleOutcome::Fail("email validation only supports strings".to_string())
        );
    }

    #[test]
    fn test_shape_markers() {
        let fx = Fixture::new();
        assert!(fx.outcome(&strs(&[]), "slice").is_pass());
        assert!(!fx.outcome(&Value::Str("x".into()), "slice").is_pass());
        assert!(fx.outcome(&Value::Map(vec![]), "map").is_pass());
        assert!(fx.outcome(&Value::Record(Record::new("A")), "struct").is_pass());
        assert!(!fx.outcome(&Value::Int(1), "struct").is_pass());
    }

    #[test]
    fn test_unknown_pattern() {
        let fx = Fixture::new();
        for value in [Value::Str("anything".into()), Value::Int(3), Value::Null] {
            assert_eq!(
                fx.outcome(&value, "regex=nonexistent"),
                RuleOutcome::Fail("pattern not found: nonexistent".to_string())
            );
        }
    }

    #[test]
    fn test_regex_per_element() {
        let fx = Fixture::new();
        let outcome = fx.outcome(&strs(&["Johns", "J"]), "regex=username");
        assert!(matches!(outcome, RuleOutcome::Elements(ref f) if f.len() == 1));
    }

    #[test]
    fn test_custom_rules() {
        let fx = Fixture::new();
        fx.custom_rules
            .register("positive", |field: &str, value: &Value| match value.as_f64() {
                Some(n) if n > 0.0 => Ok(()),
                _ => Err(format!("{} must be positive", field)),
            })
            .unwrap();

        assert!(fx.outcome(&Value::Int(2), "custom=positive").is_pass());
        assert_eq!(
            fx.outcome(&Value::Int(-2), "custom=positive"),
            RuleOutcome::Fail("Field must be positive".to_string())
        );
        assert_eq!(
            fx.outcome(&Value::Int(2), "custom=missing"),
            RuleOutcome::Fail("custom rule not found: missing".to_string())
        );
        assert!(!fx.outcome(&Value::Int(2), "custom").is_pass());
    }

    #[test]
    fn test_unknown_rule_policy() {
        let fx = Fixture::new();
        assert!(fx.outcome(&Value::Int(1), "isEven").is_pass());

        let strict = Dispatcher::new(&fx.patterns, &fx.custom_rules, UnknownRulePolicy::Reject);
        assert_eq!(
            strict.apply("Field", &Value::Int(1), &RuleToken::parse("isEven")),
            Err(DirectiveError::UnknownRule {
                field: "Field".to_string(),
                rule: "isEven".to_string(),
            })
        );
    }

    #[test]
    fn test_element_rule_tokens_are_not_dispatched() {
        let fx = Fixture::new();
        let strict = Dispatcher::new(&fx.patterns, &fx.custom_rules, UnknownRulePolicy::Reject);
        let outcome = strict
            .apply("Tags", &Value::Map(vec![]), &RuleToken::parse("keys=required"))
            .unwrap();
        assert!(outcome.is_pass());
    }
}

//! Directive parsing.
//!
//! A directive is the comma-separated rule list attached to a field:
//!
//! ```
//! use tagcheck_validation::parse_directive;
//!
//! let tokens = parse_directive("required, min=3,regex=email");
//! let raw: Vec<_> = tokens.iter().map(|t| t.as_str()).collect();
//! assert_eq!(raw, ["required", "min=3", "regex=email"]);
//! ```

use crate::{DirectiveError, Value};
use std::fmt;

/// One rule of a directive, either bare (`required`) or `name=parameter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    raw: String,
    name_end: usize,
}

impl RuleToken {
    /// Parse a single token; the parameter starts after the first `=`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let name_end = raw.find('=').unwrap_or(raw.len());
        Self { raw, name_end }
    }

    /// The token as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn name(&self) -> &str {
        &self.raw[..self.name_end]
    }

    pub fn param(&self) -> Option<&str> {
        self.raw.get(self.name_end + 1..)
    }

    /// `struct`, or any bare token mentioning it, marks a nested record.
    pub fn is_struct(&self) -> bool {
        self.param().is_none() && self.raw.contains("struct")
    }

    /// `keys=` and `values=` carry element rules for maps.
    pub fn is_element_rules(&self) -> bool {
        self.param().is_some() && matches!(self.name(), "keys" | "values")
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a directive into its trimmed, non-empty rule tokens.
pub fn parse_directive(raw: &str) -> Vec<RuleToken> {
    split_rules(raw, ',')
}

fn split_rules(raw: &str, separator: char) -> Vec<RuleToken> {
    raw.split(separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(RuleToken::parse)
        .collect()
}

/// Rules of a map field applied to each key and each value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementRules {
    pub keys: Vec<RuleToken>,
    pub values: Vec<RuleToken>,
}

impl ElementRules {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.values.is_empty()
    }
}

/// A parsed directive: field-level rules plus map element rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub rules: Vec<RuleToken>,
    pub elements: ElementRules,
}

impl FieldRules {
    /// Parse a directive such as `"map,keys=required;min=3,values=min=5"`.
    pub fn parse(raw: &str) -> Self {
        let mut parsed = Self::default();

        for token in parse_directive(raw) {
            if !token.is_element_rules() {
                parsed.rules.push(token);
                continue;
            }

            let element_rules = split_rules(token.param().unwrap_or_default(), ';');
            if token.name() == "keys" {
                parsed.elements.keys.extend(element_rules);
            } else {
                parsed.elements.values.extend(element_rules);
            }
        }

        parsed
    }
}

/// A conditional directive: `"SourceField=ExpectedValue,rule"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Sibling field whose value is inspected
    pub field: String,
    /// Literal compared with the sibling's rendered value
    pub expected: String,
    /// Rules applied when the condition holds
    pub rules: Vec<RuleToken>,
}

impl Condition {
    /// Parse the conditional directive attached to `owner`.
    pub fn parse(owner: &str, raw: &str) -> Result<Self, DirectiveError> {
        let malformed = |reason| DirectiveError::MalformedCondition {
            field: owner.to_string(),
            directive: raw.to_string(),
            reason,
        };

        let (predicate, rules) = raw.split_once(',').ok_or_else(|| malformed("missing ','"))?;
        let (field, expected) = predicate
            .split_once('=')
            .ok_or_else(|| malformed("missing '='"))?;

        let field = field.trim();
        if field.is_empty() {
            return Err(malformed("missing condition field"));
        }

        let rules = parse_directive(rules);
        if rules.is_empty() {
            return Err(malformed("missing rule"));
        }

        Ok(Self {
            field: field.to_string(),
            expected: expected.trim().to_string(),
            rules,
        })
    }

    /// Whether the sibling value matches the expected literal.
    pub fn holds(&self, actual: &Value) -> bool {
        actual.to_string() == self.expected
    }
}

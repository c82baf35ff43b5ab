//! Fuzz target for directive parsing.
//!
//! Rule tokens, map element rules and conditional directives must parse
//! any input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagcheck_validation::{Condition, FieldRules, parse_directive};

fuzz_target!(|data: &str| {
    for token in parse_directive(data) {
        let _ = token.name();
        let _ = token.param();
        let _ = token.is_struct();
        assert!(!token.as_str().is_empty());
    }

    let rules = FieldRules::parse(data);
    assert!(rules.rules.iter().all(|t| !t.is_element_rules()));

    if let Ok(condition) = Condition::parse("Field", data) {
        assert!(!condition.field.is_empty());
        assert!(!condition.rules.is_empty());
    }
});

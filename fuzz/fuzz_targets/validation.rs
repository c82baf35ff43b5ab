//! Fuzz target for record validation.
//!
//! Arbitrary directives applied to arbitrary values either report data
//! failures or a directive error, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagcheck_validation::{CustomRuleRegistry, Field, PatternRegistry, Record, Validator, Value};

/// Arbitrary field for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzField {
    name: String,
    text: String,
    number: i64,
    items: Vec<String>,
    directive: String,
    condition: Option<String>,
}

fuzz_target!(|fields: Vec<FuzzField>| {
    let patterns = PatternRegistry::with_defaults();
    let custom_rules = CustomRuleRegistry::new();
    let validator = Validator::with_registries(&patterns, &custom_rules);

    let mut record = Record::new("Fuzz");
    for (i, f) in fields.into_iter().enumerate() {
        let value = match i % 3 {
            0 => Value::Str(f.text),
            1 => Value::Int(f.number),
            _ => Value::Seq(f.items.into_iter().map(Value::Str).collect()),
        };

        let mut field = Field::new(f.name, value).validate(f.directive);
        if let Some(condition) = f.condition {
            field = field.validate_if(condition);
        }
        record.push(field);
    }

    if let Ok(first) = validator.validate_record(&record) {
        let second = validator
            .validate_record(&record)
            .expect("second run must agree");
        assert_eq!(first, second);
    }
});

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::BTreeMap;
use tagcheck::*;

#[derive(Validate)]
struct Address {
    #[rename("City")]
    #[validate("required")]
    city: String,
    #[rename("ZipCode")]
    #[validate("required,regex=zipcode")]
    zip_code: String,
}

#[derive(Validate)]
struct User {
    #[rename("Name")]
    #[validate("required,min=3")]
    name: String,
    #[rename("Age")]
    #[validate("min=18,max=99")]
    age: u32,
    #[rename("Email")]
    #[validate("required,email")]
    email: String,
    #[rename("Address")]
    #[validate("struct")]
    address: Address,
    #[rename("Tags")]
    #[validate("map,keys=required;min=3,values=required")]
    tags: BTreeMap<String, String>,
}

fn user(name: &str, age: u32, email: &str) -> User {
    User {
        name: name.to_string(),
        age,
        email: email.to_string(),
        address: Address {
            city: "Springfield".to_string(),
            zip_code: "12345".to_string(),
        },
        tags: BTreeMap::from([("team".to_string(), "core".to_string())]),
    }
}

fn bench_directive_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("directive_parsing");

    group.bench_function("simple", |b| {
        b.iter(|| parse_directive(black_box("required,min=3,max=50")))
    });

    group.bench_function("map_elements", |b| {
        b.iter(|| FieldRules::parse(black_box("map,keys=required;min=3,values=required;min=5")))
    });

    group.finish();
}

fn bench_rule_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_dispatch");

    let name = Value::Str("john_doe123".to_string());
    let email = Value::Str("test.user+tag@domain.co.uk".to_string());
    let names = Value::Seq(vec![
        Value::Str("John".to_string()),
        Value::Str("Do".to_string()),
        Value::Str("JD".to_string()),
    ]);

    group.bench_function("min_length", |b| {
        b.iter(|| apply_rule("Name", black_box(&name), "min=3"))
    });

    group.bench_function("email", |b| {
        b.iter(|| apply_rule("Email", black_box(&email), "email"))
    });

    group.bench_function("named_pattern", |b| {
        b.iter(|| apply_rule("Name", black_box(&name), "regex=username"))
    });

    group.bench_function("sequence_elements", |b| {
        b.iter(|| apply_rule("Names", black_box(&names), "min=3"))
    });

    group.finish();
}

fn bench_struct_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("struct_validation");

    let valid = user("John", 30, "john@doe.com");
    let invalid = user("Jo", 17, "invalid_email");

    group.bench_function("valid_struct", |b| {
        b.iter(|| validate_struct(black_box(&valid)))
    });

    group.bench_function("invalid_struct", |b| {
        b.iter(|| validate_struct(black_box(&invalid)))
    });

    group.bench_function("record_snapshot", |b| b.iter(|| black_box(&valid).record()));

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_directive_parsing,
    bench_rule_dispatch,
    bench_struct_validation,
);

criterion_main!(validation_benches);

// Tagcheck - declarative struct validation for Rust
//
// Fields carry rule directives; validation walks the struct and reports
// every failure at once.
//
// ```
// use tagcheck::Validate;
//
// #[derive(Validate)]
// struct User {
//     #[validate("required,min=3")]
//     #[rename("Name")]
//     name: String,
// }
// ```

// Re-export the validation engine
pub use tagcheck_validation::*;

// Re-export procedural macros
#[cfg(feature = "derive")]
pub use tagcheck_derive::Validate;

// Procedural macros for tagcheck

use proc_macro::TokenStream;

mod validate;

/// Derives `tagcheck::Validate` and `tagcheck::ToValue` for a struct.
///
/// Field attributes:
/// - `#[validate("required,min=3")]` - rule directive
/// - `#[validate(skip)]` - leave the field out of the record
/// - `#[validate_if("Other=value,rule")]` - conditional directive
/// - `#[error_message("...")]` - replaces the cause of every failure
/// - `#[rename("Name")]` - name used in errors and conditions
///
/// ```ignore
/// use tagcheck::Validate;
///
/// #[derive(Validate)]
/// struct User {
///     #[validate("required,min=3")]
///     #[rename("Name")]
///     name: String,
///     #[validate("min=18,max=99")]
///     age: u32,
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate, validate_if, error_message, rename))]
pub fn validate_derive(input: TokenStream) -> TokenStream {
    validate::validate_derive_impl(input)
}

// Validation traits

use crate::{DirectiveError, Record, ValidationErrors, Validator};

/// Trait for types validated by their field directives.
///
/// Usually derived; see the `tagcheck` crate. A manual implementation
/// describes the fields:
///
/// ```
/// use tagcheck_validation::{Field, Record, Validate};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl Validate for User {
///     fn record(&self) -> Record {
///         Record::new("User")
///             .field(Field::new("Name", &self.name).validate("required,min=3"))
///             .field(Field::new("Age", self.age).validate("min=18,max=99"))
///     }
/// }
///
/// let user = User { name: "Jo".to_string(), age: 17 };
/// let errors = user.validate().unwrap();
/// assert_eq!(errors.len(), 2);
/// ```
pub trait Validate {
    /// Snapshot of the fields and their directives
    fn record(&self) -> Record;

    /// Validate against the process-wide registries and default settings
    fn validate(&self) -> Result<ValidationErrors, DirectiveError> {
        Validator::new().validate_record(&self.record())
    }
}

impl Validate for Record {
    fn record(&self) -> Record {
        self.clone()
    }
}

impl<T: Validate + ?Sized> Validate for &T {
    fn record(&self) -> Record {
        (**self).record()
    }
}

impl<T: Validate + ?Sized> Validate for Box<T> {
    fn record(&self) -> Record {
        (**self).record()
    }
}

// User-registered rules invoked through `custom=<name>`

use crate::{CustomRuleError, RegistryError, Value};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// A custom rule: receives the field name and value, returns the failure
/// reason when the value is rejected.
pub type CustomRuleFn = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

static CUSTOM_RULES: Lazy<CustomRuleRegistry> = Lazy::new(CustomRuleRegistry::new);

/// The process-wide custom rule registry.
pub fn custom_rules() -> &'static CustomRuleRegistry {
    &CUSTOM_RULES
}

/// Registry of custom rules. A name can be registered once; later
/// registrations under the same name are rejected.
#[derive(Default)]
pub struct CustomRuleRegistry {
    rules: RwLock<HashMap<String, CustomRuleFn>>,
}

impl CustomRuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule under a new name
    pub fn register<F>(&self, name: impl Into<String>, rule: F) -> Result<(), RegistryError>
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        let name = name.into();
        match self.rules.write().entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::RuleAlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(rule = %entry.key(), "custom rule registered");
                entry.insert(Arc::new(rule));
                Ok(())
            }
        }
    }

    /// Look up a rule
    pub fn get(&self, name: &str) -> Result<CustomRuleFn, RegistryError> {
        self.rules
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::RuleNotFound(name.to_string()))
    }

    /// Run the rule registered as `name` against a field value.
    ///
    /// The rule runs after the registry lock is released, so a rule may
    /// itself use the registry.
    pub fn invoke(&self, name: &str, field: &str, value: &Value) -> Result<(), CustomRuleError> {
        let rule = self.get(name)?;
        rule(field, value).map_err(CustomRuleError::Rejected)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl std::fmt::Debug for CustomRuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_even(field: &str, value: &Value) -> Result<(), String> {
        match value {
            Value::Int(v) if v % 2 == 0 => Ok(()),
            Value::Int(_) => Err(format!("{} must be an even number", field)),
            _ => Err(format!("{} must be an integer", field)),
        }
    }

    #[test]
    fn test_register_and_invoke() {
        let registry = CustomRuleRegistry::new();
        registry.register("isEven", is_even).unwrap();

        assert!(registry.invoke("isEven", "Number", &Value::Int(4)).is_ok());
        assert_eq!(
            registry.invoke("isEven", "Number", &Value::Int(3)),
            Err(CustomRuleError::Rejected("Number must be an even number".to_string()))
        );
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let registry = CustomRuleRegistry::new();
        registry.register("isEven", is_even).unwrap();

        let second = registry.register("isEven", |_: &str, _: &Value| Ok(()));
        assert_eq!(second, Err(RegistryError::RuleAlreadyExists("isEven".to_string())));
        assert_eq!(registry.len(), 1);
        assert!(registry.invoke("isEven", "Number", &Value::Int(3)).is_err());
    }

    #[test]
    fn test_unknown_rule() {
        let registry = CustomRuleRegistry::new();
        assert_eq!(
            registry.invoke("missing", "Number", &Value::Int(1)),
            Err(CustomRuleError::Registry(RegistryError::RuleNotFound(
                "missing".to_string()
            )))
        );
    }

    #[test]
    fn test_rule_can_reenter_registry() {
        let registry = Arc::new(CustomRuleRegistry::new());
        let inner = Arc::clone(&registry);
        registry
            .register("self_aware", move |_: &str, _: &Value| {
                if inner.contains("self_aware") {
                    Ok(())
                } else {
                    Err("not visible".to_string())
                }
            })
            .unwrap();

        assert!(registry.invoke("self_aware", "Field", &Value::Null).is_ok());
    }
}

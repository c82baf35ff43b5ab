// Named regular-expression patterns used by `regex=<name>` rules

use crate::RegistryError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;

/// Patterns every registry starts with.
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("email", r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"),
    ("phone_number", r"^\+?[0-9]{10,15}$"),
    ("username", r"^[a-zA-Z0-9_]{3,16}$"),
    ("zipcode", r"^[0-9]{5}(?:-[0-9]{4})?$"),
    ("url", r"^https?://[^\s/$.?#].[^\s]*$"),
    (
        "ipv4",
        r"^((25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$",
    ),
    (
        "ipv6",
        r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|(([0-9a-fA-F]{1,4}:){0,7}[0-9a-fA-F]{0,4})?::(([0-9a-fA-F]{1,4}:){0,7}[0-9a-fA-F]{1,4})?)$",
    ),
    ("slug", r"^[a-z0-9]+(?:-[a-z0-9]+)*$"),
];

static PATTERNS: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::with_defaults);

/// The process-wide pattern registry.
pub fn patterns() -> &'static PatternRegistry {
    &PATTERNS
}

/// A registered pattern: its source and, when it compiles, the compiled form.
#[derive(Debug, Clone)]
pub struct NamedPattern {
    name: String,
    source: String,
    regex: Option<Regex>,
}

impl NamedPattern {
    /// Compile `source`; an invalid source is kept and never matches.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        let source = source.into();
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(pattern = %name, error = %e, "pattern does not compile");
                None
            }
        };

        Self {
            name,
            source,
            regex,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(value))
    }
}

/// Name to pattern map, readable from many threads while configuration
/// code adds, replaces or deletes entries.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: RwLock<HashMap<String, NamedPattern>>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with [`DEFAULT_PATTERNS`]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for (name, source) in DEFAULT_PATTERNS {
            registry.put(*name, *source);
        }
        registry
    }

    /// Get a pattern by name
    pub fn get(&self, name: &str) -> Result<NamedPattern, RegistryError> {
        self.patterns
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::PatternNotFound(name.to_string()))
    }

    /// Add a pattern or replace the one registered under `name`
    pub fn put(&self, name: impl Into<String>, source: impl Into<String>) {
        let pattern = NamedPattern::new(name, source);
        tracing::debug!(pattern = %pattern.name, source = %pattern.source, "pattern registered");
        self.patterns.write().insert(pattern.name.clone(), pattern);
    }

    /// Remove a pattern
    pub fn delete(&self, name: &str) -> Result<(), RegistryError> {
        match self.patterns.write().remove(name) {
            Some(_) => {
                tracing::debug!(pattern = %name, "pattern deleted");
                Ok(())
            }
            None => Err(RegistryError::PatternNotFound(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.patterns.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_compile() {
        let registry = PatternRegistry::with_defaults();
        assert_eq!(registry.len(), DEFAULT_PATTERNS.len());
        for name in registry.names() {
            assert!(registry.get(&name).unwrap().is_valid(), "{name} should compile");
        }
    }

    #[test]
    fn test_default_patterns_match() {
        let registry = PatternRegistry::with_defaults();
        let check = |name: &str, value: &str| registry.get(name).unwrap().is_match(value);

        assert!(check("email", "test@example.com"));
        assert!(!check("email", "invalid_email.com"));
        assert!(check("phone_number", "+12345678901"));
        assert!(!check("phone_number", "1234"));
        assert!(check("username", "Johns"));
        assert!(!check("username", "Jo"));
        assert!(check("zipcode", "12345-6789"));
        assert!(check("url", "https://example.com/path"));
        assert!(check("ipv4", "192.168.0.1"));
        assert!(!check("ipv4", "256.1.1.1"));
        assert!(check("ipv6", "2001:db8::8a2e:370:7334"));
        assert!(check("ipv6", "::1"));
        assert!(!check("ipv6", "12345::"));
        assert!(check("slug", "hello-world"));
        assert!(!check("slug", "Hello World"));
    }

    #[test]
    fn test_put_replaces() {
        let registry = PatternRegistry::with_defaults();
        registry.put("phone_number", r"^\+62[0-9]{9,13}$");

        let pattern = registry.get("phone_number").unwrap();
        assert!(pattern.is_match("+628123456789"));
        assert!(!pattern.is_match("+1234567890"));
    }

    #[test]
    fn test_delete() {
        let registry = PatternRegistry::with_defaults();
        assert!(registry.delete("slug").is_ok());
        assert!(!registry.contains("slug"));
        assert_eq!(
            registry.delete("slug"),
            Err(RegistryError::PatternNotFound("slug".to_string()))
        );
    }

    #[test]
    fn test_unknown_pattern() {
        let registry = PatternRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get("nonexistent"),
            Err(RegistryError::PatternNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_source_is_kept() {
        let registry = PatternRegistry::new();
        registry.put("broken", "([a-z");

        let pattern = registry.get("broken").unwrap();
        assert!(!pattern.is_valid());
        assert!(!pattern.is_match("abc"));
        assert_eq!(pattern.source(), "([a-z");
    }
}

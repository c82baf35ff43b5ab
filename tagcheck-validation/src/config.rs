// Validator configuration
//
// Loaded from JSON or TOML files, or from `TAGCHECK_*` environment variables.

use crate::{ConfigError, PatternRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

/// What to do with a rule token no validator recognizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRulePolicy {
    /// Treat the token as passing and log a warning
    #[default]
    Ignore,
    /// Abort validation with [`DirectiveError::UnknownRule`](crate::DirectiveError::UnknownRule)
    Reject,
}

impl UnknownRulePolicy {
    /// Get policy from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ignore" => Some(UnknownRulePolicy::Ignore),
            "reject" | "strict" => Some(UnknownRulePolicy::Reject),
            _ => None,
        }
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Handling of unrecognized rule tokens
    pub unknown_rules: UnknownRulePolicy,

    /// Joins outer and inner field names of nested records (`Address.City`)
    pub path_separator: String,

    /// Extra named patterns, see [`ValidatorConfig::apply_patterns`]
    pub patterns: BTreeMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            unknown_rules: UnknownRulePolicy::Ignore,
            path_separator: ".".to_string(),
            patterns: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Parse configuration content
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e))),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e))),
        }
    }

    /// Load configuration from a file, detecting the format from its extension
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let format = ConfigFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))?;

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content, format)?;
        tracing::debug!(path = %path.display(), "validator configuration loaded");
        Ok(config)
    }

    /// Build configuration from the environment.
    ///
    /// - `TAGCHECK_CONFIG` - configuration file loaded first
    /// - `TAGCHECK_UNKNOWN_RULES=ignore|reject` - unknown rule policy
    /// - `TAGCHECK_PATH_SEPARATOR` - nested field separator
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var("TAGCHECK_CONFIG") {
            Ok(path) => Self::load_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(value) = env::var("TAGCHECK_UNKNOWN_RULES") {
            config.unknown_rules = UnknownRulePolicy::from_str(&value).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "TAGCHECK_UNKNOWN_RULES".to_string(),
                    value,
                }
            })?;
        }

        if let Ok(separator) = env::var("TAGCHECK_PATH_SEPARATOR") {
            config.path_separator = separator;
        }

        Ok(config)
    }

    /// Add or replace every configured pattern in `registry`
    pub fn apply_patterns(&self, registry: &PatternRegistry) {
        for (name, source) in &self.patterns {
            registry.put(name.clone(), source.clone());
        }
    }
}

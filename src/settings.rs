//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::config::RawConfig;
use crate::recipe::Recipe;
use crate::registry;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Recipe used when no explicit chain is configured.
    #[serde(default)]
    pub recipe: Recipe,
    /// Explicit config list; takes precedence over `recipe`.
    #[serde(default)]
    pub chain: Option<Vec<RawConfig>>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    let violations = s.recipe.violations();
    if !violations.is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "recipe".to_string(),
            reason: violations.join("; "),
        });
    }

    if let Some(chain) = &s.chain {
        if chain.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "chain".to_string(),
                reason: "must name at least one transliterator".to_string(),
            });
        }
        // Build each stage so construction-time conflicts surface here.
        for (i, entry) in chain.iter().enumerate() {
            let invalid = |reason: String| SettingsError::InvalidValue {
                field: format!("chain[{i}]"),
                reason,
            };
            let config = entry.resolve().map_err(|e| invalid(e.to_string()))?;
            registry::create_from_config(&config).map_err(|e| invalid(e.to_string()))?;
        }
    }

    Ok(())
}

//! Application configuration.
//!
//! ```toml
//! [logging]
//! filter = "info,trattoria_app=debug"
//! format = "pretty"
//!
//! [rules]
//! phone_pattern = '^[+]?[0-9]{8,15}$'
//! ```
//!
//! Every field is optional. `TRATTORIA_LOG` overrides `logging.filter`.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use trattoria_core::{DomainError, Rules, RulesConfig};
use trattoria_observability::LoggingConfig;

/// Environment variable overriding the configured log filter.
pub const LOG_FILTER_ENV: &str = "TRATTORIA_LOG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid validation rules: {0}")]
    Rules(#[from] DomainError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub rules: RulesConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document. Environment overrides are not applied.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, parse it and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Rule patterns must compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Rules::from_config(&self.rules)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.override_log_filter(std::env::var(LOG_FILTER_ENV).ok());
    }

    fn override_log_filter(&mut self, filter: Option<String>) {
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            self.logging.filter = filter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trattoria_observability::LogFormat;

    #[test]
    fn empty_document_is_the_default_config() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.rules, RulesConfig::default());
    }

    #[test]
    fn sections_override_defaults_field_by_field() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            format = "pretty"

            [rules]
            phone_pattern = '^[0-9]{6}$'
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.rules.phone_pattern, "^[0-9]{6}$");
        assert_eq!(config.rules.email_pattern, RulesConfig::default().email_pattern);
    }

    #[test]
    fn uncompilable_pattern_is_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [rules]
            email_pattern = '(unclosed'
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Rules(DomainError::Validation(msg)) => {
                assert!(msg.starts_with("email_pattern"))
            }
            _ => panic!("Expected Rules error"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[logging").unwrap_err();
        match err {
            ConfigError::Parse(_) => {}
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn log_filter_override_ignores_blank_values() {
        let mut config = AppConfig::default();
        config.override_log_filter(Some("  ".into()));
        assert_eq!(config.logging.filter, "info");

        config.override_log_filter(Some("debug".into()));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn load_reports_the_missing_path() {
        let err = AppConfig::load("/nonexistent/trattoria.toml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/trattoria.toml"));
    }
}

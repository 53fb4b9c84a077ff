//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.database.url, "sqlite://routing.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.observability.log_format, LogFormat::Full);
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [database]
            url = "sqlite:///var/lib/lamb/routing.db"

            [observability]
            log_level = "debug"
            log_format = "compact"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "sqlite:///var/lib/lamb/routing.db");
        assert!(config.database.init_schema);
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(parse_config("[database"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_failure_reported() {
        let err = parse_config("[database]\nmax_connections = 0\n").unwrap_err();
        match &err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains("database.max_connections"));
    }

    #[test]
    fn test_validation_errors_joined() {
        let err = parse_config("[database]\nurl = \"\"\nmax_connections = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: database.url: must not be empty, database.max_connections: must be greater than 0"
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nmax_connections = 2").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/routing-admin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::InstrumentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    let parts: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    parts.join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<InstrumentConfig, ConfigError> {
    let config: InstrumentConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InstrumentConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), steps = config.steps.len(), "Instrumentation config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[duration]\nunit = \"micros\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.duration.unit, crate::config::DurationUnit::Micros);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/driverlog.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = parse_config("[ids]\nlength = 0\n[steps.\"Nope\"]\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: unknown step \"Nope\", ids.length must be greater than zero"
        );
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        assert!(matches!(parse_config("level = "), Err(ConfigError::Parse(_))));
        assert!(matches!(parse_config("level = \"loud\""), Err(ConfigError::Parse(_))));
    }
}

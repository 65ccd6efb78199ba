//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject step names that match no leaf
//! - Check id and duration keys are usable attribute keys
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InstrumentConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::options::STEP_NAMES;
use crate::config::schema::InstrumentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown step {0:?}")]
    UnknownStep(String),

    #[error("ids.length must be greater than zero")]
    ZeroIdLength,

    #[error("{0} must not be empty")]
    EmptyKey(&'static str),

    #[error("id key {0:?} is used for more than one resource")]
    DuplicateIdKey(String),
}

/// Check `config` for problems serde cannot catch.
pub fn validate_config(config: &InstrumentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for name in config.steps.keys() {
        if !STEP_NAMES.contains(&name.as_str()) {
            errors.push(ValidationError::UnknownStep(name.clone()));
        }
    }

    if config.ids.length == 0 {
        errors.push(ValidationError::ZeroIdLength);
    }

    let keys = [
        ("duration.key", &config.duration.key),
        ("ids.conn_key", &config.ids.conn_key),
        ("ids.stmt_key", &config.ids.stmt_key),
        ("ids.tx_key", &config.ids.tx_key),
    ];
    for (field, key) in keys {
        if key.trim().is_empty() {
            errors.push(ValidationError::EmptyKey(field));
        }
    }

    let ids = &config.ids;
    for (a, b) in [(&ids.conn_key, &ids.stmt_key), (&ids.conn_key, &ids.tx_key), (&ids.stmt_key, &ids.tx_key)] {
        if !a.is_empty() && a == b {
            errors.push(ValidationError::DuplicateIdKey(a.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&InstrumentConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = InstrumentConfig::default();
        config.steps.insert("Conn.Frobnicate".into(), Default::default());
        config.ids.length = 0;
        config.duration.key = " ".into();
        config.ids.tx_key = "stmt_id".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::UnknownStep("Conn.Frobnicate".into()),
                ValidationError::ZeroIdLength,
                ValidationError::EmptyKey("duration.key"),
                ValidationError::DuplicateIdKey("stmt_id".into()),
            ]
        );
    }
}

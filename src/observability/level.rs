//! Event severity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered numeric severity.
///
/// The named levels are four apart, so `Level::INFO.offset(-4)` is `Level::DEBUG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Level(i8);

impl Level {
    pub const VERBOSE: Level = Level(-12);
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    pub const fn new(value: i8) -> Self {
        Level(value)
    }

    pub const fn value(self) -> i8 {
        self.0
    }

    /// Shift by `delta`, saturating at the `i8` bounds.
    pub fn offset(self, delta: i8) -> Level {
        Level(self.0.saturating_add(delta))
    }

    /// Nearest `tracing` level at or below this severity.
    pub fn to_tracing(self) -> tracing::Level {
        match self.0 {
            v if v < Level::DEBUG.0 => tracing::Level::TRACE,
            v if v < Level::INFO.0 => tracing::Level::DEBUG,
            v if v < Level::WARN.0 => tracing::Level::INFO,
            v if v < Level::ERROR.0 => tracing::Level::WARN,
            _ => tracing::Level::ERROR,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, name) = match self.0 {
            v if v < Level::TRACE.0 => (Level::VERBOSE, "VERBOSE"),
            v if v < Level::DEBUG.0 => (Level::TRACE, "TRACE"),
            v if v < Level::INFO.0 => (Level::DEBUG, "DEBUG"),
            v if v < Level::WARN.0 => (Level::INFO, "INFO"),
            v if v < Level::ERROR.0 => (Level::WARN, "WARN"),
            _ => (Level::ERROR, "ERROR"),
        };
        let delta = self.0 - base.0;
        if delta == 0 {
            f.write_str(name)
        } else {
            write!(f, "{}{:+}", name, delta)
        }
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Accepts a level name (case-insensitive), a name with an offset such as
    /// `INFO+2`, or a bare integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<i8>() {
            return Ok(Level(v));
        }

        let upper = trimmed.to_ascii_uppercase();
        let split = upper.find(['+', '-']).unwrap_or(upper.len());
        let (name, delta) = upper.split_at(split);
        let base = match name {
            "VERBOSE" => Level::VERBOSE,
            "TRACE" => Level::TRACE,
            "DEBUG" => Level::DEBUG,
            "INFO" => Level::INFO,
            "WARN" | "WARNING" => Level::WARN,
            "ERROR" => Level::ERROR,
            _ => return Err(ParseLevelError(s.to_string())),
        };
        if delta.is_empty() {
            return Ok(base);
        }
        let delta: i8 = delta.parse().map_err(|_| ParseLevelError(s.to_string()))?;
        Ok(base.offset(delta))
    }
}

impl TryFrom<String> for Level {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

//! File configuration schema.
//!
//! All types derive Serde traits for deserialization from TOML. Every field
//! has a default so a minimal file is valid.
//!
//! ```toml
//! message_format = "with_event_name"
//! level = "debug"
//!
//! [duration]
//! unit = "millis"
//! key = "elapsed_ms"
//!
//! [steps."Conn.Prepare"]
//! complete = "warn"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::duration::DurationUnit;
use crate::config::format::MessageFormat;
use crate::config::options::Options;
use crate::config::overrides::{self, Opt};
use crate::id::{RandomIdGen, DEFAULT_ID_LENGTH};
use crate::observability::Level;

/// Root of a configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Message format used to build the default tree.
    pub message_format: MessageFormat,

    /// Complete level applied to every step before per-step settings.
    pub level: Option<Level>,

    pub duration: DurationConfig,

    pub ids: IdConfig,

    /// Per-step levels keyed by step name, e.g. `"Rows.Next"`.
    pub steps: BTreeMap<String, StepLevelConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DurationConfig {
    pub unit: DurationUnit,
    pub key: String,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            unit: DurationUnit::Nanos,
            key: "duration".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IdConfig {
    /// Length of generated ids.
    pub length: usize,
    pub conn_key: String,
    pub stmt_key: String,
    pub tx_key: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_ID_LENGTH,
            conn_key: "conn_id".to_string(),
            stmt_key: "stmt_id".to_string(),
            tx_key: "tx_id".to_string(),
        }
    }
}

/// Levels for one step. `level` behaves like `StepOptions::set_level`;
/// the explicit event levels are applied after it.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct StepLevelConfig {
    pub level: Option<Level>,
    pub start: Option<Level>,
    pub error: Option<Level>,
    pub complete: Option<Level>,
}

impl InstrumentConfig {
    /// Overrides equivalent to this file, in application order.
    pub fn into_opts(self) -> Vec<Opt> {
        let mut opts = vec![
            overrides::duration_unit(self.duration.unit),
            overrides::duration_key(self.duration.key),
            overrides::conn_id_key(self.ids.conn_key),
            overrides::stmt_id_key(self.ids.stmt_key),
            overrides::tx_id_key(self.ids.tx_key),
        ];
        if self.ids.length != DEFAULT_ID_LENGTH {
            opts.push(overrides::id_generator(RandomIdGen::new(self.ids.length).into_generator()));
        }
        if let Some(level) = self.level {
            opts.push(overrides::log_level(level));
        }
        for (name, levels) in self.steps {
            opts.push(Box::new(move |o: &mut Options| {
                for step in o.step_mut(&name) {
                    if let Some(level) = levels.level {
                        step.set_level(level);
                    }
                    if let Some(level) = levels.start {
                        step.start.level = level;
                    }
                    if let Some(level) = levels.error {
                        step.error.level = level;
                    }
                    if let Some(level) = levels.complete {
                        step.complete.level = level;
                    }
                }
            }));
        }
        opts
    }

    /// Build the options tree this file describes.
    pub fn into_options(self) -> Options {
        let format = self.message_format;
        Options::build(format, self.into_opts())
    }
}

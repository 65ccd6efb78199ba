//! Representation of step durations in events.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::observability::{Attr, AttrValue};

/// Unit or representation of the duration attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    /// Integer nanoseconds.
    #[default]
    Nanos,
    /// Integer microseconds.
    Micros,
    /// Integer milliseconds.
    Millis,
    /// A native [`Duration`] value.
    Native,
    /// Human-readable string such as `"1.5ms"`.
    Formatted,
}

impl DurationUnit {
    pub fn value(self, elapsed: Duration) -> AttrValue {
        let saturate = |n: u128| AttrValue::Int(i64::try_from(n).unwrap_or(i64::MAX));
        match self {
            DurationUnit::Nanos => saturate(elapsed.as_nanos()),
            DurationUnit::Micros => saturate(elapsed.as_micros()),
            DurationUnit::Millis => saturate(elapsed.as_millis()),
            DurationUnit::Native => AttrValue::Duration(elapsed),
            DurationUnit::Formatted => AttrValue::Str(format!("{:?}", elapsed)),
        }
    }
}

/// Unit plus the attribute key the duration is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationFormat {
    pub unit: DurationUnit,
    pub key: String,
}

impl DurationFormat {
    pub fn attr(&self, elapsed: Duration) -> Attr {
        Attr::new(self.key.clone(), self.unit.value(elapsed))
    }
}

impl Default for DurationFormat {
    fn default() -> Self {
        Self {
            unit: DurationUnit::Nanos,
            key: "duration".to_string(),
        }
    }
}

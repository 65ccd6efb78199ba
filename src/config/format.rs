//! Event message formats.

use serde::{Deserialize, Serialize};

/// Which of the three events of a step a message is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    Error,
    Complete,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Start => "Start",
            EventKind::Error => "Error",
            EventKind::Complete => "Complete",
        }
    }
}

/// How step messages are derived from the step name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// `"Conn.Prepare Start"`, `"Conn.Prepare Error"`, `"Conn.Prepare"`.
    #[default]
    WithoutEventName,
    /// `"Conn.Prepare Start"`, `"Conn.Prepare Error"`, `"Conn.Prepare Complete"`.
    WithEventName,
}

impl MessageFormat {
    pub fn message(self, name: &str, kind: EventKind) -> String {
        match (self, kind) {
            (MessageFormat::WithoutEventName, EventKind::Complete) => name.to_string(),
            (_, kind) => format!("{} {}", name, kind.as_str()),
        }
    }
}

//! Event sinks.
//!
//! # Responsibilities
//! - Define the boundary to whatever serializes and transports events
//! - Forward events to `tracing` by default
//! - Capture events in memory for inspection

use std::sync::Mutex;

use crate::observability::attr::{self, Attr, AttrValue};
use crate::observability::level::Level;

/// One structured event.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    pub level: Level,
    pub message: &'a str,
    /// Correlation attributes inherited from the logger.
    pub context: &'a [Attr],
    /// Attributes specific to this event.
    pub attrs: &'a [Attr],
}

/// Destination for structured events.
pub trait EventSink: Send + Sync {
    /// Whether events at `level` would be kept. Skipped events are never built.
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    fn emit(&self, event: &Event<'_>);
}

macro_rules! tracing_event {
    ($lvl:expr, $event:expr) => {
        tracing::event!(
            target: "driverlog",
            $lvl,
            severity = %$event.level,
            context = %attr::render($event.context),
            attrs = %attr::render($event.attrs),
            "{}",
            $event.message
        )
    };
}

/// Sink that forwards events to the `tracing` macros under target `driverlog`.
///
/// Attributes are rendered into `context` and `attrs` fields as `key=value` pairs,
/// since `tracing` field names are fixed at compile time.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    min_level: Level,
}

impl TracingSink {
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::VERBOSE)
    }
}

impl EventSink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, event: &Event<'_>) {
        match event.level.to_tracing() {
            tracing::Level::TRACE => tracing_event!(tracing::Level::TRACE, event),
            tracing::Level::DEBUG => tracing_event!(tracing::Level::DEBUG, event),
            tracing::Level::INFO => tracing_event!(tracing::Level::INFO, event),
            tracing::Level::WARN => tracing_event!(tracing::Level::WARN, event),
            _ => tracing_event!(tracing::Level::ERROR, event),
        }
    }
}

/// An event captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub level: Level,
    pub message: String,
    /// Context attributes followed by event attributes.
    pub attrs: Vec<Attr>,
}

impl RecordedEvent {
    /// Value of the last attribute named `key`.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.iter().rev().find(|a| a.key == key).map(|a| &a.value)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttrValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug)]
pub struct MemorySink {
    min_level: Level,
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemorySink {
    /// Capture everything.
    pub fn new() -> Self {
        Self::with_min_level(Level::new(i8::MIN))
    }

    pub fn with_min_level(min_level: Level) -> Self {
        Self {
            min_level,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of captured events in emission order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().expect("memory sink mutex poisoned").clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("memory sink mutex poisoned")
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Events whose message equals `message`.
    pub fn find(&self, message: &str) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .expect("memory sink mutex poisoned")
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("memory sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().expect("memory sink mutex poisoned").clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemorySink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, event: &Event<'_>) {
        let mut attrs = Vec::with_capacity(event.context.len() + event.attrs.len());
        attrs.extend_from_slice(event.context);
        attrs.extend_from_slice(event.attrs);
        self.events
            .lock()
            .expect("memory sink mutex poisoned")
            .push(RecordedEvent {
                level: event.level,
                message: event.message.to_string(),
                attrs,
            });
    }
}

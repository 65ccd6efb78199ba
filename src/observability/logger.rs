//! Correlation-aware logger.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::observability::attr::{Attr, AttrValue};
use crate::observability::level::Level;
use crate::observability::sink::{Event, EventSink};

/// A sink plus the correlation attributes inherited so far.
///
/// Cloning is cheap. [`Logger::with`] never mutates the receiver, so siblings
/// derived from the same parent never see each other's tags.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn EventSink>,
    context: Arc<[Attr]>,
}

impl Logger {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            context: Arc::from(Vec::new()),
        }
    }

    /// A new logger carrying one more correlation attribute.
    pub fn with(&self, key: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Logger {
        let mut context = Vec::with_capacity(self.context.len() + 1);
        context.extend_from_slice(&self.context);
        context.push(Attr::new(key, value));
        Logger {
            sink: Arc::clone(&self.sink),
            context: Arc::from(context),
        }
    }

    pub fn context(&self) -> &[Attr] {
        &self.context
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    /// Emit one event if the sink accepts `level`.
    pub fn log(&self, level: Level, message: &str, attrs: &[Attr]) {
        if !self.sink.enabled(level) {
            return;
        }
        self.sink.emit(&Event {
            level,
            message,
            context: &self.context,
            attrs,
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::sink::MemorySink;

    #[test]
    fn with_does_not_leak_into_siblings() {
        let sink = Arc::new(MemorySink::new());
        let conn = Logger::new(sink.clone()).with("conn_id", "c1");
        let a = conn.with("stmt_id", "s1");
        let b = conn.with("stmt_id", "s2");

        assert_eq!(conn.context().len(), 1);
        a.log(Level::INFO, "a", &[]);
        b.log(Level::INFO, "b", &[]);

        let events = sink.events();
        assert_eq!(events[0].get_str("stmt_id"), Some("s1"));
        assert_eq!(events[1].get_str("stmt_id"), Some("s2"));
        assert_eq!(events[1].attrs.len(), 2);
    }

    #[test]
    fn disabled_levels_are_skipped() {
        let sink = Arc::new(MemorySink::with_min_level(Level::INFO));
        let logger = Logger::new(sink.clone());
        logger.log(Level::DEBUG, "hidden", &[]);
        logger.log(Level::INFO, "shown", &[]);
        assert_eq!(sink.messages(), vec!["shown".to_string()]);
    }
}

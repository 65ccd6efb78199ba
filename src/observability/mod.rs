//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxied operation
//!     → step.rs (start event, timing, classification, error/complete event)
//!     → logger.rs (correlation attributes inherited from parent resources)
//!     → sink.rs (EventSink: tracing by default, in-memory for capture)
//!     → metrics.rs (step counters and latency histograms)
//! ```
//!
//! # Design Decisions
//! - Severity is numeric so a start level can be derived from a complete level
//! - Loggers are immutable; adding a correlation tag yields a new logger
//! - The sink is pluggable; serialization and transport belong to it
//! - Metrics go through the `metrics` facade and are no-ops without a recorder

pub mod attr;
pub mod level;
pub mod logger;
pub mod logging;
pub mod metrics;
pub mod sink;
pub mod step;

pub use attr::{Attr, AttrValue};
pub use level::Level;
pub use logger::Logger;
pub use sink::{Event, EventSink, MemorySink, RecordedEvent, TracingSink};
pub use step::{Outcome, StepError};

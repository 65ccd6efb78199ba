//! Instrumenting proxy for pluggable database drivers.
//!
//! Wraps a backend implementing the [`protocol`] traits and emits a start,
//! error or complete event for every operation, without changing return
//! values or the set of optional extensions the backend advertises.
//!
//! # Architecture Overview
//!
//! ```text
//!   open(registry, name, dsn, opts)
//!        │
//!        ▼
//!   ┌──────────┐   ┌───────────────┐   ┌────────────┐   ┌───────────┐
//!   │  config  │──▶│     proxy     │──▶│ LoggedConn │──▶│LoggedStmt │──▶ LoggedRows
//!   │ Options  │   │ LoggedDriver  │   │  conn_id   │   │  stmt_id  │
//!   └──────────┘   │LoggedConnector│   └─────┬──────┘   └───────────┘
//!                  └───────┬───────┘         └──────▶ LoggedTx (tx_id)
//!                          │
//!                          ▼
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │ observability: step engine → Logger (correlation) → EventSink  │
//!   │                 id: correlation id generation                  │
//!   └────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod id;
pub mod observability;
pub mod open;
pub mod protocol;
pub mod proxy;

pub use config::{overrides, MessageFormat, Opt, Options};
pub use observability::{EventSink, Level, Logger, MemorySink, TracingSink};
pub use open::{open, open_with_format, open_with_options, Error};

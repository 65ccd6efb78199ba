//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! MessageFormat (explicit constructor argument)
//!     → options.rs (default tree: one StepOptions per operation)
//!     → overrides.rs (caller's Opt pipeline, applied in order)
//!     → Options (immutable, shared via Arc by every proxy)
//!
//! Optional file source:
//!     config file (TOML)
//!     → loader.rs (parse & deserialize into schema.rs)
//!     → validation.rs (semantic checks)
//!     → InstrumentConfig::into_opts (becomes ordinary overrides)
//! ```
//!
//! # Design Decisions
//! - No process-wide state; the message format is a constructor argument
//! - Options are read-only once the root proxy is created
//! - Row-cursor overrides fan out to both the connection and statement subtrees

pub mod duration;
pub mod format;
pub mod loader;
pub mod options;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use duration::{DurationFormat, DurationUnit};
pub use format::{EventKind, MessageFormat};
pub use loader::{load_config, parse_config, ConfigError};
pub use options::{
    ConnSteps, ConnectorSteps, DriverSteps, ErrorHandler, EventOptions, IdKeys, Options, RowsSteps, StepOptions,
    StmtSteps, TxSteps, STEP_NAMES,
};
pub use overrides::Opt;
pub use schema::InstrumentConfig;

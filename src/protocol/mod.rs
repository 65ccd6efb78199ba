//! Backend driver protocol.
//!
//! # Data Flow
//! ```text
//! DriverRegistry (selector token → factory)
//!     → Driver::open / DriverContext::open_connector
//!     → Connection
//!         → Statement → Rows
//!         → Transaction
//!         → Rows (ExecerContext / QueryerContext)
//! ```
//!
//! # Design Decisions
//! - Every resource is a boxed trait object owned by exactly one holder
//! - Optional extensions are probed with `as_*` accessors on the base trait,
//!   which return `None` unless the backend overrides them
//! - `CallContext` is passed through untouched; only backends consult it

pub mod context;
pub mod error;
pub mod registry;
pub mod traits;
pub mod types;

pub use context::CallContext;
pub use error::{DriverError, DriverResult};
pub use registry::DriverRegistry;
pub use traits::*;
pub use types::{ExecResult, IsolationLevel, NamedValue, TxOptions, Value};

//! Capability-preserving proxies.
//!
//! # Data Flow
//! ```text
//! wrap_driver(backend)
//!     → probe as_* accessors once (capability.rs)
//!     → LoggedDriver exposes exactly the probed extensions
//!     → Driver.Open succeeds → new conn id → LoggedConn (scope + conn_id)
//!         → Conn.Prepare succeeds → new stmt id → LoggedStmt (scope + stmt_id)
//!             → Stmt.Query → LoggedRows (stmt rows steps, inherits stmt_id)
//!         → Conn.Begin succeeds → new tx id → LoggedTx (scope + tx_id)
//!         → Conn.QueryContext → LoggedRows (conn rows steps)
//! ```
//!
//! # Design Decisions
//! - Each proxy owns its backend resource; children never point back at parents
//! - The scope (logger + options) is cloned into children by value
//! - Child ids are generated only after the creating call succeeds
//! - Accessors return `Some(self)` exactly for the probed capabilities, so every
//!   combination of extensions is preserved

pub mod capability;
pub mod conn;
pub mod connector;
pub mod driver;
pub mod rows;
pub mod stmt;
pub mod tx;

use std::sync::Arc;

use crate::config::{Options, StepOptions};
use crate::observability::{step, Attr, Logger};
use crate::protocol::types::{format_args_list, format_values};
use crate::protocol::{Connection, Connector, Driver, DriverResult, NamedValue, Rows, Statement, Transaction, Value};

pub use capability::{
    conn_capabilities, driver_capabilities, rows_capabilities, stmt_capabilities, Capability, CapabilitySet,
};
pub use conn::LoggedConn;
pub use connector::{DsnConnector, LoggedConnector};
pub use driver::LoggedDriver;
pub use rows::{LoggedRows, RowsSource};
pub use stmt::LoggedStmt;
pub use tx::LoggedTx;

/// Logger and options shared by a proxy and handed down to its children.
#[derive(Clone, Debug)]
pub struct Scope {
    pub(crate) logger: Logger,
    pub(crate) options: Arc<Options>,
}

impl Scope {
    pub fn new(logger: Logger, options: Arc<Options>) -> Self {
        Self { logger, options }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn options(&self) -> &Arc<Options> {
        &self.options
    }

    /// Run `work` as `step`.
    pub(crate) fn run<T, F>(&self, step: &StepOptions, attrs: Vec<Attr>, work: F) -> DriverResult<T>
    where
        F: FnOnce() -> DriverResult<T>,
    {
        step::exec(&self.logger, step, &self.options.duration, attrs, work)
    }

    /// Run `work` as `step`; on success tag the created child with a fresh id
    /// under `id_key` and return the child's scope with it.
    pub(crate) fn run_child<T, F>(&self, step: &StepOptions, attrs: Vec<Attr>, id_key: &str, work: F) -> DriverResult<(T, Scope)>
    where
        F: FnOnce() -> DriverResult<T>,
    {
        let key = id_key.to_string();
        let create = || -> DriverResult<((T, String), Option<Attr>)> {
            let child = work()?;
            let id = (self.options.id_gen)();
            let tag = Attr::new(key.clone(), id.clone());
            Ok(((child, id), Some(tag)))
        };
        let (child, id) = step::exec_with_sideband(&self.logger, step, &self.options.duration, attrs, create)?;
        Ok((child, self.child(key, id)))
    }

    fn child(&self, key: String, id: String) -> Scope {
        Scope {
            logger: self.logger.with(key, id),
            options: Arc::clone(&self.options),
        }
    }
}

pub(crate) fn query_attr(query: &str) -> Attr {
    Attr::new("query", query)
}

pub(crate) fn args_attr(args: &[NamedValue]) -> Attr {
    Attr::new("args", format_args_list(args))
}

pub(crate) fn values_attr(args: &[Value]) -> Attr {
    Attr::new("args", format_values(args))
}

fn scope(logger: &Logger, options: &Arc<Options>) -> Scope {
    Scope::new(logger.clone(), Arc::clone(options))
}

/// Wrap a root driver. `None` stays `None`.
pub fn wrap_driver(driver: Option<Box<dyn Driver>>, logger: &Logger, options: &Arc<Options>) -> Option<Box<dyn Driver>> {
    driver.map(|d| Box::new(LoggedDriver::new(d, scope(logger, options))) as Box<dyn Driver>)
}

pub fn wrap_connector(
    connector: Option<Box<dyn Connector>>,
    logger: &Logger,
    options: &Arc<Options>,
) -> Option<Box<dyn Connector>> {
    connector.map(|c| Box::new(LoggedConnector::new(c, scope(logger, options))) as Box<dyn Connector>)
}

pub fn wrap_connection(
    conn: Option<Box<dyn Connection>>,
    logger: &Logger,
    options: &Arc<Options>,
) -> Option<Box<dyn Connection>> {
    conn.map(|c| LoggedConn::boxed(c, scope(logger, options)))
}

pub fn wrap_statement(
    stmt: Option<Box<dyn Statement>>,
    logger: &Logger,
    options: &Arc<Options>,
) -> Option<Box<dyn Statement>> {
    stmt.map(|s| LoggedStmt::boxed(s, scope(logger, options)))
}

/// Wrap a row cursor; `source` selects the connection or statement rows steps.
pub fn wrap_rows(
    rows: Option<Box<dyn Rows>>,
    source: RowsSource,
    logger: &Logger,
    options: &Arc<Options>,
) -> Option<Box<dyn Rows>> {
    rows.map(|r| LoggedRows::boxed(r, source, scope(logger, options)))
}

pub fn wrap_transaction(
    tx: Option<Box<dyn Transaction>>,
    logger: &Logger,
    options: &Arc<Options>,
) -> Option<Box<dyn Transaction>> {
    tx.map(|t| LoggedTx::boxed(t, scope(logger, options)))
}

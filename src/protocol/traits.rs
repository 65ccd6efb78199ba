//! Resource traits and their optional extensions.
//!
//! A backend advertises an extension by overriding the matching `as_*`
//! accessor to return `Some(self)`. The answer must not change over the
//! lifetime of the resource.

use crate::protocol::context::CallContext;
use crate::protocol::error::DriverResult;
use crate::protocol::types::{ExecResult, NamedValue, TxOptions, Value};

/// Root resource: turns a locator into connections.
pub trait Driver: Send + Sync {
    /// Open a new connection for `dsn`.
    fn open(&self, dsn: &str) -> DriverResult<Box<dyn Connection>>;

    fn as_driver_context(&self) -> Option<&dyn DriverContext> {
        None
    }
}

/// Drivers that can parse a locator once and hand out a reusable connector.
pub trait DriverContext {
    fn open_connector(&self, dsn: &str) -> DriverResult<Box<dyn Connector>>;
}

/// A pre-parsed locator that produces connections on demand.
pub trait Connector: Send + Sync {
    fn connect(&self, ctx: &CallContext) -> DriverResult<Box<dyn Connection>>;

    /// Name of the driver this connector belongs to.
    fn driver_name(&self) -> &str;
}

/// A single session with the backend. Not safe for concurrent use.
pub trait Connection: Send {
    fn prepare(&mut self, query: &str) -> DriverResult<Box<dyn Statement>>;
    fn begin(&mut self) -> DriverResult<Box<dyn Transaction>>;
    fn close(&mut self) -> DriverResult<()>;

    fn as_begin_tx(&mut self) -> Option<&mut dyn ConnBeginTx> {
        None
    }

    fn as_prepare_context(&mut self) -> Option<&mut dyn ConnPrepareContext> {
        None
    }

    fn as_pinger(&mut self) -> Option<&mut dyn Pinger> {
        None
    }

    fn as_session_resetter(&mut self) -> Option<&mut dyn SessionResetter> {
        None
    }

    fn as_execer_context(&mut self) -> Option<&mut dyn ExecerContext> {
        None
    }

    fn as_queryer_context(&mut self) -> Option<&mut dyn QueryerContext> {
        None
    }
}

pub trait ConnBeginTx {
    fn begin_tx(&mut self, ctx: &CallContext, opts: TxOptions) -> DriverResult<Box<dyn Transaction>>;
}

pub trait ConnPrepareContext {
    fn prepare_context(&mut self, ctx: &CallContext, query: &str) -> DriverResult<Box<dyn Statement>>;
}

/// Liveness check.
pub trait Pinger {
    fn ping(&mut self, ctx: &CallContext) -> DriverResult<()>;
}

/// Called before a pooled connection is reused.
pub trait SessionResetter {
    fn reset_session(&mut self, ctx: &CallContext) -> DriverResult<()>;
}

/// Direct execution without an explicit prepare.
///
/// May return [`DriverError::Skip`](crate::protocol::DriverError::Skip) to
/// ask the caller to prepare the statement instead.
pub trait ExecerContext {
    fn exec_context(&mut self, ctx: &CallContext, query: &str, args: &[NamedValue]) -> DriverResult<ExecResult>;
}

/// Direct query without an explicit prepare. Same `Skip` contract as [`ExecerContext`].
pub trait QueryerContext {
    fn query_context(&mut self, ctx: &CallContext, query: &str, args: &[NamedValue]) -> DriverResult<Box<dyn Rows>>;
}

/// A prepared statement bound to the connection that created it.
pub trait Statement: Send {
    /// Number of placeholders, or `None` if the backend cannot tell.
    fn num_input(&self) -> Option<usize>;
    fn exec(&mut self, args: &[Value]) -> DriverResult<ExecResult>;
    fn query(&mut self, args: &[Value]) -> DriverResult<Box<dyn Rows>>;
    fn close(&mut self) -> DriverResult<()>;

    fn as_exec_context(&mut self) -> Option<&mut dyn StmtExecContext> {
        None
    }

    fn as_query_context(&mut self) -> Option<&mut dyn StmtQueryContext> {
        None
    }
}

pub trait StmtExecContext {
    fn exec_context(&mut self, ctx: &CallContext, args: &[NamedValue]) -> DriverResult<ExecResult>;
}

pub trait StmtQueryContext {
    fn query_context(&mut self, ctx: &CallContext, args: &[NamedValue]) -> DriverResult<Box<dyn Rows>>;
}

/// A forward-only row cursor.
pub trait Rows: Send {
    fn columns(&self) -> Vec<String>;

    /// Fill `dest` with the next row. Returns
    /// [`DriverError::EndOfRows`](crate::protocol::DriverError::EndOfRows) when exhausted.
    fn next(&mut self, dest: &mut [Value]) -> DriverResult<()>;
    fn close(&mut self) -> DriverResult<()>;

    fn as_next_result_set(&mut self) -> Option<&mut dyn RowsNextResultSet> {
        None
    }
}

/// Cursors over multiple result sets.
pub trait RowsNextResultSet {
    fn has_next_result_set(&mut self) -> bool;

    /// Advance to the next result set, or `EndOfRows` if there is none.
    fn next_result_set(&mut self) -> DriverResult<()>;
}

pub trait Transaction: Send {
    fn commit(&mut self) -> DriverResult<()>;
    fn rollback(&mut self) -> DriverResult<()>;
}

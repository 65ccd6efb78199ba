//! Row cursor proxy.

use std::fmt;

use crate::config::{Options, RowsSteps};
use crate::protocol::{DriverResult, Rows, RowsNextResultSet, Value};
use crate::proxy::capability::{rows_capabilities, vanished, Capability, CapabilitySet};
use crate::proxy::Scope;

/// Which resource produced a cursor, and so which options subtree applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsSource {
    /// Returned by `Conn.QueryContext`.
    Conn,
    /// Returned by `Stmt.Query` or `Stmt.QueryContext`.
    Stmt,
}

impl RowsSource {
    pub fn steps(self, options: &Options) -> &RowsSteps {
        match self {
            RowsSource::Conn => &options.conn_rows,
            RowsSource::Stmt => &options.stmt_rows,
        }
    }
}

/// Instrumented [`Rows`].
pub struct LoggedRows {
    inner: Box<dyn Rows>,
    caps: CapabilitySet,
    source: RowsSource,
    scope: Scope,
}

impl LoggedRows {
    pub fn new(mut inner: Box<dyn Rows>, source: RowsSource, scope: Scope) -> Self {
        let caps = rows_capabilities(inner.as_mut());
        Self {
            inner,
            caps,
            source,
            scope,
        }
    }

    pub fn boxed(inner: Box<dyn Rows>, source: RowsSource, scope: Scope) -> Box<dyn Rows> {
        Box::new(Self::new(inner, source, scope))
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.caps
    }
}

impl Rows for LoggedRows {
    fn columns(&self) -> Vec<String> {
        self.inner.columns()
    }

    fn next(&mut self, dest: &mut [Value]) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&self.source.steps(&scope.options).next, Vec::new(), || inner.next(dest))
    }

    fn close(&mut self) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&self.source.steps(&scope.options).close, Vec::new(), || inner.close())
    }

    fn as_next_result_set(&mut self) -> Option<&mut dyn RowsNextResultSet> {
        if self.caps.contains(Capability::NextResultSet) {
            Some(self)
        } else {
            None
        }
    }
}

impl RowsNextResultSet for LoggedRows {
    fn has_next_result_set(&mut self) -> bool {
        self.inner
            .as_next_result_set()
            .map(|r| r.has_next_result_set())
            .unwrap_or(false)
    }

    fn next_result_set(&mut self) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let step = &self.source.steps(&scope.options).next_result_set;
        scope.run(step, Vec::new(), || match inner.as_next_result_set() {
            Some(r) => r.next_result_set(),
            None => Err(vanished(Capability::NextResultSet)),
        })
    }
}

impl fmt::Debug for LoggedRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedRows")
            .field("caps", &self.caps)
            .field("source", &self.source)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

//! Statement proxy.

use std::fmt;

use crate::protocol::{
    CallContext, DriverResult, ExecResult, NamedValue, Rows, Statement, StmtExecContext, StmtQueryContext, Value,
};
use crate::proxy::capability::{stmt_capabilities, vanished, Capability, CapabilitySet};
use crate::proxy::rows::{LoggedRows, RowsSource};
use crate::proxy::{args_attr, values_attr, Scope};

/// Instrumented [`Statement`]. Supports all four combinations of the two
/// context-aware extensions.
pub struct LoggedStmt {
    inner: Box<dyn Statement>,
    caps: CapabilitySet,
    scope: Scope,
}

impl LoggedStmt {
    pub fn new(mut inner: Box<dyn Statement>, scope: Scope) -> Self {
        let caps = stmt_capabilities(inner.as_mut());
        Self { inner, caps, scope }
    }

    pub fn boxed(inner: Box<dyn Statement>, scope: Scope) -> Box<dyn Statement> {
        Box::new(Self::new(inner, scope))
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.caps
    }
}

impl Statement for LoggedStmt {
    fn num_input(&self) -> Option<usize> {
        self.inner.num_input()
    }

    fn exec(&mut self, args: &[Value]) -> DriverResult<ExecResult> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.stmt.exec, vec![values_attr(args)], || inner.exec(args))
    }

    fn query(&mut self, args: &[Value]) -> DriverResult<Box<dyn Rows>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let rows = scope.run(&scope.options.stmt.query, vec![values_attr(args)], || inner.query(args))?;
        Ok(LoggedRows::boxed(rows, RowsSource::Stmt, scope.clone()))
    }

    fn close(&mut self) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.stmt.close, Vec::new(), || inner.close())
    }

    fn as_exec_context(&mut self) -> Option<&mut dyn StmtExecContext> {
        if self.caps.contains(Capability::StmtExecContext) {
            Some(self)
        } else {
            None
        }
    }

    fn as_query_context(&mut self) -> Option<&mut dyn StmtQueryContext> {
        if self.caps.contains(Capability::StmtQueryContext) {
            Some(self)
        } else {
            None
        }
    }
}

impl StmtExecContext for LoggedStmt {
    fn exec_context(&mut self, ctx: &CallContext, args: &[NamedValue]) -> DriverResult<ExecResult> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.stmt.exec_context, vec![args_attr(args)], || match inner.as_exec_context() {
            Some(e) => e.exec_context(ctx, args),
            None => Err(vanished(Capability::StmtExecContext)),
        })
    }
}

impl StmtQueryContext for LoggedStmt {
    fn query_context(&mut self, ctx: &CallContext, args: &[NamedValue]) -> DriverResult<Box<dyn Rows>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let rows = scope.run(&scope.options.stmt.query_context, vec![args_attr(args)], || {
            match inner.as_query_context() {
                Some(q) => q.query_context(ctx, args),
                None => Err(vanished(Capability::StmtQueryContext)),
            }
        })?;
        Ok(LoggedRows::boxed(rows, RowsSource::Stmt, scope.clone()))
    }
}

impl fmt::Debug for LoggedStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedStmt")
            .field("caps", &self.caps)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

//! Connection proxy.

use std::fmt;

use crate::observability::Attr;
use crate::protocol::{
    CallContext, ConnBeginTx, ConnPrepareContext, Connection, DriverResult, ExecResult, ExecerContext, NamedValue,
    Pinger, QueryerContext, Rows, SessionResetter, Statement, Transaction, TxOptions,
};
use crate::proxy::capability::{conn_capabilities, vanished, Capability, CapabilitySet};
use crate::proxy::rows::{LoggedRows, RowsSource};
use crate::proxy::stmt::LoggedStmt;
use crate::proxy::tx::LoggedTx;
use crate::proxy::{args_attr, query_attr, Scope};

/// Instrumented [`Connection`].
///
/// Each of the six optional extensions is exposed independently, exactly as
/// the wrapped connection advertised it at wrap time.
pub struct LoggedConn {
    inner: Box<dyn Connection>,
    caps: CapabilitySet,
    scope: Scope,
}

impl LoggedConn {
    pub fn new(mut inner: Box<dyn Connection>, scope: Scope) -> Self {
        let caps = conn_capabilities(inner.as_mut());
        Self { inner, caps, scope }
    }

    pub fn boxed(inner: Box<dyn Connection>, scope: Scope) -> Box<dyn Connection> {
        Box::new(Self::new(inner, scope))
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.caps
    }

    fn expose(&self, cap: Capability) -> bool {
        self.caps.contains(cap)
    }
}

impl Connection for LoggedConn {
    fn prepare(&mut self, query: &str) -> DriverResult<Box<dyn Statement>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let (stmt, child) = scope.run_child(
            &scope.options.conn.prepare,
            vec![query_attr(query)],
            &scope.options.id_keys.stmt,
            || inner.prepare(query),
        )?;
        Ok(LoggedStmt::boxed(stmt, child))
    }

    fn begin(&mut self) -> DriverResult<Box<dyn Transaction>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let (tx, child) = scope.run_child(&scope.options.conn.begin, Vec::new(), &scope.options.id_keys.tx, || {
            inner.begin()
        })?;
        Ok(LoggedTx::boxed(tx, child))
    }

    fn close(&mut self) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.conn.close, Vec::new(), || inner.close())
    }

    fn as_begin_tx(&mut self) -> Option<&mut dyn ConnBeginTx> {
        if self.expose(Capability::BeginTx) {
            Some(self)
        } else {
            None
        }
    }

    fn as_prepare_context(&mut self) -> Option<&mut dyn ConnPrepareContext> {
        if self.expose(Capability::PrepareContext) {
            Some(self)
        } else {
            None
        }
    }

    fn as_pinger(&mut self) -> Option<&mut dyn Pinger> {
        if self.expose(Capability::Pinger) {
            Some(self)
        } else {
            None
        }
    }

    fn as_session_resetter(&mut self) -> Option<&mut dyn SessionResetter> {
        if self.expose(Capability::SessionResetter) {
            Some(self)
        } else {
            None
        }
    }

    fn as_execer_context(&mut self) -> Option<&mut dyn ExecerContext> {
        if self.expose(Capability::ExecerContext) {
            Some(self)
        } else {
            None
        }
    }

    fn as_queryer_context(&mut self) -> Option<&mut dyn QueryerContext> {
        if self.expose(Capability::QueryerContext) {
            Some(self)
        } else {
            None
        }
    }
}

impl ConnBeginTx for LoggedConn {
    fn begin_tx(&mut self, ctx: &CallContext, opts: TxOptions) -> DriverResult<Box<dyn Transaction>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let attrs = vec![
            Attr::new("isolation", opts.isolation.to_string()),
            Attr::new("read_only", opts.read_only),
        ];
        let (tx, child) = scope.run_child(&scope.options.conn.begin_tx, attrs, &scope.options.id_keys.tx, || {
            match inner.as_begin_tx() {
                Some(b) => b.begin_tx(ctx, opts),
                None => Err(vanished(Capability::BeginTx)),
            }
        })?;
        Ok(LoggedTx::boxed(tx, child))
    }
}

impl ConnPrepareContext for LoggedConn {
    fn prepare_context(&mut self, ctx: &CallContext, query: &str) -> DriverResult<Box<dyn Statement>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let (stmt, child) = scope.run_child(
            &scope.options.conn.prepare_context,
            vec![query_attr(query)],
            &scope.options.id_keys.stmt,
            || match inner.as_prepare_context() {
                Some(p) => p.prepare_context(ctx, query),
                None => Err(vanished(Capability::PrepareContext)),
            },
        )?;
        Ok(LoggedStmt::boxed(stmt, child))
    }
}

impl Pinger for LoggedConn {
    fn ping(&mut self, ctx: &CallContext) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.conn.ping, Vec::new(), || match inner.as_pinger() {
            Some(p) => p.ping(ctx),
            None => Err(vanished(Capability::Pinger)),
        })
    }
}

impl SessionResetter for LoggedConn {
    fn reset_session(&mut self, ctx: &CallContext) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.conn.reset_session, Vec::new(), || match inner.as_session_resetter() {
            Some(r) => r.reset_session(ctx),
            None => Err(vanished(Capability::SessionResetter)),
        })
    }
}

impl ExecerContext for LoggedConn {
    fn exec_context(&mut self, ctx: &CallContext, query: &str, args: &[NamedValue]) -> DriverResult<ExecResult> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let attrs = vec![query_attr(query), args_attr(args)];
        scope.run(&scope.options.conn.exec_context, attrs, || match inner.as_execer_context() {
            Some(e) => e.exec_context(ctx, query, args),
            None => Err(vanished(Capability::ExecerContext)),
        })
    }
}

impl QueryerContext for LoggedConn {
    fn query_context(&mut self, ctx: &CallContext, query: &str, args: &[NamedValue]) -> DriverResult<Box<dyn Rows>> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        let attrs = vec![query_attr(query), args_attr(args)];
        let rows = scope.run(&scope.options.conn.query_context, attrs, || match inner.as_queryer_context() {
            Some(q) => q.query_context(ctx, query, args),
            None => Err(vanished(Capability::QueryerContext)),
        })?;
        Ok(LoggedRows::boxed(rows, RowsSource::Conn, scope.clone()))
    }
}

impl fmt::Debug for LoggedConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedConn")
            .field("caps", &self.caps)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

//! Shared fake backend for integration tests.
//!
//! Every resource advertises exactly the capabilities in its `Fixture`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use driverlog::config::{MessageFormat, Opt, Options};
use driverlog::id::IdGenerator;
use driverlog::observability::{Logger, MemorySink};
use driverlog::protocol::*;
use driverlog::proxy::{Capability, CapabilitySet};

/// Capabilities and failure switches for the fake backend.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub caps: CapabilitySet,
    /// Number of rows every cursor yields.
    pub rows: usize,
}

impl Fixture {
    pub fn with_caps(caps: CapabilitySet) -> Arc<Self> {
        Arc::new(Self { caps, rows: 2 })
    }

    pub fn all() -> Arc<Self> {
        Self::with_caps(Capability::ALL.into_iter().collect())
    }

    pub fn none() -> Arc<Self> {
        Self::with_caps(CapabilitySet::empty())
    }

    fn has(&self, cap: Capability) -> bool {
        self.caps.contains(cap)
    }
}

macro_rules! advertise {
    ($self:ident, $cap:expr) => {
        if $self.fixture.has($cap) {
            Some($self)
        } else {
            None
        }
    };
}

pub struct FakeDriver {
    pub fixture: Arc<Fixture>,
}

impl Driver for FakeDriver {
    fn open(&self, dsn: &str) -> DriverResult<Box<dyn Connection>> {
        if dsn == "bad" {
            return Err(DriverError::message("fake: cannot open \"bad\""));
        }
        Ok(Box::new(FakeConn::new(self.fixture.clone())))
    }

    fn as_driver_context(&self) -> Option<&dyn DriverContext> {
        advertise!(self, Capability::DriverContext)
    }
}

impl DriverContext for FakeDriver {
    fn open_connector(&self, dsn: &str) -> DriverResult<Box<dyn Connector>> {
        if dsn == "bad" {
            return Err(DriverError::message("fake: malformed locator \"bad\""));
        }
        Ok(Box::new(FakeConnector {
            fixture: self.fixture.clone(),
        }))
    }
}

pub struct FakeConnector {
    pub fixture: Arc<Fixture>,
}

impl Connector for FakeConnector {
    fn connect(&self, _ctx: &CallContext) -> DriverResult<Box<dyn Connection>> {
        Ok(Box::new(FakeConn::new(self.fixture.clone())))
    }

    fn driver_name(&self) -> &str {
        "fake"
    }
}

pub struct FakeConn {
    pub fixture: Arc<Fixture>,
}

impl FakeConn {
    pub fn new(fixture: Arc<Fixture>) -> Self {
        Self { fixture }
    }

    fn stmt(&self, query: &str) -> DriverResult<Box<dyn Statement>> {
        if query.contains("FAIL") {
            return Err(DriverError::message("syntax error near \"FAIL\""));
        }
        Ok(Box::new(FakeStmt::new(self.fixture.clone())))
    }
}

impl Connection for FakeConn {
    fn prepare(&mut self, query: &str) -> DriverResult<Box<dyn Statement>> {
        self.stmt(query)
    }

    fn begin(&mut self) -> DriverResult<Box<dyn Transaction>> {
        Ok(Box::new(FakeTx))
    }

    fn close(&mut self) -> DriverResult<()> {
        Ok(())
    }

    fn as_begin_tx(&mut self) -> Option<&mut dyn ConnBeginTx> {
        advertise!(self, Capability::BeginTx)
    }

    fn as_prepare_context(&mut self) -> Option<&mut dyn ConnPrepareContext> {
        advertise!(self, Capability::PrepareContext)
    }

    fn as_pinger(&mut self) -> Option<&mut dyn Pinger> {
        advertise!(self, Capability::Pinger)
    }

    fn as_session_resetter(&mut self) -> Option<&mut dyn SessionResetter> {
        advertise!(self, Capability::SessionResetter)
    }

    fn as_execer_context(&mut self) -> Option<&mut dyn ExecerContext> {
        advertise!(self, Capability::ExecerContext)
    }

    fn as_queryer_context(&mut self) -> Option<&mut dyn QueryerContext> {
        advertise!(self, Capability::QueryerContext)
    }
}

impl ConnBeginTx for FakeConn {
    fn begin_tx(&mut self, _ctx: &CallContext, opts: TxOptions) -> DriverResult<Box<dyn Transaction>> {
        if opts.isolation == IsolationLevel::Linearizable {
            return Err(DriverError::message("isolation level not supported"));
        }
        Ok(Box::new(FakeTx))
    }
}

impl ConnPrepareContext for FakeConn {
    fn prepare_context(&mut self, _ctx: &CallContext, query: &str) -> DriverResult<Box<dyn Statement>> {
        self.stmt(query)
    }
}

impl Pinger for FakeConn {
    fn ping(&mut self, _ctx: &CallContext) -> DriverResult<()> {
        Ok(())
    }
}

impl SessionResetter for FakeConn {
    fn reset_session(&mut self, _ctx: &CallContext) -> DriverResult<()> {
        Err(DriverError::BadConn)
    }
}

impl ExecerContext for FakeConn {
    fn exec_context(&mut self, _ctx: &CallContext, query: &str, _args: &[NamedValue]) -> DriverResult<ExecResult> {
        match query {
            "SKIP" => Err(DriverError::Skip),
            q if q.contains("FAIL") => Err(DriverError::message("constraint failed")),
            _ => Ok(ExecResult {
                last_insert_id: Some(1),
                rows_affected: 1,
            }),
        }
    }
}

impl QueryerContext for FakeConn {
    fn query_context(&mut self, _ctx: &CallContext, query: &str, _args: &[NamedValue]) -> DriverResult<Box<dyn Rows>> {
        if query == "SKIP" {
            return Err(DriverError::Skip);
        }
        Ok(Box::new(FakeRows::new(self.fixture.clone())))
    }
}

pub struct FakeStmt {
    pub fixture: Arc<Fixture>,
}

impl FakeStmt {
    pub fn new(fixture: Arc<Fixture>) -> Self {
        Self { fixture }
    }
}

impl Statement for FakeStmt {
    fn num_input(&self) -> Option<usize> {
        Some(1)
    }

    fn exec(&mut self, args: &[Value]) -> DriverResult<ExecResult> {
        if args.len() != 1 {
            return Err(DriverError::message(format!("expected 1 argument, got {}", args.len())));
        }
        Ok(ExecResult {
            last_insert_id: None,
            rows_affected: 1,
        })
    }

    fn query(&mut self, _args: &[Value]) -> DriverResult<Box<dyn Rows>> {
        Ok(Box::new(FakeRows::new(self.fixture.clone())))
    }

    fn close(&mut self) -> DriverResult<()> {
        Ok(())
    }

    fn as_exec_context(&mut self) -> Option<&mut dyn StmtExecContext> {
        advertise!(self, Capability::StmtExecContext)
    }

    fn as_query_context(&mut self) -> Option<&mut dyn StmtQueryContext> {
        advertise!(self, Capability::StmtQueryContext)
    }
}

impl StmtExecContext for FakeStmt {
    fn exec_context(&mut self, _ctx: &CallContext, _args: &[NamedValue]) -> DriverResult<ExecResult> {
        Ok(ExecResult::default())
    }
}

impl StmtQueryContext for FakeStmt {
    fn query_context(&mut self, _ctx: &CallContext, _args: &[NamedValue]) -> DriverResult<Box<dyn Rows>> {
        Ok(Box::new(FakeRows::new(self.fixture.clone())))
    }
}

pub struct FakeRows {
    pub fixture: Arc<Fixture>,
    pos: usize,
}

impl FakeRows {
    pub fn new(fixture: Arc<Fixture>) -> Self {
        Self { fixture, pos: 0 }
    }
}

impl Rows for FakeRows {
    fn columns(&self) -> Vec<String> {
        vec!["id".to_string()]
    }

    fn next(&mut self, dest: &mut [Value]) -> DriverResult<()> {
        if self.pos >= self.fixture.rows {
            return Err(DriverError::EndOfRows);
        }
        self.pos += 1;
        if let Some(slot) = dest.first_mut() {
            *slot = Value::Int(self.pos as i64);
        }
        Ok(())
    }

    fn close(&mut self) -> DriverResult<()> {
        Ok(())
    }

    fn as_next_result_set(&mut self) -> Option<&mut dyn RowsNextResultSet> {
        advertise!(self, Capability::NextResultSet)
    }
}

impl RowsNextResultSet for FakeRows {
    fn has_next_result_set(&mut self) -> bool {
        false
    }

    fn next_result_set(&mut self) -> DriverResult<()> {
        Err(DriverError::EndOfRows)
    }
}

pub struct FakeTx;

impl Transaction for FakeTx {
    fn commit(&mut self) -> DriverResult<()> {
        Ok(())
    }

    fn rollback(&mut self) -> DriverResult<()> {
        Err(DriverError::message("rollback failed: connection lost"))
    }
}

/// Registry with `fake` (all capabilities) and `plain` (none).
pub fn registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register("fake", || Box::new(FakeDriver { fixture: Fixture::all() }));
    registry.register("plain", || Box::new(FakeDriver { fixture: Fixture::none() }));
    registry
}

/// Generator yielding "0001", "0002", ... and the shared counter.
pub fn sequential_ids() -> (IdGenerator, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = counter.clone();
    let gen: IdGenerator = Arc::new(move || format!("{:04}", c.fetch_add(1, Ordering::SeqCst) + 1));
    (gen, counter)
}

/// Options capturing into a fresh memory sink.
pub fn capture(opts: Vec<Opt>) -> (Arc<Options>, Arc<MemorySink>, Logger) {
    let sink = Arc::new(MemorySink::new());
    let mut all = vec![driverlog::overrides::sink(sink.clone())];
    all.extend(opts);
    let options = Arc::new(Options::build(MessageFormat::default(), all));
    let logger = Logger::new(options.sink.clone());
    (options, sink, logger)
}

mod common;

use common::{capture, FakeConn, FakeDriver, FakeRows, FakeStmt, Fixture};
use driverlog::protocol::{CallContext, Connection, Driver, Rows, Statement, Value};
use driverlog::proxy::{
    conn_capabilities, driver_capabilities, rows_capabilities, stmt_capabilities, wrap_connection, wrap_connector,
    wrap_driver, wrap_rows, wrap_statement, wrap_transaction, Capability, CapabilitySet, RowsSource,
};

const CONN_CAPS: [Capability; 6] = [
    Capability::BeginTx,
    Capability::PrepareContext,
    Capability::Pinger,
    Capability::SessionResetter,
    Capability::ExecerContext,
    Capability::QueryerContext,
];

const STMT_CAPS: [Capability; 2] = [Capability::StmtExecContext, Capability::StmtQueryContext];

/// Every subset of `caps`, as a bitmask walk.
fn subsets(caps: &[Capability]) -> Vec<CapabilitySet> {
    (0..1u32 << caps.len())
        .map(|mask| {
            caps.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, c)| *c)
                .collect()
        })
        .collect()
}

#[test]
fn connection_preserves_every_combination() {
    let (options, _sink, logger) = capture(vec![]);
    let all = subsets(&CONN_CAPS);
    assert_eq!(all.len(), 64);

    for caps in all {
        let conn: Box<dyn Connection> = Box::new(FakeConn::new(Fixture::with_caps(caps)));
        let mut wrapped = wrap_connection(Some(conn), &logger, &options).expect("wrapped");
        assert_eq!(conn_capabilities(wrapped.as_mut()), caps, "subset {:?}", caps);
    }
}

#[test]
fn statement_preserves_every_combination() {
    let (options, _sink, logger) = capture(vec![]);
    for caps in subsets(&STMT_CAPS) {
        let stmt: Box<dyn Statement> = Box::new(FakeStmt::new(Fixture::with_caps(caps)));
        let mut wrapped = wrap_statement(Some(stmt), &logger, &options).expect("wrapped");
        assert_eq!(stmt_capabilities(wrapped.as_mut()), caps);
    }
}

#[test]
fn rows_and_driver_preserve_their_extension() {
    let (options, _sink, logger) = capture(vec![]);
    for caps in subsets(&[Capability::NextResultSet]) {
        let rows: Box<dyn Rows> = Box::new(FakeRows::new(Fixture::with_caps(caps)));
        let mut wrapped = wrap_rows(Some(rows), RowsSource::Stmt, &logger, &options).expect("wrapped");
        assert_eq!(rows_capabilities(wrapped.as_mut()), caps);
    }
    for caps in subsets(&[Capability::DriverContext]) {
        let driver: Box<dyn Driver> = Box::new(FakeDriver {
            fixture: Fixture::with_caps(caps),
        });
        let wrapped = wrap_driver(Some(driver), &logger, &options).expect("wrapped");
        assert_eq!(driver_capabilities(wrapped.as_ref()), caps);
    }
}

#[test]
fn children_inherit_their_backends_capabilities() {
    let (options, _sink, logger) = capture(vec![]);
    let caps = CapabilitySet::empty()
        .with(Capability::PrepareContext)
        .with(Capability::QueryerContext)
        .with(Capability::StmtQueryContext)
        .with(Capability::NextResultSet);
    let conn: Box<dyn Connection> = Box::new(FakeConn::new(Fixture::with_caps(caps)));
    let mut conn = wrap_connection(Some(conn), &logger, &options).expect("wrapped");
    let ctx = CallContext::background();

    let mut stmt = conn
        .as_prepare_context()
        .expect("prepare context advertised")
        .prepare_context(&ctx, "SELECT id FROM t")
        .expect("prepared");
    assert_eq!(
        stmt_capabilities(stmt.as_mut()),
        CapabilitySet::empty().with(Capability::StmtQueryContext)
    );

    let mut rows = conn
        .as_queryer_context()
        .expect("queryer advertised")
        .query_context(&ctx, "SELECT 1", &[])
        .expect("queried");
    assert!(rows.as_next_result_set().is_some());
    assert!(!rows.as_next_result_set().expect("advertised").has_next_result_set());

    let mut dest = vec![Value::Null];
    rows.next(&mut dest).expect("first row");
    assert_eq!(dest[0], Value::Int(1));
}

#[test]
fn absent_backend_stays_absent() {
    let (options, _sink, logger) = capture(vec![]);
    assert!(wrap_driver(None, &logger, &options).is_none());
    assert!(wrap_connector(None, &logger, &options).is_none());
    assert!(wrap_connection(None, &logger, &options).is_none());
    assert!(wrap_statement(None, &logger, &options).is_none());
    assert!(wrap_rows(None, RowsSource::Conn, &logger, &options).is_none());
    assert!(wrap_transaction(None, &logger, &options).is_none());
}

#[test]
fn probing_does_not_emit_events() {
    let (options, sink, logger) = capture(vec![]);
    let conn: Box<dyn Connection> = Box::new(FakeConn::new(Fixture::all()));
    let mut conn = wrap_connection(Some(conn), &logger, &options).expect("wrapped");
    let _ = conn_capabilities(conn.as_mut());
    assert!(sink.is_empty());
}

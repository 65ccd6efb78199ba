//! Caller-supplied overrides.
//!
//! Each function returns an [`Opt`] that mutates exactly the leaf (or, for the
//! `rows_*` functions, the two leaves) it names. Overrides run in the order
//! the caller passes them.

use std::sync::Arc;

use crate::config::duration::DurationUnit;
use crate::config::options::{Options, StepOptions};
use crate::id::IdGenerator;
use crate::observability::{EventSink, Level};

/// A single override applied to a freshly built [`Options`].
pub type Opt = Box<dyn Fn(&mut Options) + Send + Sync>;

macro_rules! step_overrides {
    ($( $(#[$meta:meta])* $fn_name:ident => $($path:ident).+ ;)*) => {
        $(
            $(#[$meta])*
            pub fn $fn_name<F>(f: F) -> Opt
            where
                F: Fn(&mut StepOptions) + Send + Sync + 'static,
            {
                Box::new(move |o: &mut Options| f(&mut o.$($path).+))
            }
        )*
    };
}

step_overrides! {
    /// The entry point's own `Open` step.
    open_step => open;
    driver_open => driver.open;
    driver_open_connector => driver.open_connector;
    connector_connect => connector.connect;
    conn_begin => conn.begin;
    conn_begin_tx => conn.begin_tx;
    conn_close => conn.close;
    conn_exec_context => conn.exec_context;
    conn_ping => conn.ping;
    conn_prepare => conn.prepare;
    conn_prepare_context => conn.prepare_context;
    conn_query_context => conn.query_context;
    conn_reset_session => conn.reset_session;
    stmt_close => stmt.close;
    stmt_exec => stmt.exec;
    stmt_exec_context => stmt.exec_context;
    stmt_query => stmt.query;
    stmt_query_context => stmt.query_context;
    tx_commit => tx.commit;
    tx_rollback => tx.rollback;
}

/// `Rows.Close` on cursors from both connections and statements.
pub fn rows_close<F>(f: F) -> Opt
where
    F: Fn(&mut StepOptions) + Send + Sync + 'static,
{
    Box::new(move |o: &mut Options| {
        f(&mut o.conn_rows.close);
        f(&mut o.stmt_rows.close);
    })
}

/// `Rows.Next` on cursors from both connections and statements.
pub fn rows_next<F>(f: F) -> Opt
where
    F: Fn(&mut StepOptions) + Send + Sync + 'static,
{
    Box::new(move |o: &mut Options| {
        f(&mut o.conn_rows.next);
        f(&mut o.stmt_rows.next);
    })
}

/// `Rows.NextResultSet` on cursors from both connections and statements.
pub fn rows_next_result_set<F>(f: F) -> Opt
where
    F: Fn(&mut StepOptions) + Send + Sync + 'static,
{
    Box::new(move |o: &mut Options| {
        f(&mut o.conn_rows.next_result_set);
        f(&mut o.stmt_rows.next_result_set);
    })
}

/// Apply `f` to every leaf.
pub fn all_steps<F>(f: F) -> Opt
where
    F: Fn(&mut StepOptions) + Send + Sync + 'static,
{
    Box::new(move |o: &mut Options| {
        for step in o.steps_mut() {
            f(step);
        }
    })
}

/// Set the complete level of every step, deriving start levels from it.
pub fn log_level(level: Level) -> Opt {
    all_steps(move |s| s.set_level(level))
}

pub fn duration_unit(unit: DurationUnit) -> Opt {
    Box::new(move |o: &mut Options| o.duration.unit = unit)
}

pub fn duration_key(key: impl Into<String>) -> Opt {
    let key = key.into();
    Box::new(move |o: &mut Options| o.duration.key = key.clone())
}

/// Replace the correlation id generator.
pub fn id_generator(gen: IdGenerator) -> Opt {
    Box::new(move |o: &mut Options| o.id_gen = Arc::clone(&gen))
}

pub fn conn_id_key(key: impl Into<String>) -> Opt {
    let key = key.into();
    Box::new(move |o: &mut Options| o.id_keys.conn = key.clone())
}

pub fn stmt_id_key(key: impl Into<String>) -> Opt {
    let key = key.into();
    Box::new(move |o: &mut Options| o.id_keys.stmt = key.clone())
}

pub fn tx_id_key(key: impl Into<String>) -> Opt {
    let key = key.into();
    Box::new(move |o: &mut Options| o.id_keys.tx = key.clone())
}

/// Send events to `sink` instead of `tracing`.
pub fn sink(sink: Arc<dyn EventSink>) -> Opt {
    Box::new(move |o: &mut Options| o.sink = Arc::clone(&sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MessageFormat;
    use crate::observability::{Attr, MemorySink};

    #[test]
    fn overrides_apply_in_order() {
        let o = Options::build(
            MessageFormat::default(),
            vec![
                conn_prepare(|s| s.set_level(Level::WARN)),
                log_level(Level::DEBUG),
                conn_prepare(|s| s.complete.msg = "prepared".to_string()),
            ],
        );
        assert_eq!(o.conn.prepare.complete.level, Level::DEBUG);
        assert_eq!(o.conn.prepare.complete.msg, "prepared");
        assert_eq!(o.tx.commit.start.level, Level::TRACE);
    }

    #[test]
    fn message_format_per_step() {
        let o = Options::build(
            MessageFormat::WithoutEventName,
            vec![
                conn_prepare(|s| s.set_messages(MessageFormat::WithEventName)),
                rows_close(|s| s.set_messages(MessageFormat::WithEventName)),
            ],
        );
        assert_eq!(o.conn.prepare.start.msg, "Conn.Prepare Start");
        assert_eq!(o.conn.prepare.error.msg, "Conn.Prepare Error");
        assert_eq!(o.conn.prepare.complete.msg, "Conn.Prepare Complete");
        assert_eq!(o.conn_rows.close.complete.msg, "Rows.Close Complete");
        assert_eq!(o.stmt_rows.close.complete.msg, "Rows.Close Complete");
        assert_eq!(o.conn.prepare_context.complete.msg, "Conn.PrepareContext");
    }

    #[test]
    fn rows_overrides_fan_out() {
        let o = Options::build(
            MessageFormat::default(),
            vec![rows_next(|s| {
                s.set_error_handler(|_| (false, vec![Attr::new("strict", true)]));
                s.error.level = Level::WARN;
            })],
        );
        assert_eq!(o.conn_rows.next.error.level, Level::WARN);
        assert_eq!(o.stmt_rows.next.error.level, Level::WARN);
        assert_eq!(o.conn_rows.close.error.level, Level::ERROR);
    }

    #[test]
    fn global_knobs() {
        let mem = Arc::new(MemorySink::new());
        let o = Options::build(
            MessageFormat::default(),
            vec![
                duration_unit(DurationUnit::Millis),
                duration_key("elapsed"),
                conn_id_key("connection"),
                stmt_id_key("statement"),
                tx_id_key("transaction"),
                id_generator(Arc::new(|| "fixed".to_string())),
                sink(mem),
            ],
        );
        assert_eq!(o.duration.unit, DurationUnit::Millis);
        assert_eq!(o.duration.key, "elapsed");
        assert_eq!(o.id_keys.conn, "connection");
        assert_eq!(o.id_keys.stmt, "statement");
        assert_eq!(o.id_keys.tx, "transaction");
        assert_eq!((o.id_gen)(), "fixed");
    }
}

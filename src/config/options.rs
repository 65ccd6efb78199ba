//! Per-operation options tree.
//!
//! One [`StepOptions`] leaf per proxied operation, grouped by resource kind.
//! Row-cursor steps appear twice: once under the connection (rows returned by
//! `Conn.QueryContext`) and once under the statement (rows returned by
//! `Stmt.Query*`).

use std::fmt;
use std::sync::Arc;

use crate::config::duration::DurationFormat;
use crate::config::format::{EventKind, MessageFormat};
use crate::config::overrides::Opt;
use crate::id::{default_id_gen, IdGenerator};
use crate::observability::{Attr, EventSink, Level, TracingSink};
use crate::protocol::DriverError;

/// Start level is derived from the complete level by this offset.
pub const START_LEVEL_OFFSET: i8 = -4;

/// Names of every logical step.
pub const STEP_NAMES: [&str; 23] = [
    "Open",
    "Driver.Open",
    "Driver.OpenConnector",
    "Connector.Connect",
    "Conn.Begin",
    "Conn.BeginTx",
    "Conn.Close",
    "Conn.ExecContext",
    "Conn.Ping",
    "Conn.Prepare",
    "Conn.PrepareContext",
    "Conn.QueryContext",
    "Conn.ResetSession",
    "Rows.Close",
    "Rows.Next",
    "Rows.NextResultSet",
    "Stmt.Close",
    "Stmt.Exec",
    "Stmt.ExecContext",
    "Stmt.Query",
    "Stmt.QueryContext",
    "Tx.Commit",
    "Tx.Rollback",
];

/// Classifies a backend error: `(success_like, extra attributes)`.
pub type ErrorHandler = Arc<dyn Fn(&DriverError) -> (bool, Vec<Attr>) + Send + Sync>;

/// Message and level of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOptions {
    pub msg: String,
    pub level: Level,
}

/// Configuration of one proxied operation.
#[derive(Clone)]
pub struct StepOptions {
    pub name: &'static str,
    pub start: EventOptions,
    pub error: EventOptions,
    pub complete: EventOptions,
    /// Without a handler every error is a failure.
    pub error_handler: Option<ErrorHandler>,
}

impl StepOptions {
    pub fn new(format: MessageFormat, name: &'static str, complete: Level) -> Self {
        Self {
            name,
            start: EventOptions {
                msg: format.message(name, EventKind::Start),
                level: complete.offset(START_LEVEL_OFFSET),
            },
            error: EventOptions {
                msg: format.message(name, EventKind::Error),
                level: Level::ERROR,
            },
            complete: EventOptions {
                msg: format.message(name, EventKind::Complete),
                level: complete,
            },
            error_handler: None,
        }
    }

    /// Set the complete level and derive the start level from it.
    /// The error level is left alone.
    pub fn set_level(&mut self, level: Level) {
        self.complete.level = level;
        self.start.level = level.offset(START_LEVEL_OFFSET);
    }

    /// Rewrite all three messages with `format`.
    pub fn set_messages(&mut self, format: MessageFormat) {
        self.start.msg = format.message(self.name, EventKind::Start);
        self.error.msg = format.message(self.name, EventKind::Error);
        self.complete.msg = format.message(self.name, EventKind::Complete);
    }

    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&DriverError) -> (bool, Vec<Attr>) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
    }

    fn with_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }
}

impl fmt::Debug for StepOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepOptions")
            .field("name", &self.name)
            .field("start", &self.start)
            .field("error", &self.error)
            .field("complete", &self.complete)
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

/// Handler treating errors matching `is_expected` as success, tagged `key=true`.
pub fn sentinel_handler(is_expected: fn(&DriverError) -> bool, key: &'static str) -> ErrorHandler {
    Arc::new(move |err: &DriverError| {
        if is_expected(err) {
            (true, vec![Attr::new(key, true)])
        } else {
            (false, Vec::new())
        }
    })
}

fn skip_handler() -> ErrorHandler {
    sentinel_handler(DriverError::is_skip, "skip")
}

fn eof_handler() -> ErrorHandler {
    sentinel_handler(DriverError::is_end_of_rows, "eof")
}

#[derive(Debug, Clone)]
pub struct DriverSteps {
    pub open: StepOptions,
    pub open_connector: StepOptions,
}

impl DriverSteps {
    fn new(format: MessageFormat) -> Self {
        Self {
            open: StepOptions::new(format, "Driver.Open", Level::INFO),
            open_connector: StepOptions::new(format, "Driver.OpenConnector", Level::INFO),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectorSteps {
    pub connect: StepOptions,
}

impl ConnectorSteps {
    fn new(format: MessageFormat) -> Self {
        Self {
            connect: StepOptions::new(format, "Connector.Connect", Level::INFO),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnSteps {
    pub begin: StepOptions,
    pub begin_tx: StepOptions,
    pub close: StepOptions,
    pub exec_context: StepOptions,
    pub ping: StepOptions,
    pub prepare: StepOptions,
    pub prepare_context: StepOptions,
    pub query_context: StepOptions,
    pub reset_session: StepOptions,
}

impl ConnSteps {
    fn new(format: MessageFormat) -> Self {
        Self {
            begin: StepOptions::new(format, "Conn.Begin", Level::INFO),
            begin_tx: StepOptions::new(format, "Conn.BeginTx", Level::INFO).with_handler(skip_handler()),
            close: StepOptions::new(format, "Conn.Close", Level::INFO),
            exec_context: StepOptions::new(format, "Conn.ExecContext", Level::INFO).with_handler(skip_handler()),
            ping: StepOptions::new(format, "Conn.Ping", Level::DEBUG),
            prepare: StepOptions::new(format, "Conn.Prepare", Level::INFO),
            prepare_context: StepOptions::new(format, "Conn.PrepareContext", Level::INFO)
                .with_handler(skip_handler()),
            query_context: StepOptions::new(format, "Conn.QueryContext", Level::INFO).with_handler(skip_handler()),
            reset_session: StepOptions::new(format, "Conn.ResetSession", Level::DEBUG)
                .with_handler(sentinel_handler(DriverError::is_bad_conn, "bad_conn")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowsSteps {
    pub close: StepOptions,
    pub next: StepOptions,
    pub next_result_set: StepOptions,
}

impl RowsSteps {
    fn new(format: MessageFormat) -> Self {
        Self {
            close: StepOptions::new(format, "Rows.Close", Level::DEBUG),
            next: StepOptions::new(format, "Rows.Next", Level::TRACE).with_handler(eof_handler()),
            next_result_set: StepOptions::new(format, "Rows.NextResultSet", Level::TRACE).with_handler(eof_handler()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StmtSteps {
    pub close: StepOptions,
    pub exec: StepOptions,
    pub exec_context: StepOptions,
    pub query: StepOptions,
    pub query_context: StepOptions,
}

impl StmtSteps {
    fn new(format: MessageFormat) -> Self {
        Self {
            close: StepOptions::new(format, "Stmt.Close", Level::INFO),
            exec: StepOptions::new(format, "Stmt.Exec", Level::INFO),
            exec_context: StepOptions::new(format, "Stmt.ExecContext", Level::INFO).with_handler(skip_handler()),
            query: StepOptions::new(format, "Stmt.Query", Level::INFO),
            query_context: StepOptions::new(format, "Stmt.QueryContext", Level::INFO).with_handler(skip_handler()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TxSteps {
    pub commit: StepOptions,
    pub rollback: StepOptions,
}

impl TxSteps {
    fn new(format: MessageFormat) -> Self {
        Self {
            commit: StepOptions::new(format, "Tx.Commit", Level::INFO),
            rollback: StepOptions::new(format, "Tx.Rollback", Level::INFO),
        }
    }
}

/// Attribute keys of the correlation ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdKeys {
    pub conn: String,
    pub stmt: String,
    pub tx: String,
}

impl Default for IdKeys {
    fn default() -> Self {
        Self {
            conn: "conn_id".to_string(),
            stmt: "stmt_id".to_string(),
            tx: "tx_id".to_string(),
        }
    }
}

/// The complete options tree.
#[derive(Clone)]
pub struct Options {
    /// Format the default messages were built with.
    pub format: MessageFormat,
    pub open: StepOptions,
    pub driver: DriverSteps,
    pub connector: ConnectorSteps,
    pub conn: ConnSteps,
    pub conn_rows: RowsSteps,
    pub stmt: StmtSteps,
    pub stmt_rows: RowsSteps,
    pub tx: TxSteps,
    pub duration: DurationFormat,
    pub id_keys: IdKeys,
    pub id_gen: IdGenerator,
    pub sink: Arc<dyn EventSink>,
}

impl Options {
    /// Default tree with messages built by `format`.
    pub fn new(format: MessageFormat) -> Self {
        Self {
            format,
            open: StepOptions::new(format, "Open", Level::INFO),
            driver: DriverSteps::new(format),
            connector: ConnectorSteps::new(format),
            conn: ConnSteps::new(format),
            conn_rows: RowsSteps::new(format),
            stmt: StmtSteps::new(format),
            stmt_rows: RowsSteps::new(format),
            tx: TxSteps::new(format),
            duration: DurationFormat::default(),
            id_keys: IdKeys::default(),
            id_gen: default_id_gen(),
            sink: Arc::new(TracingSink::default()),
        }
    }

    /// Default tree followed by `opts`, applied in order.
    pub fn build(format: MessageFormat, opts: impl IntoIterator<Item = Opt>) -> Self {
        let mut options = Self::new(format);
        options.apply(opts);
        options
    }

    pub fn apply(&mut self, opts: impl IntoIterator<Item = Opt>) {
        for opt in opts {
            opt(self);
        }
    }

    /// Every leaf of the tree.
    pub fn steps_mut(&mut self) -> Vec<&mut StepOptions> {
        vec![
            &mut self.open,
            &mut self.driver.open,
            &mut self.driver.open_connector,
            &mut self.connector.connect,
            &mut self.conn.begin,
            &mut self.conn.begin_tx,
            &mut self.conn.close,
            &mut self.conn.exec_context,
            &mut self.conn.ping,
            &mut self.conn.prepare,
            &mut self.conn.prepare_context,
            &mut self.conn.query_context,
            &mut self.conn.reset_session,
            &mut self.conn_rows.close,
            &mut self.conn_rows.next,
            &mut self.conn_rows.next_result_set,
            &mut self.stmt.close,
            &mut self.stmt.exec,
            &mut self.stmt.exec_context,
            &mut self.stmt.query,
            &mut self.stmt.query_context,
            &mut self.stmt_rows.close,
            &mut self.stmt_rows.next,
            &mut self.stmt_rows.next_result_set,
            &mut self.tx.commit,
            &mut self.tx.rollback,
        ]
    }

    /// Leaves named `name`; `Rows.*` names match two leaves.
    pub fn step_mut(&mut self, name: &str) -> Vec<&mut StepOptions> {
        self.steps_mut().into_iter().filter(|s| s.name == name).collect()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(MessageFormat::default())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("format", &self.format)
            .field("open", &self.open)
            .field("driver", &self.driver)
            .field("connector", &self.connector)
            .field("conn", &self.conn)
            .field("conn_rows", &self.conn_rows)
            .field("stmt", &self.stmt)
            .field("stmt_rows", &self.stmt_rows)
            .field("tx", &self.tx)
            .field("duration", &self.duration)
            .field("id_keys", &self.id_keys)
            .finish_non_exhaustive()
    }
}

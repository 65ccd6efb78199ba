//! Capability probing.
//!
//! A capability set is computed once, when a backend resource is wrapped, by
//! asking the backend's `as_*` accessors. Probing never calls a protocol
//! operation.

use std::fmt;

use crate::protocol::{Connection, Driver, DriverError, Rows, Statement};

/// An optional protocol extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DriverContext,
    BeginTx,
    PrepareContext,
    Pinger,
    SessionResetter,
    ExecerContext,
    QueryerContext,
    StmtExecContext,
    StmtQueryContext,
    NextResultSet,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::DriverContext,
        Capability::BeginTx,
        Capability::PrepareContext,
        Capability::Pinger,
        Capability::SessionResetter,
        Capability::ExecerContext,
        Capability::QueryerContext,
        Capability::StmtExecContext,
        Capability::StmtQueryContext,
        Capability::NextResultSet,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::DriverContext => "DriverContext",
            Capability::BeginTx => "ConnBeginTx",
            Capability::PrepareContext => "ConnPrepareContext",
            Capability::Pinger => "Pinger",
            Capability::SessionResetter => "SessionResetter",
            Capability::ExecerContext => "ExecerContext",
            Capability::QueryerContext => "QueryerContext",
            Capability::StmtExecContext => "StmtExecContext",
            Capability::StmtQueryContext => "StmtQueryContext",
            Capability::NextResultSet => "RowsNextResultSet",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`Capability`] values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    pub const fn empty() -> Self {
        CapabilitySet(0)
    }

    pub fn with(mut self, cap: Capability) -> Self {
        self.insert(cap);
        self
    }

    /// Add `cap` when `present` is true.
    pub fn with_if(self, cap: Capability, present: bool) -> Self {
        if present {
            self.with(cap)
        } else {
            self
        }
    }

    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    pub fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(CapabilitySet::empty(), CapabilitySet::with)
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

pub fn driver_capabilities(driver: &dyn Driver) -> CapabilitySet {
    CapabilitySet::empty().with_if(Capability::DriverContext, driver.as_driver_context().is_some())
}

pub fn conn_capabilities(conn: &mut dyn Connection) -> CapabilitySet {
    CapabilitySet::empty()
        .with_if(Capability::BeginTx, conn.as_begin_tx().is_some())
        .with_if(Capability::PrepareContext, conn.as_prepare_context().is_some())
        .with_if(Capability::Pinger, conn.as_pinger().is_some())
        .with_if(Capability::SessionResetter, conn.as_session_resetter().is_some())
        .with_if(Capability::ExecerContext, conn.as_execer_context().is_some())
        .with_if(Capability::QueryerContext, conn.as_queryer_context().is_some())
}

pub fn stmt_capabilities(stmt: &mut dyn Statement) -> CapabilitySet {
    CapabilitySet::empty()
        .with_if(Capability::StmtExecContext, stmt.as_exec_context().is_some())
        .with_if(Capability::StmtQueryContext, stmt.as_query_context().is_some())
}

pub fn rows_capabilities(rows: &mut dyn Rows) -> CapabilitySet {
    CapabilitySet::empty().with_if(Capability::NextResultSet, rows.as_next_result_set().is_some())
}

/// Error for a backend that stopped advertising an extension it had at wrap time.
pub(crate) fn vanished(cap: Capability) -> DriverError {
    DriverError::message(format!("driverlog: backend no longer implements {}", cap))
}

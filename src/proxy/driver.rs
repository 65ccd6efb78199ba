//! Root driver proxy.

use std::fmt;

use crate::protocol::{Connection, Connector, Driver, DriverContext, DriverResult};
use crate::proxy::capability::{driver_capabilities, vanished, Capability, CapabilitySet};
use crate::proxy::conn::LoggedConn;
use crate::proxy::connector::LoggedConnector;
use crate::proxy::Scope;

/// Instrumented [`Driver`]. Exposes [`DriverContext`] only if the backend does.
pub struct LoggedDriver {
    inner: Box<dyn Driver>,
    caps: CapabilitySet,
    scope: Scope,
}

impl LoggedDriver {
    pub fn new(inner: Box<dyn Driver>, scope: Scope) -> Self {
        let caps = driver_capabilities(inner.as_ref());
        Self { inner, caps, scope }
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.caps
    }
}

impl Driver for LoggedDriver {
    fn open(&self, dsn: &str) -> DriverResult<Box<dyn Connection>> {
        let scope = &self.scope;
        let (conn, child) = scope.run_child(&scope.options.driver.open, Vec::new(), &scope.options.id_keys.conn, || {
            self.inner.open(dsn)
        })?;
        Ok(LoggedConn::boxed(conn, child))
    }

    fn as_driver_context(&self) -> Option<&dyn DriverContext> {
        if self.caps.contains(Capability::DriverContext) {
            Some(self)
        } else {
            None
        }
    }
}

impl DriverContext for LoggedDriver {
    fn open_connector(&self, dsn: &str) -> DriverResult<Box<dyn Connector>> {
        let scope = &self.scope;
        let connector = scope.run(&scope.options.driver.open_connector, Vec::new(), || {
            match self.inner.as_driver_context() {
                Some(inner) => inner.open_connector(dsn),
                None => Err(vanished(Capability::DriverContext)),
            }
        })?;
        Ok(Box::new(LoggedConnector::new(connector, scope.clone())))
    }
}

impl fmt::Debug for LoggedDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedDriver")
            .field("caps", &self.caps)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

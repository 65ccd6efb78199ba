//! Connector proxies.

use crate::protocol::{CallContext, Connection, Connector, Driver, DriverResult};
use crate::proxy::conn::LoggedConn;
use crate::proxy::Scope;

/// Instrumented [`Connector`].
pub struct LoggedConnector {
    inner: Box<dyn Connector>,
    scope: Scope,
}

impl LoggedConnector {
    pub fn new(inner: Box<dyn Connector>, scope: Scope) -> Self {
        Self { inner, scope }
    }
}

impl Connector for LoggedConnector {
    fn connect(&self, ctx: &CallContext) -> DriverResult<Box<dyn Connection>> {
        let scope = &self.scope;
        let (conn, child) =
            scope.run_child(&scope.options.connector.connect, Vec::new(), &scope.options.id_keys.conn, || {
                self.inner.connect(ctx)
            })?;
        Ok(LoggedConn::boxed(conn, child))
    }

    fn driver_name(&self) -> &str {
        self.inner.driver_name()
    }
}

/// Connector for drivers without `DriverContext`: every connect opens the
/// stored locator through the (already instrumented) driver.
pub struct DsnConnector {
    driver: Box<dyn Driver>,
    dsn: String,
    driver_name: String,
}

impl DsnConnector {
    pub fn new(driver: Box<dyn Driver>, dsn: impl Into<String>, driver_name: impl Into<String>) -> Self {
        Self {
            driver,
            dsn: dsn.into(),
            driver_name: driver_name.into(),
        }
    }
}

impl Connector for DsnConnector {
    fn connect(&self, _ctx: &CallContext) -> DriverResult<Box<dyn Connection>> {
        self.driver.open(&self.dsn)
    }

    fn driver_name(&self) -> &str {
        &self.driver_name
    }
}

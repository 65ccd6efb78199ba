//! Entry point: select a registered driver and return an instrumented connector.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{MessageFormat, Opt, Options};
use crate::observability::{step, Logger, StepError};
use crate::protocol::{Connector, DriverContext, DriverError, DriverRegistry};
use crate::proxy::{Capability, DsnConnector, LoggedDriver, Scope};

/// Errors from [`open`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("driverlog: unknown driver {0:?} (forgotten registration?)")]
    UnknownDriver(String),

    /// The backend rejected the locator; its error is passed through as-is.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl StepError for Error {
    fn driver_error(&self) -> Option<&DriverError> {
        match self {
            Error::Driver(e) => Some(e),
            Error::UnknownDriver(_) => None,
        }
    }
}

/// Open `driver_name` from `registry` with the default message format.
///
/// Returns an instrumented connector and the root logger, tagged with
/// `driver` and `dsn`, that every event of this connector inherits.
pub fn open(
    registry: &DriverRegistry,
    driver_name: &str,
    dsn: &str,
    opts: impl IntoIterator<Item = Opt>,
) -> Result<(Box<dyn Connector>, Logger), Error> {
    open_with_format(MessageFormat::default(), registry, driver_name, dsn, opts)
}

/// Like [`open`], building the default messages with `format`.
pub fn open_with_format(
    format: MessageFormat,
    registry: &DriverRegistry,
    driver_name: &str,
    dsn: &str,
    opts: impl IntoIterator<Item = Opt>,
) -> Result<(Box<dyn Connector>, Logger), Error> {
    open_with_options(Options::build(format, opts), registry, driver_name, dsn)
}

/// Like [`open`], with a fully built options tree.
pub fn open_with_options(
    options: Options,
    registry: &DriverRegistry,
    driver_name: &str,
    dsn: &str,
) -> Result<(Box<dyn Connector>, Logger), Error> {
    let options = Arc::new(options);
    let logger = Logger::new(Arc::clone(&options.sink))
        .with("driver", driver_name.to_string())
        .with("dsn", dsn.to_string());
    let scope = Scope::new(logger.clone(), Arc::clone(&options));

    let connector = step::exec(&logger, &options.open, &options.duration, Vec::new(), || {
        let backend = registry
            .get(driver_name)
            .ok_or_else(|| Error::UnknownDriver(driver_name.to_string()))?;
        let driver = LoggedDriver::new(backend, scope);
        let connector: Box<dyn Connector> = if driver.capabilities().contains(Capability::DriverContext) {
            driver.open_connector(dsn)?
        } else {
            tracing::debug!(driver = %driver_name, "Driver has no connector support, opening by locator");
            Box::new(DsnConnector::new(Box::new(driver), dsn, driver_name))
        };
        Ok::<_, Error>(connector)
    })?;

    Ok((connector, logger))
}

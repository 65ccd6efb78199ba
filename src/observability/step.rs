//! Step execution.
//!
//! Every proxied call runs through [`exec`] or [`exec_with_sideband`]:
//!
//! ```text
//! start event → work() → elapsed → classify → error event | complete event
//! ```
//!
//! The error returned by the work closure is always handed back unchanged.

use std::fmt;
use std::time::Instant;

use crate::config::{DurationFormat, StepOptions};
use crate::observability::attr::Attr;
use crate::observability::logger::Logger;
use crate::observability::metrics;
use crate::protocol::DriverError;

/// Attribute key carrying the error text on error events.
pub const ERROR_KEY: &str = "error";

/// Errors a step can observe. Classifiers only see protocol errors.
pub trait StepError: fmt::Display {
    fn driver_error(&self) -> Option<&DriverError>;
}

impl StepError for DriverError {
    fn driver_error(&self) -> Option<&DriverError> {
        Some(self)
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    /// The call failed but the step's classifier treats the error as expected.
    Classified,
    Failure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Classified => "classified",
            Outcome::Failure => "failure",
        }
    }

    pub fn is_success_like(self) -> bool {
        self != Outcome::Failure
    }
}

/// Run `work` as one instrumented step.
pub fn exec<T, E, F>(logger: &Logger, step: &StepOptions, duration: &DurationFormat, attrs: Vec<Attr>, work: F) -> Result<T, E>
where
    E: StepError,
    F: FnOnce() -> Result<T, E>,
{
    exec_with_sideband(logger, step, duration, attrs, || work().map(|value| (value, None)))
}

/// Run `work` as one instrumented step; the optional attribute it returns on
/// success is attached to the complete event only.
pub fn exec_with_sideband<T, E, F>(
    logger: &Logger,
    step: &StepOptions,
    duration: &DurationFormat,
    mut attrs: Vec<Attr>,
    work: F,
) -> Result<T, E>
where
    E: StepError,
    F: FnOnce() -> Result<(T, Option<Attr>), E>,
{
    logger.log(step.start.level, &step.start.msg, &attrs);

    let started = Instant::now();
    let result = work();
    let elapsed = started.elapsed();

    let (outcome, extra) = classify(step, &result);
    attrs.push(duration.attr(elapsed));
    metrics::record_step(step.name, outcome, elapsed);

    match result {
        Ok((value, sideband)) => {
            attrs.extend(sideband);
            logger.log(step.complete.level, &step.complete.msg, &attrs);
            Ok(value)
        }
        Err(err) => {
            if outcome == Outcome::Failure {
                attrs.push(Attr::new(ERROR_KEY, err.to_string()));
                attrs.extend(extra);
                logger.log(step.error.level, &step.error.msg, &attrs);
            } else {
                attrs.extend(extra);
                logger.log(step.complete.level, &step.complete.msg, &attrs);
            }
            Err(err)
        }
    }
}

fn classify<T, E: StepError>(step: &StepOptions, result: &Result<T, E>) -> (Outcome, Vec<Attr>) {
    let err = match result {
        Ok(_) => return (Outcome::Success, Vec::new()),
        Err(err) => err,
    };
    match (&step.error_handler, err.driver_error()) {
        (Some(handler), Some(driver_err)) => {
            let (success_like, extra) = handler(driver_err);
            if success_like {
                (Outcome::Classified, extra)
            } else {
                (Outcome::Failure, extra)
            }
        }
        _ => (Outcome::Failure, Vec::new()),
    }
}

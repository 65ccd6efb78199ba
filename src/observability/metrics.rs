//! Step metrics.
//!
//! # Metrics
//! - `driverlog_steps_total` (counter): proxied operations by step and outcome
//! - `driverlog_step_duration_seconds` (histogram): backend call latency by step
//!
//! Recorded through the `metrics` facade; without an installed recorder every
//! call is a no-op.

use std::time::Duration;

use crate::observability::step::Outcome;

pub const STEPS_TOTAL: &str = "driverlog_steps_total";
pub const STEP_DURATION_SECONDS: &str = "driverlog_step_duration_seconds";

/// Record one completed step.
pub fn record_step(step: &'static str, outcome: Outcome, elapsed: Duration) {
    ::metrics::counter!(STEPS_TOTAL, "step" => step, "outcome" => outcome.as_str()).increment(1);
    ::metrics::histogram!(STEP_DURATION_SECONDS, "step" => step).record(elapsed.as_secs_f64());
}

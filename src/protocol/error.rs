//! Errors reported by backends.

use thiserror::Error;

/// Result alias for backend calls.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors a backend returns through the protocol.
///
/// The sentinel variants carry protocol meaning; the proxy classifies them
/// but always hands the original value back to the caller.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The fast path is not available; the caller should use the fallback path.
    #[error("driver: skip fast-path; continue as if unimplemented")]
    Skip,

    /// The connection is unusable and should be discarded.
    #[error("driver: bad connection")]
    BadConn,

    /// The row cursor has no more rows.
    #[error("end of rows")]
    EndOfRows,

    /// A backend-specific failure described by text.
    #[error("{0}")]
    Message(String),

    /// A backend-specific failure carrying its own error type.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl DriverError {
    /// Build a textual backend error.
    pub fn message(msg: impl Into<String>) -> Self {
        DriverError::Message(msg.into())
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, DriverError::Skip)
    }

    pub fn is_bad_conn(&self) -> bool {
        matches!(self, DriverError::BadConn)
    }

    pub fn is_end_of_rows(&self) -> bool {
        matches!(self, DriverError::EndOfRows)
    }
}

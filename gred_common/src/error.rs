//! Error types for diff operations.

use thiserror::Error;

/// Errors that can abort a diff search.
///
/// The search itself produces no recoverable errors: infeasible vertex
/// pairs are priced as forbidden and pruned, not reported.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The running check requested a stop; no partial result is returned.
    #[error("diff cancelled: {0}")]
    Cancelled(&'static str),

    /// An internal invariant was violated. This is a programming error.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl DiffError {
    pub fn stop_requested() -> Self {
        DiffError::Cancelled("stop requested")
    }

    pub fn deadline_exceeded() -> Self {
        DiffError::Cancelled("deadline exceeded")
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        DiffError::Invariant(msg.into())
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, DiffError::Cancelled(_))
    }
}

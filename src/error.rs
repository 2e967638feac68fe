//! Error types reported by handler invocations.
//!
//! The dispatcher distinguishes two outcomes of a handler run that are *not*
//! errors — normal delivery and a veto (see [`Verdict`](crate::Verdict)) —
//! from genuine failures, which are represented by [`HandlerError`].
//!
//! A failing handler never aborts the dispatch: the error is caught at the
//! invocation boundary, reported through `tracing`, and delivery continues
//! with the remaining handlers.

use thiserror::Error;

/// # Failure raised by a single handler invocation.
///
/// Contained per-handler: nothing under dispatch aborts sibling handlers,
/// other priority buckets, or the strategy's own processing loop. Producers
/// never observe these; the only visible effect is a missing notification
/// plus a diagnostic record.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler returned an application-level error.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Handler panicked; the panic was caught at the invocation boundary.
    #[error("handler panicked: {message}")]
    Panicked {
        /// Panic payload, when it carried a string.
        message: String,
    },

    /// The erased event payload did not downcast to the handler's event type.
    ///
    /// Registration goes through a typed API, so this arm is unreachable in
    /// practice; it exists so the erased invocation path has no panic.
    #[error("event payload is not a {expected}")]
    TypeMismatch {
        /// Type name the handler was registered against.
        expected: &'static str,
    },
}

impl HandlerError {
    /// Builds a [`HandlerError::Failed`] from any displayable error.
    ///
    /// # Example
    /// ```
    /// use priobus::HandlerError;
    ///
    /// let err = HandlerError::fail("connection refused");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Failed { error: error.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::TypeMismatch { .. } => "handler_type_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("failed: {error}"),
            HandlerError::Panicked { message } => format!("panicked: {message}"),
            HandlerError::TypeMismatch { expected } => {
                format!("payload is not a {expected}")
            }
        }
    }
}

//! Run state and persistence error types.

/// Specific error conditions for run state tracking and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StateErrorKind {
    /// Segment index does not refer to a tracked segment
    #[display("Segment index {} out of range (run has {} segments)", index, len)]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of tracked segments
        len: usize,
    },
    /// Requested status change violates the segment state machine
    #[display("Illegal status transition from {} to {}", from, to)]
    IllegalTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// Durable store read or write failed
    #[display("Persistence failed: {}", _0)]
    Persistence(String),
    /// State snapshot could not be serialized or deserialized
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
}

/// Error type for run state operations.
///
/// Persistence failures are non-fatal by policy: callers log them and
/// continue with best-effort in-memory state. Index and transition errors
/// indicate caller bugs and are surfaced.
///
/// # Examples
///
/// ```
/// use vignette_error::{StateError, StateErrorKind};
///
/// let err = StateError::new(StateErrorKind::IndexOutOfRange { index: 7, len: 3 });
/// assert!(format!("{}", err).contains("out of range"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("State Error: {} at line {} in {}", kind, line, file)]
pub struct StateError {
    /// The specific error condition
    pub kind: StateErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StateError {
    /// Create a new StateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

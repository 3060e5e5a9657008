//! Run record and identifier types.

use crate::{Segment, SegmentStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Time-derived identifier for one generation session.
///
/// Assigned at run creation and immutable thereafter. The format matches
/// `YYYYMMDD_HHMMSS` in UTC, which doubles as the run's storage namespace.
///
/// # Examples
///
/// ```
/// use vignette_core::RunId;
///
/// let id = RunId::now();
/// assert_eq!(id.as_str().len(), 15);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Derive a fresh identifier from the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now().format("%Y%m%d_%H%M%S").to_string())
    }

    /// The identifier as a path-safe string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One entry in a run's append-only error log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Human-readable error message
    pub message: String,
    /// RFC 3339 timestamp of when the error was logged
    pub timestamp: String,
}

impl ErrorEntry {
    /// Create an entry stamped with the current UTC time.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// One end-to-end generation session over one set of input documents.
///
/// Created once at run start and mutated throughout by the orchestrator,
/// the asset pipeline, and the feedback handler. Segment insertion order is
/// narrative order and is significant. The error log is append-only and
/// `has_error` is monotonic: once set it is never cleared within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Unique, time-derived identifier
    pub run_id: RunId,
    /// Story title supplied by the caller
    pub title: String,
    /// RFC 3339 creation timestamp, fixed at creation
    pub created_at: String,
    /// Ordered narrative segments
    pub segments: Vec<Segment>,
    /// Append-only error log
    pub error_log: Vec<ErrorEntry>,
    /// Whether any unrecoverable error occurred
    pub has_error: bool,
}

impl Run {
    /// Create a new run with a fresh time-derived identifier.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            run_id: RunId::now(),
            title: title.into(),
            created_at: Utc::now().to_rfc3339(),
            segments: Vec::new(),
            error_log: Vec::new(),
            has_error: false,
        }
    }

    /// Number of segments that reached `Completed`.
    pub fn completed_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.status == SegmentStatus::Completed)
            .count()
    }

    /// Indices of segments currently in `Failed`.
    pub fn failed_indices(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SegmentStatus::Failed)
            .map(|(i, _)| i)
            .collect()
    }
}

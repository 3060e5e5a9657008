//! Segmentation error types.

/// Specific error conditions for turning source text into narrative segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SegmenterErrorKind {
    /// Combined input text is empty after trimming whitespace
    #[display("No usable source text: combined input is empty after trimming")]
    EmptyInput,
    /// The completion call itself failed
    #[display("Segment generation failed: {}", _0)]
    Generation(String),
    /// The completion succeeded but yielded zero usable candidates
    #[display("No segments were generated from the completion output")]
    NoCandidates,
}

/// Error type for segmentation operations.
///
/// Segmentation failures are fatal to a run: they occur before any
/// per-segment work begins.
///
/// # Examples
///
/// ```
/// use vignette_error::{SegmenterError, SegmenterErrorKind};
///
/// let err = SegmenterError::new(SegmenterErrorKind::EmptyInput);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Segmenter Error: {} at line {} in {}", kind, line, file)]
pub struct SegmenterError {
    /// The specific error condition
    pub kind: SegmenterErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SegmenterError {
    /// Create a new SegmenterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SegmenterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

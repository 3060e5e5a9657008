//! Per-stage asset generation error types.

/// Specific error conditions for the per-segment asset stages.
///
/// Each variant names the stage that failed and carries the collaborator's
/// failure message. Stage failures are isolated to one segment and never
/// abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StageErrorKind {
    /// Scratch namespace for segment artifacts could not be prepared
    #[display("Scratch setup failed: {}", _0)]
    Scratch(String),
    /// Visual prompt synthesis failed
    #[display("Prompt generation failed: {}", _0)]
    PromptGeneration(String),
    /// Image generation or retrieval failed
    #[display("Image generation failed: {}", _0)]
    ImageGeneration(String),
    /// Voice synthesis or audio write failed
    #[display("Audio generation failed: {}", _0)]
    AudioGeneration(String),
    /// Video render failed
    #[display("Video render failed: {}", _0)]
    VideoRender(String),
}

impl StageErrorKind {
    /// Short name of the failed stage, used in error log entries.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Scratch(_) => "scratch",
            Self::PromptGeneration(_) => "prompt",
            Self::ImageGeneration(_) => "image",
            Self::AudioGeneration(_) => "audio",
            Self::VideoRender(_) => "video",
        }
    }
}

/// Error type for asset pipeline stage failures.
///
/// # Examples
///
/// ```
/// use vignette_error::{StageError, StageErrorKind};
///
/// let err = StageError::new(StageErrorKind::ImageGeneration("timeout".into()));
/// assert_eq!(err.kind.stage(), "image");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Stage Error: {} at line {} in {}", kind, line, file)]
pub struct StageError {
    /// The specific error condition
    pub kind: StageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StageError {
    /// Create a new StageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

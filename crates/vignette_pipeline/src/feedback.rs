//! Reviewer feedback and segment regeneration.

use crate::pipeline::AssetPipeline;
use std::path::Path;
use tracing::{info, instrument};
use vignette_core::Feedback;
use vignette_error::VignetteResult;
use vignette_state::RunTracker;

/// Folds reviewer feedback into a run and drives regeneration.
pub struct FeedbackHandler<'a> {
    pipeline: &'a AssetPipeline,
}

impl<'a> FeedbackHandler<'a> {
    /// Creates a handler over the pipeline that will rebuild re-armed
    /// segments.
    pub fn new(pipeline: &'a AssetPipeline) -> Self {
        Self { pipeline }
    }

    /// Attach feedback to the segment at `index`.
    ///
    /// Returns `true` when the segment was re-armed for regeneration; the
    /// caller follows up with [`FeedbackHandler::regenerate`].
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` does not refer to a tracked
    /// segment.
    pub fn add_feedback(
        &self,
        tracker: &mut RunTracker,
        index: usize,
        feedback: Feedback,
    ) -> VignetteResult<bool> {
        tracker.add_feedback(index, feedback)
    }

    /// Drive a re-armed segment back through the asset stages.
    ///
    /// A reviewer-revised prompt in the stored feedback takes precedence
    /// over fresh prompt synthesis.
    ///
    /// # Errors
    ///
    /// Propagates stage failures; the segment is left in `Failed` and the
    /// failure is recorded in the run error log.
    #[instrument(skip(self, tracker, reference_image, voice_id), fields(index))]
    pub async fn regenerate(
        &self,
        tracker: &mut RunTracker,
        index: usize,
        reference_image: &Path,
        voice_id: &str,
    ) -> VignetteResult<()> {
        info!(index, "Regenerating segment from feedback");
        self.pipeline
            .process_segment(tracker, index, reference_image, voice_id)
            .await
    }
}

//! Narrative segmentation of case-document text.

use std::sync::Arc;
use tracing::{debug, instrument, warn};
use vignette_error::{SegmenterError, SegmenterErrorKind, VignetteResult};
use vignette_interface::TextCompletion;

/// Number of segments a documentary run targets by default.
pub const DEFAULT_SEGMENT_COUNT: usize = 10;

/// Placeholder text for padded segments when the completion call returned
/// fewer candidates than the target count.
pub const SEGMENT_PLACEHOLDER: &str = "[Segment content to be generated]";

const WRITER_INSTRUCTION: &str = "You are a true crime documentary writer. \
Create one-minute segments that tell a compelling story. \
Each segment should be self-contained and dramatically paced.";

/// Splits combined document text into narrative segments.
///
/// A single completion call yields candidate segments on blank-line
/// boundaries; the result is padded with [`SEGMENT_PLACEHOLDER`] or
/// truncated so the caller always receives exactly the target count.
pub struct Segmenter {
    completion: Arc<dyn TextCompletion>,
}

impl Segmenter {
    /// Creates a segmenter over the given completion collaborator.
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    /// Produce exactly `target_count` narrative segments from the combined text.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` when the trimmed input is empty.
    /// - `Generation` when the completion call fails.
    /// - `NoCandidates` when the completion returned no non-empty candidates.
    #[instrument(skip(self, combined_text), fields(input_len = combined_text.len(), target_count))]
    pub async fn segment(
        &self,
        combined_text: &str,
        target_count: usize,
    ) -> VignetteResult<Vec<String>> {
        let combined_text = combined_text.trim();
        if combined_text.is_empty() {
            return Err(SegmenterError::new(SegmenterErrorKind::EmptyInput).into());
        }

        let user_text = format!(
            "Create {target_count} one-minute segments from this story: {combined_text}"
        );
        let output = self
            .completion
            .complete(WRITER_INSTRUCTION, &user_text)
            .await
            .map_err(|e| {
                SegmenterError::new(SegmenterErrorKind::Generation(e.to_string()))
            })?;

        let segments = normalize(&output, target_count)?;
        debug!(count = segments.len(), "Segmentation complete");
        Ok(segments)
    }
}

/// Split completion output on blank-line boundaries and force the result to
/// exactly `target_count` entries.
fn normalize(output: &str, target_count: usize) -> VignetteResult<Vec<String>> {
    let mut segments: Vec<String> = output
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() {
        return Err(SegmenterError::new(SegmenterErrorKind::NoCandidates).into());
    }

    if segments.len() < target_count {
        warn!(
            candidates = segments.len(),
            target_count, "Padding short segmentation with placeholders"
        );
        segments.resize(target_count, SEGMENT_PLACEHOLDER.to_string());
    } else if segments.len() > target_count {
        warn!(
            candidates = segments.len(),
            target_count, "Truncating long segmentation"
        );
        segments.truncate(target_count);
    }

    Ok(segments)
}

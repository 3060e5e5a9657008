//! Visual prompt synthesis for segment imagery.

use std::sync::Arc;
use tracing::{debug, instrument};
use vignette_error::{StageError, StageErrorKind, VignetteResult};
use vignette_interface::TextCompletion;

const PROMPT_INSTRUCTION: &str = "You are a Stable Diffusion prompt engineer. \
Create detailed prompts that will generate consistent, dramatic true crime \
documentary scenes. Focus on mood, lighting, and composition.";

/// Synthesizes one image-generation prompt per segment.
///
/// The prompt is generated exactly once per segment pass and reused by the
/// image stage; regeneration with a reviewer-revised prompt skips this call
/// entirely.
pub struct PromptSynthesizer {
    completion: Arc<dyn TextCompletion>,
}

impl PromptSynthesizer {
    /// Creates a synthesizer over the given completion collaborator.
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    /// Generate a visual prompt for one segment's narration text.
    ///
    /// # Errors
    ///
    /// Returns a `PromptGeneration` stage error when the completion call
    /// fails or produces only whitespace.
    #[instrument(skip(self, segment_text), fields(text_len = segment_text.len()))]
    pub async fn synthesize_prompt(&self, segment_text: &str) -> VignetteResult<String> {
        let user_text =
            format!("Create a cinematic SD prompt for this scene: {segment_text}");
        let prompt = self
            .completion
            .complete(PROMPT_INSTRUCTION, &user_text)
            .await
            .map_err(|e| {
                StageError::new(StageErrorKind::PromptGeneration(e.to_string()))
            })?;

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StageError::new(StageErrorKind::PromptGeneration(
                "completion returned an empty prompt".to_string(),
            ))
            .into());
        }

        debug!(prompt_len = prompt.len(), "Synthesized visual prompt");
        Ok(prompt.to_string())
    }
}

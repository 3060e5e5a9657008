//! Trait definitions for external generation collaborators.

use crate::ImageRequest;
use async_trait::async_trait;
use std::path::Path;
use vignette_core::RenderSpec;
use vignette_error::VignetteResult;

/// Text-completion capability used by segmentation and prompt synthesis.
///
/// Implementations send one system instruction plus one user text and return
/// the completion as plain text. Errors surface as a single failure signal;
/// callers decide whether a failure is fatal to the run or isolated to one
/// segment.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Complete `user_text` under `system_instruction` and return the text.
    async fn complete(&self, system_instruction: &str, user_text: &str)
    -> VignetteResult<String>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4-turbo-preview").
    fn model_name(&self) -> &str;
}

/// Image generation from a visual prompt plus a character-reference image.
///
/// Implementations resolve any intermediate artifact reference (such as a
/// result URL) themselves and return the fetched image bytes.
#[async_trait]
pub trait ImageGeneration: Send + Sync {
    /// Generate one image for the request and return its bytes.
    async fn generate_image(&self, request: &ImageRequest) -> VignetteResult<Vec<u8>>;
}

/// Voice synthesis for segment narration.
#[async_trait]
pub trait VoiceSynthesis: Send + Sync {
    /// Synthesize `text` with the given voice identity and return audio bytes.
    async fn synthesize(&self, text: &str, voice_id: &str) -> VignetteResult<Vec<u8>>;
}

/// Video rendering from one image artifact and one audio artifact.
///
/// Produces a single clip at `output` per the render spec: fixed portrait
/// geometry with a continuous slow zoom and the audio track muxed in.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    /// Render the image/audio pair into a video clip at `output`.
    async fn render(
        &self,
        image: &Path,
        audio: &Path,
        output: &Path,
        spec: &RenderSpec,
    ) -> VignetteResult<()>;
}

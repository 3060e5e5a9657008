//! Local ffmpeg clip renderer.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, error, instrument};
use vignette_core::RenderSpec;
use vignette_error::{StageError, StageErrorKind, VignetteResult};
use vignette_interface::VideoRenderer;

/// Renders a still image plus narration audio into one video clip.
///
/// Invokes the `ffmpeg` binary on PATH: the image is looped under a slow
/// continuous zoom, scaled to portrait geometry, and muxed with the audio
/// track. Output duration follows the audio (`-shortest`).
#[derive(Debug, Clone, Default)]
pub struct FfmpegRenderer;

impl FfmpegRenderer {
    /// Creates a new renderer.
    pub fn new() -> Self {
        Self
    }

    fn render_args(image: &Path, audio: &Path, output: &Path, spec: &RenderSpec) -> Vec<String> {
        let filter = format!("{},{}", spec.zoompan_filter(), spec.scale_filter());
        vec![
            "-y".into(),
            "-loop".into(),
            "1".into(),
            "-i".into(),
            image.to_string_lossy().into_owned(),
            "-i".into(),
            audio.to_string_lossy().into_owned(),
            "-vf".into(),
            filter,
            "-c:v".into(),
            "libx264".into(),
            "-c:a".into(),
            "aac".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-r".into(),
            spec.fps.to_string(),
            "-shortest".into(),
            output.to_string_lossy().into_owned(),
        ]
    }
}

#[async_trait]
impl VideoRenderer for FfmpegRenderer {
    #[instrument(skip(self, spec), fields(output = %output.display()))]
    async fn render(
        &self,
        image: &Path,
        audio: &Path,
        output: &Path,
        spec: &RenderSpec,
    ) -> VignetteResult<()> {
        for (artifact, path) in [("image", image), ("audio", audio)] {
            if !path.exists() {
                return Err(StageError::new(StageErrorKind::VideoRender(format!(
                    "{artifact} artifact not found: {}",
                    path.display()
                )))
                .into());
            }
        }

        let args = Self::render_args(image, audio, output, spec);
        debug!(args = ?args, "Invoking ffmpeg");

        let result = tokio::process::Command::new("ffmpeg")
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                error!(error = ?e, "ffmpeg binary not found");
                StageError::new(StageErrorKind::VideoRender(format!(
                    "ffmpeg not found: {e}"
                )))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!(exit_code = ?result.status.code(), stderr = %stderr, "ffmpeg execution failed");
            return Err(StageError::new(StageErrorKind::VideoRender(format!(
                "ffmpeg failed (exit code {:?}): {stderr}",
                result.status.code()
            )))
            .into());
        }

        debug!("Rendered clip");
        Ok(())
    }
}

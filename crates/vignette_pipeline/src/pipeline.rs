//! Per-segment asset stage driver.

use crate::pacing::RateGate;
use crate::prompt::PromptSynthesizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use vignette_core::{RenderSpec, SegmentStatus, SegmentUpdate};
use vignette_error::{
    StageError, StageErrorKind, StateError, StateErrorKind, VignetteResult,
};
use vignette_interface::{
    ImageGeneration, ImageRequest, TextCompletion, VideoRenderer, VoiceSynthesis,
};
use vignette_state::RunTracker;

/// Drives one segment through its four asset stages.
///
/// Stages run strictly in order (prompt, image, audio, video) and every
/// transition is recorded through the tracker before the next stage begins,
/// so a crash mid-segment leaves an accurate durable record. A stage failure
/// moves the segment to `Failed`, appends to the run error log, and returns
/// the stage error; the orchestrator isolates it and continues with the next
/// segment.
pub struct AssetPipeline {
    prompts: PromptSynthesizer,
    images: Arc<dyn ImageGeneration>,
    voices: Arc<dyn VoiceSynthesis>,
    renderer: Arc<dyn VideoRenderer>,
    completion_gate: Arc<RateGate>,
    image_gate: Arc<RateGate>,
    voice_gate: Arc<RateGate>,
    scratch: PathBuf,
    spec: RenderSpec,
}

impl AssetPipeline {
    /// Creates a pipeline over the four collaborators, writing artifacts
    /// under `scratch`.
    pub fn new(
        completion: Arc<dyn TextCompletion>,
        images: Arc<dyn ImageGeneration>,
        voices: Arc<dyn VoiceSynthesis>,
        renderer: Arc<dyn VideoRenderer>,
        scratch: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prompts: PromptSynthesizer::new(completion),
            images,
            voices,
            renderer,
            completion_gate: Arc::new(RateGate::default()),
            image_gate: Arc::new(RateGate::default()),
            voice_gate: Arc::new(RateGate::default()),
            scratch: scratch.into(),
            spec: RenderSpec::default(),
        }
    }

    /// Replaces the render geometry.
    pub fn with_render_spec(mut self, spec: RenderSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Shares a completion gate with the caller (the segmenter uses the same
    /// collaborator class).
    pub fn with_completion_gate(mut self, gate: Arc<RateGate>) -> Self {
        self.completion_gate = gate;
        self
    }

    /// Replaces all three gates with fresh ones at the given delay.
    pub fn with_rate_delay(mut self, delay: Duration) -> Self {
        self.completion_gate = Arc::new(RateGate::new(delay));
        self.image_gate = Arc::new(RateGate::new(delay));
        self.voice_gate = Arc::new(RateGate::new(delay));
        self
    }

    /// The scratch directory artifacts are written under.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    /// Drive the segment at `index` from its current entry point to
    /// `Completed`.
    ///
    /// Entry points: `Pending` runs the full stage sequence;
    /// `NeedsRegeneration` re-enters at the prompt stage, where a
    /// reviewer-revised prompt takes precedence and skips synthesis.
    ///
    /// # Errors
    ///
    /// Returns the failing stage's error after recording it; the segment is
    /// left in `Failed`. Entry from any other status is rejected as an
    /// illegal transition.
    #[instrument(skip(self, tracker, reference_image, voice_id))]
    pub async fn process_segment(
        &self,
        tracker: &mut RunTracker,
        index: usize,
        reference_image: &Path,
        voice_id: &str,
    ) -> VignetteResult<()> {
        let len = tracker.run().segments.len();
        let segment = tracker
            .segment(index)
            .ok_or_else(|| StateError::new(StateErrorKind::IndexOutOfRange { index, len }))?;
        let status = segment.status;
        let text = segment.text.clone();
        let revised_prompt = segment
            .feedback
            .as_ref()
            .and_then(|f| f.revised_prompt.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        if let Err(e) = tokio::fs::create_dir_all(&self.scratch).await {
            return self.fail(
                tracker,
                index,
                StageErrorKind::Scratch(format!(
                    "could not create {}: {e}",
                    self.scratch.display()
                )),
            );
        }

        // Stage 1: visual prompt.
        let prompt = match (status, revised_prompt) {
            (SegmentStatus::NeedsRegeneration, Some(revised)) => {
                info!(index, "Reusing reviewer-revised prompt");
                tracker.update_segment(
                    index,
                    SegmentUpdate::builder()
                        .prompt(revised.clone())
                        .status(SegmentStatus::PromptReady)
                        .build(),
                )?;
                revised
            }
            (SegmentStatus::NeedsRegeneration | SegmentStatus::Pending, _) => {
                if status == SegmentStatus::NeedsRegeneration {
                    tracker.update_segment(index, SegmentUpdate::status(SegmentStatus::Pending))?;
                }
                self.completion_gate.wait().await;
                match self.prompts.synthesize_prompt(&text).await {
                    Ok(prompt) => {
                        tracker.update_segment(
                            index,
                            SegmentUpdate::builder()
                                .prompt(prompt.clone())
                                .status(SegmentStatus::PromptReady)
                                .build(),
                        )?;
                        prompt
                    }
                    Err(e) => {
                        return self.fail(
                            tracker,
                            index,
                            StageErrorKind::PromptGeneration(e.to_string()),
                        );
                    }
                }
            }
            (other, _) => {
                return Err(StateError::new(StateErrorKind::IllegalTransition {
                    from: other.to_string(),
                    to: SegmentStatus::PromptReady.to_string(),
                })
                .into());
            }
        };

        // Stage 2: image.
        self.image_gate.wait().await;
        let image_path = self.scratch.join(format!("image_{index}.png"));
        let image_result = async {
            let request = ImageRequest::builder()
                .prompt(prompt.clone())
                .reference_image(reference_image.to_path_buf())
                .width(self.spec.width)
                .height(self.spec.height)
                .build()
                .map_err(|e| e.to_string())?;
            let bytes = self
                .images
                .generate_image(&request)
                .await
                .map_err(|e| e.to_string())?;
            tokio::fs::write(&image_path, &bytes)
                .await
                .map_err(|e| format!("failed to write {}: {e}", image_path.display()))
        }
        .await;
        if let Err(cause) = image_result {
            return self.fail(tracker, index, StageErrorKind::ImageGeneration(cause));
        }
        tracker.update_segment(
            index,
            SegmentUpdate::builder()
                .image_path(image_path.clone())
                .status(SegmentStatus::ImageReady)
                .build(),
        )?;

        // Stage 3: narration audio.
        self.voice_gate.wait().await;
        let audio_path = self.scratch.join(format!("audio_{index}.mp3"));
        let audio_result = async {
            let bytes = self
                .voices
                .synthesize(&text, voice_id)
                .await
                .map_err(|e| e.to_string())?;
            tokio::fs::write(&audio_path, &bytes)
                .await
                .map_err(|e| format!("failed to write {}: {e}", audio_path.display()))
        }
        .await;
        if let Err(cause) = audio_result {
            return self.fail(tracker, index, StageErrorKind::AudioGeneration(cause));
        }
        tracker.update_segment(
            index,
            SegmentUpdate::builder()
                .audio_path(audio_path.clone())
                .status(SegmentStatus::AudioReady)
                .build(),
        )?;

        // Stage 4: rendered clip.
        let video_path = self.scratch.join(format!("segment_{index}.mp4"));
        if let Err(e) = self
            .renderer
            .render(&image_path, &audio_path, &video_path, &self.spec)
            .await
        {
            return self.fail(tracker, index, StageErrorKind::VideoRender(e.to_string()));
        }
        tracker.update_segment(
            index,
            SegmentUpdate::builder()
                .video_path(video_path)
                .status(SegmentStatus::VideoReady)
                .build(),
        )?;

        tracker.update_segment(index, SegmentUpdate::status(SegmentStatus::Completed))?;
        debug!(index, "Segment completed");
        Ok(())
    }

    /// Record a stage failure: error log entry, `Failed` status, and the
    /// stage error back to the caller.
    fn fail(
        &self,
        tracker: &mut RunTracker,
        index: usize,
        kind: StageErrorKind,
    ) -> VignetteResult<()> {
        let err = StageError::new(kind);
        error!(index, stage = err.kind.stage(), error = %err.kind, "Segment stage failed");
        tracker.log_error(format!(
            "Segment {index} {} stage failed: {}",
            err.kind.stage(),
            err.kind
        ));
        tracker.update_segment(index, SegmentUpdate::status(SegmentStatus::Failed))?;
        Err(err.into())
    }
}

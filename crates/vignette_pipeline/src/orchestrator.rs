//! End-to-end run orchestration.

use crate::pacing::RateGate;
use crate::pipeline::AssetPipeline;
use crate::segmenter::{DEFAULT_SEGMENT_COUNT, Segmenter};
use derive_builder::Builder;
use derive_getters::Getters;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use vignette_core::{RenderSpec, RunId};
use vignette_error::VignetteResult;
use vignette_interface::{
    ImageGeneration, RunObserver, TextCompletion, VideoRenderer, VoiceSynthesis,
};
use vignette_state::{RunStore, RunTracker};

/// Caller-supplied inputs for one documentary run.
#[derive(Debug, Clone, Builder, Getters)]
#[builder(setter(into))]
pub struct RunInput {
    /// Story title
    title: String,
    /// Combined plain text of all case documents
    document_text: String,
    /// Character-reference image for identity-consistent imagery
    reference_image: PathBuf,
    /// Narrator voice identifier
    voice_id: String,
}

impl RunInput {
    /// Creates a new builder for `RunInput`.
    pub fn builder() -> RunInputBuilder {
        RunInputBuilder::default()
    }
}

/// Summary of one completed (or aborted) run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// The run's identifier
    pub run_id: RunId,
    /// Total segments tracked
    pub segment_count: usize,
    /// Segments that reached `Completed`
    pub completed_count: usize,
    /// Indices of segments left in `Failed`
    pub failed_indices: Vec<usize>,
    /// Whether any error was logged during the run
    pub has_error: bool,
    /// Clip paths recorded for completed segments, in narrative order.
    ///
    /// These are historical: scratch is removed when the run ends, so the
    /// paths record where each clip was written, not files that still
    /// exist. Callers that need the clips copy them out through an
    /// observer before the run finishes.
    pub video_paths: Vec<PathBuf>,
}

/// Owns one documentary generation pass end to end.
///
/// Construction wires the collaborators together; [`RunOrchestrator::run`]
/// acquires a fresh tracker, segments the source text, drives each segment
/// through the asset pipeline with per-segment failure isolation, records
/// run metrics, and cleans up scratch artifacts on every exit path.
pub struct RunOrchestrator {
    segmenter: Segmenter,
    pipeline: AssetPipeline,
    completion_gate: Arc<RateGate>,
    store: RunStore,
    target_count: usize,
}

impl RunOrchestrator {
    /// Creates an orchestrator over the four collaborators.
    ///
    /// Artifacts are written under `scratch`; run state persists through
    /// `store`. The segmenter and prompt synthesizer share one completion
    /// gate since they call the same collaborator class.
    pub fn new(
        completion: Arc<dyn TextCompletion>,
        images: Arc<dyn ImageGeneration>,
        voices: Arc<dyn VoiceSynthesis>,
        renderer: Arc<dyn VideoRenderer>,
        store: RunStore,
        scratch: impl Into<PathBuf>,
    ) -> Self {
        let completion_gate = Arc::new(RateGate::default());
        let pipeline = AssetPipeline::new(
            Arc::clone(&completion),
            images,
            voices,
            renderer,
            scratch,
        )
        .with_completion_gate(Arc::clone(&completion_gate));
        Self {
            segmenter: Segmenter::new(completion),
            pipeline,
            completion_gate,
            store,
            target_count: DEFAULT_SEGMENT_COUNT,
        }
    }

    /// Overrides the number of segments a run targets.
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    /// Overrides the render geometry.
    pub fn with_render_spec(mut self, spec: RenderSpec) -> Self {
        self.pipeline = self.pipeline.with_render_spec(spec);
        self
    }

    /// Overrides the minimum spacing between collaborator calls.
    pub fn with_rate_delay(mut self, delay: Duration) -> Self {
        self.completion_gate = Arc::new(RateGate::new(delay));
        self.pipeline = self
            .pipeline
            .with_rate_delay(delay)
            .with_completion_gate(Arc::clone(&self.completion_gate));
        self
    }

    /// The asset pipeline, for feedback-driven regeneration.
    pub fn pipeline(&self) -> &AssetPipeline {
        &self.pipeline
    }

    /// Resume the tracker for a previously persisted run.
    pub fn resume_tracker(&self, run_id: &RunId) -> VignetteResult<RunTracker> {
        RunTracker::resume(run_id, self.store.clone())
    }

    /// Execute one run without observers.
    pub async fn run(&self, input: RunInput) -> VignetteResult<RunReport> {
        self.run_with_observers(input, Vec::new()).await
    }

    /// Execute one run, fanning mutation events out to the observers.
    ///
    /// # Errors
    ///
    /// Segmentation failure is fatal: it is logged and persisted, scratch
    /// is cleaned, and the error is returned before any segment work
    /// begins. Per-segment stage failures are isolated and never surface
    /// here; they appear in the report instead.
    #[instrument(skip(self, input, observers), fields(title = %input.title()))]
    pub async fn run_with_observers(
        &self,
        input: RunInput,
        observers: Vec<Box<dyn RunObserver>>,
    ) -> VignetteResult<RunReport> {
        let mut tracker = RunTracker::new(input.title().clone(), self.store.clone());
        for observer in observers {
            tracker = tracker.with_observer(observer);
        }
        info!(run_id = %tracker.run_id(), "Starting documentary run");

        self.completion_gate.wait().await;
        let segments = match self
            .segmenter
            .segment(input.document_text(), self.target_count)
            .await
        {
            Ok(segments) => segments,
            Err(e) => {
                tracker.log_error(format!("Segmentation failed: {e}"));
                self.cleanup_scratch().await;
                tracker.finish();
                return Err(e);
            }
        };

        for text in segments {
            let index = tracker.start_segment(text, "");
            if let Err(e) = self
                .pipeline
                .process_segment(
                    &mut tracker,
                    index,
                    input.reference_image(),
                    input.voice_id(),
                )
                .await
            {
                warn!(index, error = %e, "Segment failed; continuing with next segment");
            }
        }

        let completed_count = tracker.run().completed_count();
        let failed_count = tracker.run().failed_indices().len();
        tracker.log_metrics(BTreeMap::from([
            ("segment_count".to_string(), tracker.run().segments.len() as f64),
            ("completed_count".to_string(), completed_count as f64),
            ("failed_count".to_string(), failed_count as f64),
        ]));

        self.cleanup_scratch().await;
        tracker.finish();

        let run = tracker.run();
        let report = RunReport {
            run_id: run.run_id.clone(),
            segment_count: run.segments.len(),
            completed_count,
            failed_indices: run.failed_indices(),
            has_error: run.has_error,
            video_paths: run
                .segments
                .iter()
                .filter_map(|s| s.video_path.clone())
                .collect(),
        };
        info!(
            run_id = %report.run_id,
            completed = report.completed_count,
            failed = report.failed_indices.len(),
            "Documentary run finished"
        );
        Ok(report)
    }

    /// Best-effort scratch removal; failures are warnings, never escalated.
    async fn cleanup_scratch(&self) {
        match tokio::fs::remove_dir_all(self.pipeline.scratch_dir()).await {
            Ok(()) => debug!(dir = %self.pipeline.scratch_dir().display(), "Removed scratch directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(dir = %self.pipeline.scratch_dir().display(), error = %e, "Failed to clean up scratch directory");
            }
        }
    }
}

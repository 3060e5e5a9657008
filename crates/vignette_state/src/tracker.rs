//! Write-through run state tracker.

use crate::RunStore;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};
use vignette_core::{ErrorEntry, Feedback, Run, RunId, Segment, SegmentStatus, SegmentUpdate};
use vignette_error::{StateError, StateErrorKind, VignetteResult};
use vignette_interface::RunObserver;

/// Durable record of one generation session.
///
/// Owns the in-memory [`Run`], the backing [`RunStore`], and any registered
/// observers. Every mutating call ends with a full-state persist
/// (write-through, not write-behind): a crash between two segment stages
/// loses at most the in-flight stage's side effects, never prior committed
/// state.
///
/// Persistence failures are non-fatal by policy: they are logged with a
/// warning and the tracker continues with best-effort in-memory state.
/// Observer failures are likewise swallowed at this boundary.
pub struct RunTracker {
    run: Run,
    store: RunStore,
    observers: Vec<Box<dyn RunObserver>>,
    metrics: BTreeMap<String, f64>,
}

impl RunTracker {
    /// Create a tracker for a fresh run and persist its initial snapshot.
    pub fn new(title: impl Into<String>, store: RunStore) -> Self {
        let run = Run::new(title);
        info!(run_id = %run.run_id, "Started run tracking");
        let mut tracker = Self {
            run,
            store,
            observers: Vec::new(),
            metrics: BTreeMap::new(),
        };
        tracker.persist();
        tracker
    }

    /// Resume a tracker from a previously persisted snapshot.
    pub fn resume(run_id: &RunId, store: RunStore) -> VignetteResult<Self> {
        let run = store.load(run_id)?;
        info!(run_id = %run.run_id, segments = run.segments.len(), "Resumed run tracking");
        Ok(Self {
            run,
            store,
            observers: Vec::new(),
            metrics: BTreeMap::new(),
        })
    }

    /// Register an observer for mutation events.
    pub fn with_observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The tracked run.
    pub fn run(&self) -> &Run {
        &self.run
    }

    /// The run's identifier.
    pub fn run_id(&self) -> &RunId {
        &self.run.run_id
    }

    /// The segment at `index`, if tracked.
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.run.segments.get(index)
    }

    /// Append a new segment and return its ordinal index.
    ///
    /// Index assignment is monotonic and stable: once assigned, an index
    /// always refers to the same segment for the life of the run.
    #[instrument(skip(self, text, prompt))]
    pub fn start_segment(&mut self, text: impl Into<String>, prompt: impl Into<String>) -> usize {
        let segment = Segment::new(text, prompt);
        self.run.segments.push(segment);
        let index = self.run.segments.len() - 1;
        debug!(run_id = %self.run.run_id, index, "Started segment");

        self.notify(|o, run| o.segment_started(index, &run.segments[index]));
        self.persist();
        index
    }

    /// Apply a partial update to the segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` does not refer to a tracked
    /// segment, and `IllegalTransition` if the update's status change
    /// violates the segment state machine.
    #[instrument(skip(self, update), fields(run_id = %self.run.run_id, index))]
    pub fn update_segment(&mut self, index: usize, update: SegmentUpdate) -> VignetteResult<()> {
        let len = self.run.segments.len();
        let segment = self
            .run
            .segments
            .get_mut(index)
            .ok_or_else(|| StateError::new(StateErrorKind::IndexOutOfRange { index, len }))?;

        if let Some(status) = update.status {
            if !segment.status.can_advance_to(status) {
                return Err(StateError::new(StateErrorKind::IllegalTransition {
                    from: segment.status.to_string(),
                    to: status.to_string(),
                })
                .into());
            }
            debug!(from = %segment.status, to = %status, "Segment status transition");
            segment.status = status;
        }
        if let Some(prompt) = update.prompt {
            segment.prompt = prompt;
        }
        if let Some(path) = update.image_path {
            segment.image_path = Some(path);
        }
        if let Some(path) = update.audio_path {
            segment.audio_path = Some(path);
        }
        if let Some(path) = update.video_path {
            segment.video_path = Some(path);
        }

        self.notify(|o, run| o.segment_updated(index, &run.segments[index]));
        self.persist();
        Ok(())
    }

    /// Attach feedback to the segment at `index`.
    ///
    /// Returns `true` when the feedback's regeneration flag re-armed the
    /// segment (moved it from `Completed` to `NeedsRegeneration`). A
    /// regeneration flag on a segment that is not `Completed` is recorded
    /// but does not re-arm anything.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` does not refer to a tracked
    /// segment.
    #[instrument(skip(self, feedback), fields(run_id = %self.run.run_id, index))]
    pub fn add_feedback(&mut self, index: usize, feedback: Feedback) -> VignetteResult<bool> {
        let len = self.run.segments.len();
        let segment = self
            .run
            .segments
            .get_mut(index)
            .ok_or_else(|| StateError::new(StateErrorKind::IndexOutOfRange { index, len }))?;

        let rearmed = if feedback.needs_regeneration {
            if segment.status == SegmentStatus::Completed {
                segment.status = SegmentStatus::NeedsRegeneration;
                info!(index, "Segment re-armed for regeneration");
                true
            } else {
                warn!(index, status = %segment.status, "Regeneration requested for a segment that is not Completed; ignoring");
                false
            }
        } else {
            false
        };
        segment.feedback = Some(feedback);

        self.notify(|o, run| match run.segments[index].feedback.as_ref() {
            Some(feedback) => o.feedback_added(index, feedback),
            None => Ok(()),
        });
        self.persist();
        Ok(rearmed)
    }

    /// Append to the error log and mark the run as having errored.
    ///
    /// `has_error` is monotonic: it is never cleared within a run.
    #[instrument(skip(self, message), fields(run_id = %self.run.run_id))]
    pub fn log_error(&mut self, message: impl Into<String>) {
        let entry = ErrorEntry::new(message);
        let message = entry.message.clone();
        warn!(error = %message, "Run error logged");
        self.run.error_log.push(entry);
        self.run.has_error = true;

        self.notify(|o, _| o.error_logged(&message));
        if let Err(e) = self
            .store
            .save_errors(&self.run.run_id, &self.run.error_log)
        {
            warn!(error = %e, "Failed to persist error log; continuing in memory");
        }
        self.persist();
    }

    /// Record run-level metrics and persist them.
    pub fn log_metrics(&mut self, metrics: BTreeMap<String, f64>) {
        self.metrics.extend(metrics);
        if let Err(e) = self.store.save_metrics(&self.run.run_id, &self.metrics) {
            warn!(error = %e, "Failed to persist metrics; continuing in memory");
        }
    }

    /// Persist the current full state.
    ///
    /// Idempotent: calling twice with no intervening mutation writes
    /// byte-identical durable state. Safe to call repeatedly and after
    /// partial failures.
    pub fn save(&self) -> VignetteResult<()> {
        self.store.save_state(&self.run)?;
        for observer in &self.observers {
            if let Err(e) = observer.run_saved(&self.run) {
                warn!(error = %e, "Observer failed on run_saved; ignoring");
            }
        }
        Ok(())
    }

    /// Final best-effort save at run end.
    pub fn finish(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to save final run state");
        }
        info!(
            run_id = %self.run.run_id,
            segments = self.run.segments.len(),
            completed = self.run.completed_count(),
            has_error = self.run.has_error,
            "Run tracking finished"
        );
    }

    /// Write-through persist with the non-fatal failure policy.
    fn persist(&mut self) {
        if let Err(e) = self.store.save_state(&self.run) {
            warn!(run_id = %self.run.run_id, error = %e, "Failed to persist run state; continuing in memory");
        }
    }

    /// Fan a mutation event out to observers, swallowing their failures.
    fn notify<F>(&self, event: F)
    where
        F: Fn(
            &dyn RunObserver,
            &Run,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>,
    {
        for observer in &self.observers {
            if let Err(e) = event(observer.as_ref(), &self.run) {
                warn!(error = %e, "Observer failed; ignoring");
            }
        }
    }
}

//! Observer contract for run state mutation events.

use vignette_core::{Feedback, Run, Segment};

/// Result type for observer callbacks.
///
/// Observer failures are swallowed at the tracker boundary with a warning;
/// they never alter core behavior or fail core operations.
pub type ObserverResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Subscriber to run state mutation events.
///
/// An optional telemetry sink (experiment dashboard, metrics exporter)
/// implements this trait and is registered with the run tracker. Every
/// method has a no-op default, so sinks implement only the events they
/// care about.
pub trait RunObserver: Send + Sync {
    /// A new segment was appended at `index`.
    fn segment_started(&self, index: usize, segment: &Segment) -> ObserverResult {
        let _ = (index, segment);
        Ok(())
    }

    /// The segment at `index` was partially updated.
    fn segment_updated(&self, index: usize, segment: &Segment) -> ObserverResult {
        let _ = (index, segment);
        Ok(())
    }

    /// Feedback was attached to the segment at `index`.
    fn feedback_added(&self, index: usize, feedback: &Feedback) -> ObserverResult {
        let _ = (index, feedback);
        Ok(())
    }

    /// An error was appended to the run's error log.
    fn error_logged(&self, message: &str) -> ObserverResult {
        let _ = message;
        Ok(())
    }

    /// A full-state snapshot was persisted.
    fn run_saved(&self, run: &Run) -> ObserverResult {
        let _ = run;
        Ok(())
    }
}

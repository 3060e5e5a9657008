//! File-backed, run-scoped persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use vignette_core::{ErrorEntry, Run, RunId};
use vignette_error::{StateError, StateErrorKind, VignetteResult};

/// Run-scoped snapshot store rooted at a base directory.
///
/// Each run owns its own namespace keyed by `run_id`:
///
/// ```text
/// {base}/
/// └── 20260829_141503/
///     ├── state.json      full run snapshot
///     ├── errors.json     append-only error log
///     └── metrics.json    run-level metrics
/// ```
///
/// Writes go through a temp file followed by a rename, so a crash mid-write
/// never leaves a torn snapshot behind.
#[derive(Debug, Clone)]
pub struct RunStore {
    base_dir: PathBuf,
}

impl RunStore {
    /// Create a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> VignetteResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            std::fs::create_dir_all(&base_dir).map_err(|e| {
                StateError::new(StateErrorKind::Persistence(format!(
                    "Failed to create store directory {}: {}",
                    base_dir.display(),
                    e
                )))
            })?;
        }

        debug!(path = %base_dir.display(), "Initialized run store");
        Ok(Self { base_dir })
    }

    /// The storage namespace for a run.
    pub fn run_dir(&self, run_id: &RunId) -> PathBuf {
        self.base_dir.join(run_id.as_str())
    }

    /// Persist a full run snapshot to `{run_dir}/state.json`.
    ///
    /// Idempotent: the same run state always serializes to the same bytes.
    pub fn save_state(&self, run: &Run) -> VignetteResult<()> {
        let contents = serde_json::to_string_pretty(run).map_err(|e| {
            StateError::new(StateErrorKind::Serialization(format!(
                "Failed to serialize run snapshot: {}",
                e
            )))
        })?;
        self.write_atomic(&run.run_id, "state.json", contents.as_bytes())?;
        debug!(run_id = %run.run_id, segments = run.segments.len(), "Saved run snapshot");
        Ok(())
    }

    /// Persist the error log to `{run_dir}/errors.json`.
    pub fn save_errors(&self, run_id: &RunId, errors: &[ErrorEntry]) -> VignetteResult<()> {
        let contents = serde_json::to_string_pretty(errors).map_err(|e| {
            StateError::new(StateErrorKind::Serialization(format!(
                "Failed to serialize error log: {}",
                e
            )))
        })?;
        self.write_atomic(run_id, "errors.json", contents.as_bytes())
    }

    /// Persist run-level metrics to `{run_dir}/metrics.json`.
    pub fn save_metrics(
        &self,
        run_id: &RunId,
        metrics: &BTreeMap<String, f64>,
    ) -> VignetteResult<()> {
        let contents = serde_json::to_string_pretty(metrics).map_err(|e| {
            StateError::new(StateErrorKind::Serialization(format!(
                "Failed to serialize metrics: {}",
                e
            )))
        })?;
        self.write_atomic(run_id, "metrics.json", contents.as_bytes())
    }

    /// Load the persisted snapshot for `run_id`.
    pub fn load(&self, run_id: &RunId) -> VignetteResult<Run> {
        let path = self.run_dir(run_id).join("state.json");

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            StateError::new(StateErrorKind::Persistence(format!(
                "Failed to read snapshot {}: {}",
                path.display(),
                e
            )))
        })?;

        let run: Run = serde_json::from_str(&contents).map_err(|e| {
            StateError::new(StateErrorKind::Serialization(format!(
                "Failed to parse snapshot {}: {}",
                path.display(),
                e
            )))
        })?;

        debug!(run_id = %run_id, segments = run.segments.len(), "Loaded run snapshot");
        Ok(run)
    }

    /// Raw bytes of a persisted file, for idempotence checks and tooling.
    pub fn read_raw(&self, run_id: &RunId, filename: &str) -> VignetteResult<Vec<u8>> {
        let path = self.run_dir(run_id).join(filename);
        std::fs::read(&path).map_err(|e| {
            StateError::new(StateErrorKind::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    fn write_atomic(&self, run_id: &RunId, filename: &str, contents: &[u8]) -> VignetteResult<()> {
        let dir = self.run_dir(run_id);
        std::fs::create_dir_all(&dir).map_err(|e| {
            StateError::new(StateErrorKind::Persistence(format!(
                "Failed to create run directory {}: {}",
                dir.display(),
                e
            )))
        })?;

        let path = dir.join(filename);
        let temp_path = path.with_extension("tmp");

        std::fs::write(&temp_path, contents).map_err(|e| {
            StateError::new(StateErrorKind::Persistence(format!(
                "Failed to write {}: {}",
                temp_path.display(),
                e
            )))
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| {
            StateError::new(StateErrorKind::Persistence(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_core::Segment;

    #[test]
    fn snapshot_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let store = RunStore::new(temp.path()).unwrap();

        let mut run = Run::new("Cold Case");
        run.segments.push(Segment::new("The night began quietly.", ""));
        store.save_state(&run).unwrap();

        let loaded = store.load(&run.run_id).unwrap();
        assert_eq!(loaded, run);
    }

    #[test]
    fn repeated_saves_are_byte_identical() {
        let temp = tempfile::tempdir().unwrap();
        let store = RunStore::new(temp.path()).unwrap();

        let run = Run::new("Idempotent");
        store.save_state(&run).unwrap();
        let first = store.read_raw(&run.run_id, "state.json").unwrap();
        store.save_state(&run).unwrap();
        let second = store.read_raw(&run.run_id, "state.json").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_snapshot_is_a_persistence_error() {
        let temp = tempfile::tempdir().unwrap();
        let store = RunStore::new(temp.path()).unwrap();
        let missing = RunId::from("19990101_000000");
        assert!(store.load(&missing).is_err());
    }
}

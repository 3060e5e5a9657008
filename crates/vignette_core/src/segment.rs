//! Segment types and the per-segment status machine.

use crate::Feedback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Stage of a segment within the asset generation sequence.
///
/// Statuses move forward through the pipeline stages or sideways into
/// [`Failed`](SegmentStatus::Failed) / [`NeedsRegeneration`](SegmentStatus::NeedsRegeneration);
/// a segment is never silently skipped past a stage. Legality of a move is
/// encoded in [`SegmentStatus::can_advance_to`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumIter,
)]
pub enum SegmentStatus {
    /// No assets generated yet
    #[default]
    Pending,
    /// Visual prompt synthesized
    PromptReady,
    /// Image artifact generated and fetched
    ImageReady,
    /// Voiceover audio written
    AudioReady,
    /// Video clip rendered
    VideoReady,
    /// All stages done; no further automatic action
    Completed,
    /// A stage failed; progress for this segment stopped
    Failed,
    /// Feedback re-armed the segment for another pipeline pass
    NeedsRegeneration,
}

impl SegmentStatus {
    /// The next status in the forward stage sequence, if any.
    pub fn next_stage(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::PromptReady),
            Self::PromptReady => Some(Self::ImageReady),
            Self::ImageReady => Some(Self::AudioReady),
            Self::AudioReady => Some(Self::VideoReady),
            Self::VideoReady => Some(Self::Completed),
            Self::Completed | Self::Failed | Self::NeedsRegeneration => None,
        }
    }

    /// Whether this status accepts no further automatic stage work.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the status machine permits moving from `self` to `to`.
    ///
    /// Permitted moves:
    /// - one step forward along the stage sequence,
    /// - any non-terminal status into `Failed`,
    /// - `Completed` into `NeedsRegeneration` (feedback re-arm),
    /// - `NeedsRegeneration` back into `Pending` or `PromptReady` (re-entry).
    pub fn can_advance_to(self, to: Self) -> bool {
        if self.next_stage() == Some(to) {
            return true;
        }
        match (self, to) {
            (from, Self::Failed) => !from.is_terminal(),
            (Self::Completed, Self::NeedsRegeneration) => true,
            (Self::NeedsRegeneration, Self::Pending | Self::PromptReady) => true,
            _ => false,
        }
    }
}

/// One unit of narrative content and its derived artifacts.
///
/// `text` is immutable once assigned by segmentation; `prompt` is set by
/// synthesis and overwritten only on regeneration. Artifact paths point into
/// the run's scratch namespace and are exclusively owned by this segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Narrative text for roughly one spoken minute
    pub text: String,
    /// Visual generation prompt
    pub prompt: String,
    /// Generated image artifact, if any
    pub image_path: Option<PathBuf>,
    /// Generated voiceover artifact, if any
    pub audio_path: Option<PathBuf>,
    /// Rendered video clip, if any
    pub video_path: Option<PathBuf>,
    /// Human feedback attached after completion
    pub feedback: Option<Feedback>,
    /// Current pipeline stage
    pub status: SegmentStatus,
    /// Quality/timing measurements, ordered for deterministic snapshots
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
}

impl Segment {
    /// Create a new segment in `Pending` with the given narrative text and
    /// (possibly empty) prompt.
    pub fn new(text: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prompt: prompt.into(),
            image_path: None,
            audio_path: None,
            video_path: None,
            feedback: None,
            status: SegmentStatus::default(),
            metrics: BTreeMap::new(),
        }
    }
}

/// Partial update applied to a tracked segment.
///
/// Any subset of fields may be set; unset fields leave the segment
/// untouched.
///
/// # Examples
///
/// ```
/// use vignette_core::{SegmentStatus, SegmentUpdate};
///
/// let update = SegmentUpdate::builder()
///     .image_path("scratch/image_0.png")
///     .status(SegmentStatus::ImageReady)
///     .build();
/// assert!(update.prompt.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, derive_builder::Builder)]
#[builder(
    setter(into, strip_option),
    default,
    build_fn(private, name = "fallible_build")
)]
pub struct SegmentUpdate {
    /// Replacement visual prompt
    pub prompt: Option<String>,
    /// Image artifact location
    pub image_path: Option<PathBuf>,
    /// Audio artifact location
    pub audio_path: Option<PathBuf>,
    /// Video artifact location
    pub video_path: Option<PathBuf>,
    /// Requested status transition
    pub status: Option<SegmentStatus>,
}

impl SegmentUpdate {
    /// Start building a partial update.
    pub fn builder() -> SegmentUpdateBuilder {
        SegmentUpdateBuilder::default()
    }

    /// An update that only moves the segment's status.
    pub fn status(status: SegmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl SegmentUpdateBuilder {
    /// Build the update. All fields are defaulted, so this cannot fail.
    pub fn build(&self) -> SegmentUpdate {
        self.fallible_build()
            .expect("SegmentUpdate fields are all defaulted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn forward_chain_is_legal() {
        let chain = [
            SegmentStatus::Pending,
            SegmentStatus::PromptReady,
            SegmentStatus::ImageReady,
            SegmentStatus::AudioReady,
            SegmentStatus::VideoReady,
            SegmentStatus::Completed,
        ];
        for pair in chain.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(!SegmentStatus::Pending.can_advance_to(SegmentStatus::ImageReady));
        assert!(!SegmentStatus::PromptReady.can_advance_to(SegmentStatus::AudioReady));
        assert!(!SegmentStatus::ImageReady.can_advance_to(SegmentStatus::Completed));
    }

    #[test]
    fn failed_reachable_from_non_terminal_only() {
        for status in SegmentStatus::iter() {
            let legal = status.can_advance_to(SegmentStatus::Failed);
            assert_eq!(legal, !status.is_terminal(), "from {}", status);
        }
    }

    #[test]
    fn regeneration_only_from_completed() {
        for status in SegmentStatus::iter() {
            let legal = status.can_advance_to(SegmentStatus::NeedsRegeneration);
            assert_eq!(legal, status == SegmentStatus::Completed, "from {}", status);
        }
    }

    #[test]
    fn regeneration_reenters_at_pending_or_prompt_ready() {
        assert!(SegmentStatus::NeedsRegeneration.can_advance_to(SegmentStatus::Pending));
        assert!(SegmentStatus::NeedsRegeneration.can_advance_to(SegmentStatus::PromptReady));
        assert!(!SegmentStatus::NeedsRegeneration.can_advance_to(SegmentStatus::ImageReady));
    }

    #[test]
    fn update_builder_sets_subset() {
        let update = SegmentUpdate::builder()
            .audio_path("scratch/audio_3.mp3")
            .status(SegmentStatus::AudioReady)
            .build();
        assert_eq!(update.status, Some(SegmentStatus::AudioReady));
        assert!(update.image_path.is_none());
        assert!(update.prompt.is_none());
    }
}

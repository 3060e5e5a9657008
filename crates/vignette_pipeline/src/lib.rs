//! Segmentation, asset generation, and run orchestration.
//!
//! The pipeline turns one body of case-document text into a fixed number of
//! narrated video segments:
//!
//! 1. [`Segmenter`] asks the completion collaborator for the narrative
//!    segments and normalizes the result to the target count.
//! 2. [`AssetPipeline`] drives each segment through its four asset stages
//!    (visual prompt, image, narration audio, rendered clip), recording every
//!    transition through the run tracker.
//! 3. [`RunOrchestrator`] owns the whole pass: tracker acquisition,
//!    segmentation, per-segment stage driving with failure isolation, and
//!    scratch cleanup.
//! 4. [`FeedbackHandler`] folds reviewer feedback back in, re-arming
//!    completed segments for regeneration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod feedback;
mod orchestrator;
mod pacing;
mod pipeline;
mod prompt;
mod segmenter;

pub use feedback::FeedbackHandler;
pub use orchestrator::{
    RunInput, RunInputBuilder, RunOrchestrator, RunReport,
};
pub use pacing::RateGate;
pub use pipeline::AssetPipeline;
pub use prompt::PromptSynthesizer;
pub use segmenter::{DEFAULT_SEGMENT_COUNT, SEGMENT_PLACEHOLDER, Segmenter};

//! Core data types for the Vignette documentary pipeline.
//!
//! This crate provides the foundation data types used across all Vignette
//! interfaces: the durable [`Run`] record, its [`Segment`]s and their status
//! machine, human [`Feedback`], and the fixed render geometry.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod feedback;
mod render;
mod run;
mod segment;
mod telemetry;

pub use feedback::{Feedback, FeedbackBuilder};
pub use render::RenderSpec;
pub use run::{ErrorEntry, Run, RunId};
pub use segment::{Segment, SegmentStatus, SegmentUpdate, SegmentUpdateBuilder};
pub use telemetry::init_telemetry;

//! Collaborator traits for the Vignette documentary pipeline.
//!
//! The core pipeline consumes four external generation services (text
//! completion, image generation, voice synthesis, and video rendering)
//! through the abstract contracts defined here. Concrete SaaS clients live
//! in `vignette_services`; tests substitute mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observer;
mod traits;
mod types;

pub use observer::{ObserverResult, RunObserver};
pub use traits::{ImageGeneration, TextCompletion, VideoRenderer, VoiceSynthesis};
pub use types::{ImageRequest, ImageRequestBuilder};

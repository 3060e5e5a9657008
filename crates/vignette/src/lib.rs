//! Vignette - documentary segment generation pipeline
//!
//! Vignette turns case-document text into a fixed number of narrated
//! portrait video segments. Each segment is driven through four asset
//! stages (visual prompt, image, narration audio, rendered clip) with a
//! persisted per-segment state machine, per-collaborator rate pacing,
//! per-segment failure isolation, and feedback-driven regeneration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vignette::{
//!     ChatClient, ElevenLabsClient, FfmpegRenderer, RunComfyClient,
//!     RunInput, RunOrchestrator, RunStore, ServiceConfig, DEFAULT_CHAT_MODEL,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     vignette::init_telemetry()?;
//!     let config = ServiceConfig::from_env()?;
//!
//!     let orchestrator = RunOrchestrator::new(
//!         Arc::new(ChatClient::new(
//!             &config.openai_api_key,
//!             &config.openai_base_url,
//!             DEFAULT_CHAT_MODEL,
//!         )),
//!         Arc::new(RunComfyClient::new(
//!             &config.runcomfy_api_key,
//!             &config.runcomfy_user_id,
//!         )),
//!         Arc::new(ElevenLabsClient::new(&config.eleven_labs_api_key)),
//!         Arc::new(FfmpegRenderer::new()),
//!         RunStore::new("runs")?,
//!         "scratch",
//!     );
//!
//!     let report = orchestrator
//!         .run(
//!             RunInput::builder()
//!                 .title("Untitled Documentary")
//!                 .document_text(std::fs::read_to_string("case.txt")?)
//!                 .reference_image("narrator.png")
//!                 .voice_id("21m00Tcm4TlvDq8ikWAM")
//!                 .build()?,
//!         )
//!         .await?;
//!     println!("Completed {}/{} segments", report.completed_count, report.segment_count);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Vignette is organized as a workspace with focused crates:
//!
//! - `vignette_core` - run/segment data model, render geometry, telemetry
//! - `vignette_interface` - collaborator traits and the run observer
//! - `vignette_error` - error types
//! - `vignette_state` - file-backed run persistence and the run tracker
//! - `vignette_services` - production collaborator clients
//! - `vignette_pipeline` - segmentation, asset stages, orchestration
//!
//! This crate (`vignette`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use vignette_core::*;
pub use vignette_error::*;
pub use vignette_interface::*;
pub use vignette_pipeline::*;
pub use vignette_services::*;
pub use vignette_state::*;

//! Concrete generation collaborators for Vignette.
//!
//! This crate provides the production implementations of the collaborator
//! traits defined in `vignette_interface`:
//!
//! - [`ChatClient`]: OpenAI-compatible chat completions for segmentation
//!   and visual prompt synthesis
//! - [`RunComfyClient`]: ComfyUI-hosted image generation
//! - [`ElevenLabsClient`]: narration voice synthesis
//! - [`FfmpegRenderer`]: local `ffmpeg` invocation for clip rendering
//!
//! All network clients read their credentials through [`ServiceConfig`],
//! which sources them from the environment.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod elevenlabs;
mod ffmpeg;
mod openai;
mod runcomfy;

pub use config::ServiceConfig;
pub use elevenlabs::{ElevenLabsClient, NarratorVoice, narrator_voices};
pub use ffmpeg::FfmpegRenderer;
pub use openai::{
    ChatChoice, ChatClient, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder,
    ChatResponse, ChatRole, DEFAULT_CHAT_MODEL,
};
pub use runcomfy::RunComfyClient;

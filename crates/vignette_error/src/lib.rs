//! Error types for the Vignette documentary pipeline.
//!
//! This crate provides the foundation error types used throughout the Vignette
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vignette_error::{VignetteResult, HttpError};
//!
//! fn fetch_data() -> VignetteResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod segmenter;
mod stage;
mod state;

pub use config::ConfigError;
pub use error::{VignetteError, VignetteErrorKind, VignetteResult};
pub use http::HttpError;
pub use segmenter::{SegmenterError, SegmenterErrorKind};
pub use stage::{StageError, StageErrorKind};
pub use state::{StateError, StateErrorKind};

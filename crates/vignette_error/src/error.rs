//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, SegmenterError, StageError, StateError};

/// This is the foundation error enum. Every domain error in the workspace
/// converts into it so that crate boundaries can return one result type.
///
/// # Examples
///
/// ```
/// use vignette_error::{VignetteError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: VignetteError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VignetteErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Segmentation error (fatal to the run)
    #[from(SegmenterError)]
    Segmenter(SegmenterError),
    /// Asset pipeline stage error (isolated per segment)
    #[from(StageError)]
    Stage(StageError),
    /// Run state or persistence error
    #[from(StateError)]
    State(StateError),
}

/// Vignette error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vignette_error::{VignetteResult, ConfigError};
///
/// fn might_fail() -> VignetteResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vignette Error: {}", _0)]
pub struct VignetteError(Box<VignetteErrorKind>);

impl VignetteError {
    /// Create a new error from a kind.
    pub fn new(kind: VignetteErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VignetteErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VignetteErrorKind
impl<T> From<T> for VignetteError
where
    T: Into<VignetteErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result alias for the workspace.
pub type VignetteResult<T> = Result<T, VignetteError>;

//! Request types for generation collaborators.

use derive_builder::Builder;
use derive_getters::Getters;
use std::path::PathBuf;

/// Default negative prompt applied to every image request.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, low quality, bad composition";

/// One image-generation request.
///
/// # Examples
///
/// ```
/// use vignette_interface::ImageRequest;
///
/// let request = ImageRequest::builder()
///     .prompt("rain-slicked street at night, hard sodium light")
///     .reference_image("refs/narrator.png")
///     .build()
///     .unwrap();
/// assert_eq!(*request.width(), 1080);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Visual generation prompt
    prompt: String,
    /// Negative prompt steering generation away from artifacts
    #[builder(default = "DEFAULT_NEGATIVE_PROMPT.to_string()")]
    negative_prompt: String,
    /// Output width in pixels
    #[builder(default = "1080")]
    width: u32,
    /// Output height in pixels
    #[builder(default = "1920")]
    height: u32,
    /// Character-reference image for identity consistency
    reference_image: PathBuf,
}

impl ImageRequest {
    /// Start building a request.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_portrait_defaults() {
        let request = ImageRequest::builder()
            .prompt("courtroom interior, dust in light shafts")
            .reference_image("refs/narrator.png")
            .build()
            .unwrap();
        assert_eq!(request.negative_prompt(), DEFAULT_NEGATIVE_PROMPT);
        assert_eq!((*request.width(), *request.height()), (1080, 1920));
    }

    #[test]
    fn builder_requires_prompt() {
        let result = ImageRequest::builder()
            .reference_image("refs/narrator.png")
            .build();
        assert!(result.is_err());
    }
}

//! Human feedback attached to completed segments.

use serde::{Deserialize, Serialize};

/// Structured human input for one segment.
///
/// Feedback is advisory data attached to a `Completed` segment. Setting
/// `needs_regeneration` is the only mechanism that re-arms the asset
/// pipeline for that segment; a revised prompt, when present, takes
/// precedence over the synthesized prompt on regeneration.
///
/// # Examples
///
/// ```
/// use vignette_core::Feedback;
///
/// let feedback = Feedback::builder()
///     .text_rating(4)
///     .revised_prompt("low-key noir alley, rain, neon reflections")
///     .needs_regeneration(true)
///     .build();
/// assert!(feedback.needs_regeneration);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(
    setter(into, strip_option),
    default,
    build_fn(private, name = "fallible_build")
)]
pub struct Feedback {
    /// 1-5 rating of the story segment text
    pub text_rating: Option<u8>,
    /// 1-5 rating of the visual prompt
    pub prompt_rating: Option<u8>,
    /// Human-revised visual prompt, used verbatim on regeneration
    pub revised_prompt: Option<String>,
    /// Free-text comments
    pub comments: Option<String>,
    /// Whether the segment should re-enter the pipeline
    pub needs_regeneration: bool,
}

impl Feedback {
    /// Start building feedback.
    pub fn builder() -> FeedbackBuilder {
        FeedbackBuilder::default()
    }
}

impl FeedbackBuilder {
    /// Build the feedback. All fields are defaulted, so this cannot fail.
    pub fn build(&self) -> Feedback {
        self.fallible_build()
            .expect("Feedback fields are all defaulted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_feedback_does_not_regenerate() {
        let feedback = Feedback::builder().comments("fine as is").build();
        assert!(!feedback.needs_regeneration);
        assert!(feedback.revised_prompt.is_none());
    }

    #[test]
    fn revised_prompt_round_trips_through_json() {
        let feedback = Feedback::builder()
            .prompt_rating(2)
            .revised_prompt("wide shot, overcast, desaturated")
            .needs_regeneration(true)
            .build();
        let json = serde_json::to_string(&feedback).unwrap();
        let back: Feedback = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feedback);
    }
}

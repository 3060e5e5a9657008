//! Mock generation collaborators with scripted behavior.

// Each integration test binary compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use vignette_core::RenderSpec;
use vignette_error::{HttpError, VignetteResult};
use vignette_interface::{
    ImageGeneration, ImageRequest, TextCompletion, VideoRenderer, VoiceSynthesis,
};

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return success with the given text
    Success(String),
    /// Always fail with the given message
    Error(String),
    /// Return a scripted sequence of responses
    Sequence(Vec<MockResponse>),
}

/// A single scripted response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(String),
}

fn next_response(
    behavior: &MockBehavior,
    call_count: &Arc<Mutex<usize>>,
) -> VignetteResult<String> {
    let mut count = call_count.lock().unwrap();
    let current = *count;
    *count += 1;

    match behavior {
        MockBehavior::Success(text) => Ok(text.clone()),
        MockBehavior::Error(message) => Err(HttpError::new(message.clone()).into()),
        MockBehavior::Sequence(responses) => match responses.get(current) {
            Some(MockResponse::Success(text)) => Ok(text.clone()),
            Some(MockResponse::Error(message)) => Err(HttpError::new(message.clone()).into()),
            None => Err(HttpError::new(format!(
                "Mock sequence exhausted (call {} beyond {} responses)",
                current + 1,
                responses.len()
            ))
            .into()),
        },
    }
}

/// Mock text-completion collaborator.
pub struct MockCompletion {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
}

impl MockCompletion {
    /// Always succeed with the given text.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Always fail with the given message.
    pub fn new_error(message: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Error(message.into()))
    }

    /// Return the scripted sequence.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `complete` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Shared handle to the call counter.
    pub fn counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl TextCompletion for MockCompletion {
    async fn complete(
        &self,
        _system_instruction: &str,
        _user_text: &str,
    ) -> VignetteResult<String> {
        next_response(&self.behavior, &self.call_count)
    }

    fn provider_name(&self) -> &'static str {
        "mock-completion"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock image-generation collaborator. Successes yield the response text as
/// image bytes.
pub struct MockImage {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
}

impl MockImage {
    pub fn new_success() -> Self {
        Self::new_with_behavior(MockBehavior::Success("png-bytes".into()))
    }

    pub fn new_error(message: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Error(message.into()))
    }

    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ImageGeneration for MockImage {
    async fn generate_image(&self, _request: &ImageRequest) -> VignetteResult<Vec<u8>> {
        next_response(&self.behavior, &self.call_count).map(String::into_bytes)
    }
}

/// Mock voice-synthesis collaborator. Successes yield the response text as
/// audio bytes.
pub struct MockVoice {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
}

impl MockVoice {
    pub fn new_success() -> Self {
        Self::new_with_behavior(MockBehavior::Success("mp3-bytes".into()))
    }

    pub fn new_error(message: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Error(message.into()))
    }

    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl VoiceSynthesis for MockVoice {
    async fn synthesize(&self, _text: &str, _voice_id: &str) -> VignetteResult<Vec<u8>> {
        next_response(&self.behavior, &self.call_count).map(String::into_bytes)
    }
}

/// Mock renderer. Successes write a stub clip at the output path so the
/// artifact exists on disk.
pub struct MockRenderer {
    behavior: MockBehavior,
    call_count: Arc<Mutex<usize>>,
}

impl MockRenderer {
    pub fn new_success() -> Self {
        Self::new_with_behavior(MockBehavior::Success("mp4-bytes".into()))
    }

    pub fn new_error(message: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Error(message.into()))
    }

    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl VideoRenderer for MockRenderer {
    async fn render(
        &self,
        _image: &Path,
        _audio: &Path,
        output: &Path,
        _spec: &RenderSpec,
    ) -> VignetteResult<()> {
        let bytes = next_response(&self.behavior, &self.call_count)?;
        tokio::fs::write(output, bytes.as_bytes())
            .await
            .map_err(|e| HttpError::new(format!("mock render write failed: {e}")))?;
        Ok(())
    }
}

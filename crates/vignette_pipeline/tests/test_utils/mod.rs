//! Shared mock collaborators for pipeline integration tests.

mod mocks;

pub use mocks::{
    MockBehavior, MockCompletion, MockImage, MockRenderer, MockResponse, MockVoice,
};

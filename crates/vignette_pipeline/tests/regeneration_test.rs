//! Feedback-driven segment regeneration.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockCompletion, MockImage, MockRenderer, MockVoice};
use vignette_core::{Feedback, SegmentStatus};
use vignette_pipeline::{AssetPipeline, FeedbackHandler};
use vignette_state::{RunStore, RunTracker};

struct Fixture {
    temp: tempfile::TempDir,
    pipeline: AssetPipeline,
    tracker: RunTracker,
    completion: Arc<MockCompletion>,
}

fn fixture() -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let store = RunStore::new(temp.path().join("runs")).unwrap();
    let completion = Arc::new(MockCompletion::new_success("synthesized prompt"));
    let pipeline = AssetPipeline::new(
        Arc::clone(&completion) as Arc<dyn vignette_interface::TextCompletion>,
        Arc::new(MockImage::new_success()),
        Arc::new(MockVoice::new_success()),
        Arc::new(MockRenderer::new_success()),
        temp.path().join("scratch"),
    )
    .with_rate_delay(Duration::ZERO);
    let tracker = RunTracker::new("regeneration", store);
    Fixture {
        temp,
        pipeline,
        tracker,
        completion,
    }
}

async fn complete_one_segment(f: &mut Fixture) -> usize {
    let reference = f.temp.path().join("narrator.png");
    std::fs::write(&reference, b"png").unwrap();
    let index = f.tracker.start_segment("A door left unlocked.", "");
    f.pipeline
        .process_segment(&mut f.tracker, index, &reference, "voice-1")
        .await
        .unwrap();
    assert_eq!(
        f.tracker.segment(index).unwrap().status,
        SegmentStatus::Completed
    );
    index
}

#[tokio::test]
async fn revised_prompt_takes_precedence_and_skips_synthesis() {
    let mut f = fixture();
    let index = complete_one_segment(&mut f).await;
    let calls_after_first_pass = f.completion.call_count();

    let feedback = Feedback::builder()
        .needs_regeneration(true)
        .revised_prompt("X".to_string())
        .build();
    let handler = FeedbackHandler::new(&f.pipeline);
    assert!(handler.add_feedback(&mut f.tracker, index, feedback).unwrap());
    assert_eq!(
        f.tracker.segment(index).unwrap().status,
        SegmentStatus::NeedsRegeneration
    );

    let reference = f.temp.path().join("narrator.png");
    handler
        .regenerate(&mut f.tracker, index, &reference, "voice-1")
        .await
        .unwrap();

    let segment = f.tracker.segment(index).unwrap();
    assert_eq!(segment.status, SegmentStatus::Completed);
    assert_eq!(segment.prompt, "X");
    assert_eq!(
        f.completion.call_count(),
        calls_after_first_pass,
        "revised prompt must not trigger a synthesis call"
    );
}

#[tokio::test]
async fn regeneration_without_revision_resynthesizes_the_prompt() {
    let mut f = fixture();
    let index = complete_one_segment(&mut f).await;
    let calls_after_first_pass = f.completion.call_count();

    let feedback = Feedback::builder().needs_regeneration(true).build();
    let handler = FeedbackHandler::new(&f.pipeline);
    assert!(handler.add_feedback(&mut f.tracker, index, feedback).unwrap());

    let reference = f.temp.path().join("narrator.png");
    handler
        .regenerate(&mut f.tracker, index, &reference, "voice-1")
        .await
        .unwrap();

    let segment = f.tracker.segment(index).unwrap();
    assert_eq!(segment.status, SegmentStatus::Completed);
    assert_eq!(segment.prompt, "synthesized prompt");
    assert_eq!(f.completion.call_count(), calls_after_first_pass + 1);
}

#[tokio::test]
async fn feedback_without_the_flag_leaves_the_segment_completed() {
    let mut f = fixture();
    let index = complete_one_segment(&mut f).await;

    let feedback = Feedback::builder()
        .text_rating(4u8)
        .comments("tighten the middle".to_string())
        .build();
    let handler = FeedbackHandler::new(&f.pipeline);
    assert!(!handler.add_feedback(&mut f.tracker, index, feedback).unwrap());
    assert_eq!(
        f.tracker.segment(index).unwrap().status,
        SegmentStatus::Completed
    );
}

#[tokio::test]
async fn regeneration_failure_is_recorded_like_any_stage_failure() {
    let mut f = fixture();
    let index = complete_one_segment(&mut f).await;

    let pipeline = AssetPipeline::new(
        Arc::new(MockCompletion::new_success("synthesized prompt")),
        Arc::new(MockImage::new_error("quota exhausted")),
        Arc::new(MockVoice::new_success()),
        Arc::new(MockRenderer::new_success()),
        f.temp.path().join("scratch"),
    )
    .with_rate_delay(Duration::ZERO);
    let handler = FeedbackHandler::new(&pipeline);
    let feedback = Feedback::builder().needs_regeneration(true).build();
    assert!(handler.add_feedback(&mut f.tracker, index, feedback).unwrap());

    let reference = f.temp.path().join("narrator.png");
    let err = handler
        .regenerate(&mut f.tracker, index, &reference, "voice-1")
        .await
        .unwrap_err();
    assert!(format!("{err}").contains("Image generation failed"));
    assert_eq!(
        f.tracker.segment(index).unwrap().status,
        SegmentStatus::Failed
    );
    assert!(f.tracker.run().has_error);
}

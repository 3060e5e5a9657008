//! End-to-end orchestrator runs over mock collaborators.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockCompletion, MockImage, MockRenderer, MockResponse, MockVoice};
use vignette_core::SegmentStatus;
use vignette_pipeline::{RunInput, RunOrchestrator, SEGMENT_PLACEHOLDER};
use vignette_state::RunStore;

fn ten_candidates() -> String {
    (0..10)
        .map(|i| format!("On the night in question, part {i}."))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Completion script for a nominal run: one segmentation reply followed by
/// ten prompt replies.
fn nominal_completion() -> MockCompletion {
    let mut responses = vec![MockResponse::Success(ten_candidates())];
    responses.extend((0..10).map(|i| MockResponse::Success(format!("noir scene {i}"))));
    MockCompletion::new_sequence(responses)
}

fn reference_image(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("narrator.png");
    std::fs::write(&path, b"png").unwrap();
    path
}

struct Fixture {
    temp: tempfile::TempDir,
    orchestrator: RunOrchestrator,
    store: RunStore,
    input: RunInput,
    scratch: std::path::PathBuf,
}

fn fixture(completion: MockCompletion, images: MockImage) -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let store = RunStore::new(temp.path().join("runs")).unwrap();
    let scratch = temp.path().join("scratch");
    let orchestrator = RunOrchestrator::new(
        Arc::new(completion),
        Arc::new(images),
        Arc::new(MockVoice::new_success()),
        Arc::new(MockRenderer::new_success()),
        store.clone(),
        &scratch,
    )
    .with_rate_delay(Duration::ZERO);
    let input = RunInput::builder()
        .title("The Orchard House Case")
        .document_text("Three short case documents, concatenated.")
        .reference_image(reference_image(temp.path()))
        .voice_id("voice-1")
        .build()
        .unwrap();
    Fixture {
        temp,
        orchestrator,
        store,
        input,
        scratch,
    }
}

#[tokio::test]
async fn nominal_run_completes_every_segment() {
    let f = fixture(nominal_completion(), MockImage::new_success());
    let report = f.orchestrator.run(f.input).await.unwrap();

    assert_eq!(report.segment_count, 10);
    assert_eq!(report.completed_count, 10);
    assert!(report.failed_indices.is_empty());
    assert!(!report.has_error);
    assert_eq!(report.video_paths.len(), 10);

    let run = f.store.load(&report.run_id).unwrap();
    for (i, segment) in run.segments.iter().enumerate() {
        assert_eq!(segment.status, SegmentStatus::Completed, "segment {i}");
        assert_ne!(segment.text, SEGMENT_PLACEHOLDER);
        assert_eq!(segment.prompt, format!("noir scene {i}"));
        assert!(segment.image_path.is_some());
        assert!(segment.audio_path.is_some());
        assert!(segment.video_path.is_some());
    }
}

#[tokio::test]
async fn scratch_is_cleaned_after_a_successful_run() {
    let f = fixture(nominal_completion(), MockImage::new_success());
    let scratch = f.scratch.clone();
    let report = f.orchestrator.run(f.input).await.unwrap();
    assert!(!scratch.exists());
    // The report keeps the recorded write locations even after cleanup.
    assert_eq!(report.video_paths.len(), 10);
    assert!(report.video_paths.iter().all(|p| p.starts_with(&scratch)));
}

#[tokio::test]
async fn unusable_scratch_fails_segments_into_the_error_log() {
    let f = fixture(nominal_completion(), MockImage::new_success());
    // A regular file where the scratch directory should go.
    std::fs::write(&f.scratch, b"occupied").unwrap();

    let report = f.orchestrator.run(f.input).await.unwrap();
    assert_eq!(report.completed_count, 0);
    assert_eq!(report.failed_indices, (0..10).collect::<Vec<_>>());
    assert!(report.has_error);

    let run = f.store.load(&report.run_id).unwrap();
    assert!(run.segments.iter().all(|s| s.status == SegmentStatus::Failed));
    assert_eq!(run.error_log.len(), 10);
    assert!(run.error_log[0].message.contains("scratch stage failed"));
}

#[tokio::test]
async fn one_failed_image_stage_does_not_stop_the_run() {
    let mut image_responses: Vec<MockResponse> = (0..10)
        .map(|_| MockResponse::Success("png-bytes".into()))
        .collect();
    image_responses[3] = MockResponse::Error("upstream 503".into());

    let f = fixture(nominal_completion(), MockImage::new_sequence(image_responses));
    let report = f.orchestrator.run(f.input).await.unwrap();

    assert_eq!(report.segment_count, 10);
    assert_eq!(report.completed_count, 9);
    assert_eq!(report.failed_indices, vec![3]);
    assert!(report.has_error);

    let run = f.store.load(&report.run_id).unwrap();
    assert_eq!(run.segments[3].status, SegmentStatus::Failed);
    assert!(run.segments[3].image_path.is_none());
    for i in (0..10).filter(|&i| i != 3) {
        assert_eq!(run.segments[i].status, SegmentStatus::Completed, "segment {i}");
    }
    assert_eq!(run.error_log.len(), 1);
    assert!(run.error_log[0].message.contains("Segment 3 image stage failed"));
}

#[tokio::test]
async fn segmentation_failure_aborts_before_segment_work() {
    let f = fixture(
        MockCompletion::new_error("model unavailable"),
        MockImage::new_success(),
    );
    let err = f.orchestrator.run(f.input).await.unwrap_err();
    assert!(format!("{err}").contains("Segment generation failed"));
    assert!(!f.scratch.exists());
}

#[tokio::test]
async fn blank_input_is_rejected_without_calling_the_model() {
    let completion = MockCompletion::new_success("unused");
    let counter = completion.counter();
    let mut f = fixture(completion, MockImage::new_success());
    f.input = RunInput::builder()
        .title("Empty")
        .document_text("   \n\t  ")
        .reference_image(f.temp.path().join("narrator.png"))
        .voice_id("voice-1")
        .build()
        .unwrap();

    let err = f.orchestrator.run(f.input).await.unwrap_err();
    assert!(format!("{err}").contains("empty after trimming"));
    assert_eq!(*counter.lock().unwrap(), 0);
}

#[tokio::test]
async fn short_segmentation_is_padded_to_the_target() {
    let six = (0..6)
        .map(|i| format!("Fragment {i}."))
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut responses = vec![MockResponse::Success(six)];
    responses.extend((0..10).map(|i| MockResponse::Success(format!("prompt {i}"))));

    let f = fixture(MockCompletion::new_sequence(responses), MockImage::new_success());
    let report = f.orchestrator.run(f.input).await.unwrap();
    assert_eq!(report.segment_count, 10);

    let run = f.store.load(&report.run_id).unwrap();
    assert!(
        run.segments[6..]
            .iter()
            .all(|s| s.text == SEGMENT_PLACEHOLDER)
    );
    assert!(
        run.segments[..6]
            .iter()
            .all(|s| s.text != SEGMENT_PLACEHOLDER)
    );
}

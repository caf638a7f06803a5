//! End-to-end tests of the try-on session flow with recording collaborators

mod helpers;

use std::sync::Arc;

use helpers::*;
use tailor_core::{
    AppError, DispatchPolicy, ErrorMetadata, ImageSource, ImageUpload, MissingInput,
    SubmissionState, TailorConfig, PROCESSING_ERROR_MESSAGE,
};
use tailor_services::{ResultDownloader, ResultView, TryOnSession};

fn downloader() -> ResultDownloader {
    ResultDownloader::new(std::time::Duration::from_secs(5)).unwrap()
}

#[test]
fn test_non_image_upload_is_rejected_and_previous_image_kept() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );

    let accepted = h.session.acquire_image(jpeg_upload()).unwrap();
    assert!(accepted.preview().starts_with("data:image/jpeg;base64,"));

    let err = h.session.acquire_image(pdf_upload()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_FILE_TYPE");
    assert_eq!(err.client_message(), "Please upload an image file.");
    assert_eq!(h.session.user_image(), Some(accepted));
    assert_eq!(
        h.notifier.titles(),
        vec!["Image Selected", "Invalid File Type"]
    );
}

#[test]
fn test_camera_capture_uses_the_same_validation() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );

    // No declared type: sniffed from the bytes
    let capture = ImageUpload::new(ImageSource::Camera, "capture.png", None, PNG_BYTES);
    let image = h.session.acquire_image(capture).unwrap();
    assert_eq!(image.content_type(), "image/png");

    let bogus = ImageUpload::new(ImageSource::Camera, "capture", None, &b"not an image"[..]);
    assert!(matches!(
        h.session.acquire_image(bogus),
        Err(AppError::Validation(_))
    ));
    assert_eq!(h.session.user_image(), Some(image));
}

#[test]
fn test_empty_and_oversized_uploads_are_rejected() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );

    let empty = ImageUpload::new(
        ImageSource::FilePicker,
        "empty.jpg",
        Some("image/jpeg".to_string()),
        Vec::<u8>::new(),
    );
    assert_eq!(
        h.session.acquire_image(empty).unwrap_err().error_code(),
        "EMPTY_FILE"
    );

    let huge = ImageUpload::new(
        ImageSource::FilePicker,
        "huge.jpg",
        Some("image/jpeg".to_string()),
        vec![0xFFu8; 4096],
    );
    assert_eq!(
        h.session.acquire_image(huge).unwrap_err().error_code(),
        "FILE_TOO_LARGE"
    );
    assert!(h.session.user_image().is_none());
    assert_eq!(h.notifier.titles(), vec!["Invalid Image", "Invalid Image"]);
}

#[test]
fn test_non_digit_measurements_are_rejected_and_details_kept() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );

    let saved = h.session.submit_body_details("175", "70").unwrap();

    for (height, weight) in [("", "70"), ("17a", "70"), ("175", "7.5"), ("-175", "70")] {
        let err = h.session.submit_body_details(height, weight).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MEASUREMENT");
        assert_eq!(h.session.body_details(), Some(saved));
    }

    let err = h.session.submit_body_details("abc", "70").unwrap_err();
    assert_eq!(err.client_message(), "Height must be a number");
}

#[test]
fn test_unknown_clothing_is_rejected() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );

    let err = h.session.select_clothing("99").unwrap_err();
    assert!(matches!(err, AppError::UnknownClothing(_)));
    assert!(h.session.selected_clothing().is_none());
}

#[tokio::test]
async fn test_incomplete_submit_has_no_effect() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    h.session.acquire_image(jpeg_upload()).unwrap();
    h.notifier.clear();

    let err = h.session.submit().await.unwrap_err();
    assert!(matches!(
        &err,
        AppError::MissingInformation(missing)
            if missing == &vec![MissingInput::Clothing, MissingInput::BodyDetails]
    ));
    assert_eq!(
        err.client_message(),
        "Please upload your image and select a clothing item."
    );
    assert_eq!(h.session.submission_state(), SubmissionState::Idle);
    assert_eq!(h.compositor.call_count(), 0);
    assert_eq!(h.advisor.call_count(), 0);
    assert_eq!(h.notifier.titles(), vec!["Missing Information"]);
}

#[tokio::test]
async fn test_missing_body_details_has_its_own_message() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    h.session.acquire_image(jpeg_upload()).unwrap();
    h.session.select_clothing("2").unwrap();

    let err = h.session.submit().await.unwrap_err();
    assert_eq!(
        err.client_message(),
        "Please provide your body details for AI recommendation."
    );
    assert_eq!(h.notifier.titles().last().unwrap(), "Missing Body Details");
    assert_eq!(h.compositor.call_count(), 0);
}

#[tokio::test]
async fn test_denim_jeans_scenario_dispatches_documented_requests() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);
    assert!(h.session.can_submit());

    let result = h.session.submit().await.unwrap();

    let composite_calls = h.compositor.calls();
    assert_eq!(composite_calls.len(), 1);
    assert_eq!(
        composite_calls[0].garment_image,
        "https://picsum.photos/seed/jeans/300/400"
    );
    assert_eq!(composite_calls[0].session_id, "user_id_123");
    assert_eq!(&composite_calls[0].user_image.data()[..], JPEG_BYTES);

    let advisor_calls = h.advisor.calls();
    assert_eq!(advisor_calls.len(), 1);
    assert_eq!(advisor_calls[0].height, 175);
    assert_eq!(advisor_calls[0].weight, 70);
    assert_eq!(advisor_calls[0].desired_clothing, "Denim Jeans");
    assert_eq!(advisor_calls[0].style_preferences, "Pants");

    assert_eq!(result.image_url, RESULT_URL);
    assert!(result.recommendation.is_some());
    assert_eq!(
        h.session.submission_state(),
        SubmissionState::Succeeded(result.clone())
    );
    assert!(matches!(h.session.view(), ResultView::Ready { .. }));
    assert!(!h.session.is_busy());
    assert_eq!(h.notifier.last().unwrap().title, "Success!");
}

#[tokio::test]
async fn test_session_accepts_a_new_submission_after_success() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);

    let first = h.session.submit().await.unwrap();
    assert!(h.session.can_submit());

    let mut states = h.session.subscribe();
    let second = h.session.submit().await.unwrap();

    assert_eq!(h.compositor.call_count(), 2);
    assert_eq!(h.advisor.call_count(), 2);
    assert_eq!(second.image_url, first.image_url);
    assert!(second.completed_at >= first.completed_at);
    assert!(states.has_changed().unwrap());
    assert_eq!(
        h.session.submission_state(),
        SubmissionState::Succeeded(second)
    );
    assert!(!h.session.is_busy());
    assert_eq!(h.notifier.titles().last().unwrap(), "Success!");
}

#[tokio::test]
async fn test_compositor_failure_skips_recommendation_and_clears_busy() {
    let h = harness(
        RecordingCompositor::failing("connection refused"),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);

    let err = h.session.submit().await.unwrap_err();

    assert_eq!(err.client_message(), PROCESSING_ERROR_MESSAGE);
    assert_eq!(h.compositor.call_count(), 1);
    assert_eq!(h.advisor.call_count(), 0);
    assert!(!h.session.is_busy());
    assert!(h.session.can_submit());

    match h.session.submission_state() {
        SubmissionState::Failed(failure) => {
            assert_eq!(failure.reason, PROCESSING_ERROR_MESSAGE);
            assert!(!failure.reason.contains("connection refused"));
            assert!(failure.partial.is_none());
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(h.notifier.last().unwrap().title, "Processing Error");
}

#[tokio::test]
async fn test_recommendation_failure_keeps_partial_image() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::failing("rate limited"),
    );
    fill_inputs(&h.session);

    assert!(h.session.submit().await.is_err());

    assert_eq!(
        h.session.view(),
        ResultView::Error {
            message: PROCESSING_ERROR_MESSAGE.to_string(),
            image_url: Some(RESULT_URL.to_string()),
        }
    );
    let download = h.session.download_request().unwrap();
    assert_eq!(download.filename, "600");
    assert!(!h.session.is_busy());
}

#[tokio::test]
async fn test_reselecting_clothing_clears_result() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);
    h.session.submit().await.unwrap();

    h.session.select_clothing("1").unwrap();

    assert_eq!(h.session.submission_state(), SubmissionState::Idle);
    assert_eq!(h.session.view(), ResultView::Placeholder);
    assert!(h.session.download_request().is_none());
    assert!(h.session.can_submit());
}

#[tokio::test]
async fn test_new_image_clears_result() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);
    h.session.submit().await.unwrap();

    let capture = ImageUpload::new(ImageSource::Camera, "capture.png", None, PNG_BYTES);
    h.session.acquire_image(capture).unwrap();

    assert_eq!(h.session.view(), ResultView::Placeholder);
}

#[tokio::test]
async fn test_body_details_keep_result_but_dismiss_error() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);
    h.session.submit().await.unwrap();

    h.session.submit_body_details("180", "75").unwrap();
    assert!(matches!(h.session.view(), ResultView::Ready { .. }));

    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::failing("rate limited"),
    );
    fill_inputs(&h.session);
    h.session.submit().await.unwrap_err();

    h.session.submit_body_details("180", "75").unwrap();
    assert_eq!(
        h.session.view(),
        ResultView::Ready {
            image_url: RESULT_URL.to_string(),
            recommendation: None,
        }
    );
}

#[tokio::test]
async fn test_inputs_are_locked_while_in_flight() {
    let (compositor, release) = RecordingCompositor::blocking(RESULT_URL);
    let h = harness(compositor, RecordingAdvisor::succeeding());
    fill_inputs(&h.session);

    let mut states = h.session.subscribe();
    let session = h.session.clone();
    let task = tokio::spawn(async move { session.submit().await });

    states.wait_for(|s| s.is_in_flight()).await.unwrap();

    assert!(h.session.is_busy());
    assert!(!h.session.can_submit());
    assert!(h.session.view().blocks_input());
    assert!(matches!(
        h.session.submit().await,
        Err(AppError::SubmissionInFlight)
    ));
    assert!(matches!(
        h.session.select_clothing("1"),
        Err(AppError::SubmissionInFlight)
    ));
    assert!(matches!(
        h.session.acquire_image(jpeg_upload()),
        Err(AppError::SubmissionInFlight)
    ));
    assert!(matches!(
        h.session.submit_body_details("180", "80"),
        Err(AppError::SubmissionInFlight)
    ));
    assert_eq!(h.session.selected_clothing().unwrap().id, "2");

    release.notify_one();
    let result = task.await.unwrap().unwrap();

    assert_eq!(result.image_url, RESULT_URL);
    assert_eq!(h.compositor.call_count(), 1);
    assert!(!h.session.is_busy());
    assert!(matches!(*states.borrow(), SubmissionState::Succeeded(_)));
}

#[tokio::test]
async fn test_panicking_compositor_does_not_leave_session_busy() {
    let h = harness(
        RecordingCompositor::panicking(),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);

    let session = h.session.clone();
    let outcome = tokio::spawn(async move { session.submit().await }).await;

    assert!(outcome.unwrap_err().is_panic());
    assert!(!h.session.is_busy());
    assert!(matches!(
        h.session.submission_state(),
        SubmissionState::Failed(_)
    ));
    assert_eq!(h.advisor.call_count(), 0);
}

#[tokio::test]
async fn test_abandoned_submission_does_not_leave_session_busy() {
    let (compositor, _release) = RecordingCompositor::blocking(RESULT_URL);
    let h = harness(compositor, RecordingAdvisor::succeeding());
    fill_inputs(&h.session);

    let mut states = h.session.subscribe();
    let session = h.session.clone();
    let task = tokio::spawn(async move { session.submit().await });
    states.wait_for(|s| s.is_in_flight()).await.unwrap();

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert!(!h.session.is_busy());
    assert!(h.session.can_submit());
}

#[tokio::test]
async fn test_concurrent_policy_calls_both_collaborators() {
    let compositor = RecordingCompositor::succeeding(RESULT_URL);
    let advisor = RecordingAdvisor::succeeding();
    let session = TryOnSession::builder(compositor.clone(), advisor.clone())
        .dispatch_policy(DispatchPolicy::Concurrent)
        .build();
    fill_inputs(&session);

    let result = session.submit().await.unwrap();

    assert_eq!(result.image_url, RESULT_URL);
    assert_eq!(compositor.call_count(), 1);
    assert_eq!(advisor.call_count(), 1);
}

#[tokio::test]
async fn test_concurrent_policy_compositor_failure_fails_submission() {
    let compositor = RecordingCompositor::failing("timeout");
    let advisor = RecordingAdvisor::succeeding();
    let session = TryOnSession::builder(compositor.clone(), advisor.clone())
        .dispatch_policy(DispatchPolicy::Concurrent)
        .build();
    fill_inputs(&session);

    assert!(session.submit().await.is_err());
    assert!(matches!(
        session.view(),
        ResultView::Error {
            image_url: None,
            ..
        }
    ));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_download_without_result_is_a_no_op() {
    let h = harness(
        RecordingCompositor::succeeding(RESULT_URL),
        RecordingAdvisor::succeeding(),
    );
    let dir = tempfile::tempdir().unwrap();

    let saved = h
        .session
        .download_result(&downloader(), dir.path())
        .await
        .unwrap();

    assert!(saved.is_none());
    assert_eq!(h.session.submission_state(), SubmissionState::Idle);
    assert_eq!(h.notifier.titles(), vec!["No Image to Download"]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_saves_result() {
    let h = harness(
        RecordingCompositor::succeeding("data:image/png;base64,cG5n"),
        RecordingAdvisor::succeeding(),
    );
    fill_inputs(&h.session);
    h.session.submit().await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let saved = h
        .session
        .download_result(&downloader(), dir.path())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(saved, dir.path().join("virtual-try-on.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"png");
    assert_eq!(h.notifier.last().unwrap().title, "Image Downloaded");
    assert!(matches!(
        h.session.submission_state(),
        SubmissionState::Succeeded(_)
    ));
}

#[tokio::test]
async fn test_session_from_config_runs_offline() {
    let config = TailorConfig {
        simulated_delay_ms: 0,
        advisor_backend: tailor_core::AdvisorBackend::Simulated,
        user_id: Some("user_id_123".to_string()),
        ..TailorConfig::default()
    };
    let session = TryOnSession::from_config(&config, Arc::new(tailor_core::NoOpNotifier)).unwrap();
    assert_eq!(session.session_id(), "user_id_123");
    assert_eq!(session.catalog().len(), 6);

    fill_inputs(&session);
    let result = session.submit().await.unwrap();

    assert!(result.image_url.starts_with("https://picsum.photos/seed/"));
    assert!(result.recommendation.is_some());
}

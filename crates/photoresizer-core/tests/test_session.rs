#[allow(dead_code)]
mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use photoresizer_core::consts::DEFAULT_PREVIEW_QUALITY;
use photoresizer_core::format::OutputFormat;
use photoresizer_core::intent::Intent;
use photoresizer_core::session::{DispatchOutcome, Session};
use photoresizer_core::state::{EditState, ImageSource};

use common::{FailingTranscoder, GatedTranscoder, RenderingTranscoder};

const WAIT: Duration = Duration::from_secs(10);

fn picked_session(dir: &std::path::Path, session: &mut Session, w: u32, h: u32) -> ImageSource {
    let path = dir.join("holiday.png");
    common::write_test_image(&path, w, h);
    let source = ImageSource::new(path);
    assert!(matches!(
        session.dispatch(Intent::PickImage(source.clone())),
        DispatchOutcome::Scheduled(_)
    ));
    assert!(session.wait_idle(WAIT));
    source
}

#[test]
fn test_full_flow_preview_then_save() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(RenderingTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder.clone()));

    let source = picked_session(dir.path(), &mut session, 400, 300);
    let s = session.state();
    assert_eq!(s.original_width, Some(400));
    assert_eq!(s.original_height, Some(300));
    assert_eq!((s.target_width, s.target_height), (400, 300));
    assert!(s.original_size.unwrap() > 0);
    assert!(s.estimated_size.is_some());

    assert_eq!(session.dispatch(Intent::SetWidth(1000)), DispatchOutcome::Applied);
    assert_eq!(session.state().target_width, 400);
    session.dispatch(Intent::SetWidth(200));
    session.dispatch(Intent::SetHeight(150));

    let outcome = session.dispatch(Intent::Compress(source.clone()));
    assert!(matches!(outcome, DispatchOutcome::Scheduled(_)));
    assert!(session.state().is_processing);
    assert!(session.wait_idle(WAIT));

    let s = session.state().clone();
    assert!(!s.is_processing);
    assert!(s.error_message.is_none());
    let preview = s.compressed_source.clone().unwrap();
    assert_eq!(
        preview.path(),
        dir.path().join("scratch").join("holiday_200x150.jpg")
    );
    assert_eq!((s.compressed_width, s.compressed_height), (Some(200), Some(150)));
    assert_eq!(
        s.reduced_size,
        Some(s.original_size.unwrap() as i64 - s.compressed_size.unwrap() as i64)
    );

    assert!(matches!(
        session.dispatch(Intent::SaveToPhoto),
        DispatchOutcome::Scheduled(_)
    ));
    assert!(session.wait_idle(WAIT));
    let saved = session.state().compressed_source.clone().unwrap();
    assert_eq!(
        saved.path(),
        dir.path().join("gallery").join("holiday_ReSized.jpg")
    );
    assert!(saved.path().exists());
    assert!(!dir.path().join("scratch").join("final.jpg").exists());

    session.dispatch(Intent::SaveToPhoto);
    assert!(session.wait_idle(WAIT));
    assert_eq!(
        session.state().compressed_source.as_ref().unwrap().path(),
        dir.path().join("gallery").join("holiday_ReSized_1.jpg")
    );

    let requests = transcoder.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].quality, DEFAULT_PREVIEW_QUALITY);
    assert_eq!(requests[1].quality, 80);
    assert_eq!(requests[1].input, source.path());
}

#[test]
fn test_png_output_name_and_lossless_flag() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(RenderingTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder.clone()));
    let source = picked_session(dir.path(), &mut session, 64, 48);

    session.dispatch(Intent::SetFormat(OutputFormat::Png));
    session.dispatch(Intent::Compress(source));
    assert!(session.wait_idle(WAIT));
    session.dispatch(Intent::SaveToPhoto);
    assert!(session.wait_idle(WAIT));

    let saved = session.state().compressed_source.clone().unwrap();
    assert_eq!(saved.path().file_name().unwrap(), "holiday_ReSized.png");
    assert!(transcoder.requests().iter().all(|r| r.format.is_lossless()));
}

#[test]
fn test_pick_missing_file_yields_unknown_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(common::services(
        dir.path(),
        Arc::new(RenderingTranscoder::default()),
    ));
    session.dispatch(Intent::PickImage(ImageSource::new(dir.path().join("gone.jpg"))));
    assert!(session.wait_idle(WAIT));

    let s = session.state();
    assert_eq!(s.original_width, None);
    assert_eq!(s.original_size, None);
    assert_eq!(s.estimated_size, Some(0));
    assert!(s.error_message.is_none());
}

#[test]
fn test_transcode_failure_sets_error_and_keeps_results() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(FailingTranscoder {
        diagnostics: "Invalid data found when processing input".to_string(),
    });
    let mut session = Session::new(common::services(dir.path(), transcoder));
    let source = picked_session(dir.path(), &mut session, 32, 32);

    session.dispatch(Intent::Compress(source));
    assert!(session.wait_idle(WAIT));

    let s = session.state().clone();
    assert!(!s.is_processing);
    assert!(s.compressed_source.is_none());
    let message = s.error_message.clone().unwrap();
    assert!(message.contains("Invalid data found"), "got: {message}");

    session.dispatch(Intent::ClearError);
    assert!(session.state().error_message.is_none());
    assert_eq!(session.state().original_width, Some(32));
}

#[test]
fn test_concurrent_compress_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(GatedTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder.clone()));
    let source = picked_session(dir.path(), &mut session, 40, 30);

    assert!(matches!(
        session.dispatch(Intent::Compress(source.clone())),
        DispatchOutcome::Scheduled(_)
    ));
    let busy = session.state().clone();
    assert_eq!(
        session.dispatch(Intent::Compress(source)),
        DispatchOutcome::Rejected
    );
    assert_eq!(session.dispatch(Intent::SaveToPhoto), DispatchOutcome::Rejected);
    assert_eq!(session.state(), &busy);
    assert!(!session.is_idle());

    transcoder.release();
    assert!(session.wait_idle(WAIT));
    assert_eq!(transcoder.inner.requests().len(), 1);
    assert!(session.state().compressed_source.is_some());
}

#[test]
fn test_reset_cancels_in_flight_transcode() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(GatedTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder.clone()));
    let source = picked_session(dir.path(), &mut session, 40, 30);

    session.dispatch(Intent::Compress(source));
    assert_eq!(session.dispatch(Intent::Reset), DispatchOutcome::Applied);
    assert!(session.is_idle());
    assert_eq!(session.state(), &EditState::default());

    for _ in 0..200 {
        if transcoder.cancelled.load(Ordering::SeqCst) {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(transcoder.cancelled.load(Ordering::SeqCst));

    thread::sleep(Duration::from_millis(20));
    assert_eq!(session.poll(), 0);
    assert_eq!(session.state(), &EditState::default());
}

#[test]
fn test_new_pick_discards_stale_preview() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(GatedTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder.clone()));
    let first = picked_session(dir.path(), &mut session, 40, 30);

    session.dispatch(Intent::Compress(first));

    let second_path = dir.path().join("second.png");
    common::write_test_image(&second_path, 20, 10);
    let second = ImageSource::new(second_path);
    session.dispatch(Intent::PickImage(second.clone()));
    transcoder.release();
    assert!(session.wait_idle(WAIT));
    thread::sleep(Duration::from_millis(20));
    session.poll();

    let s = session.state();
    assert_eq!(s.image_source.as_ref(), Some(&second));
    assert_eq!(s.original_width, Some(20));
    assert!(s.compressed_source.is_none());
    assert!(!s.is_processing);
}

#[test]
fn test_settings_changed_during_compress_survive() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(GatedTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder.clone()));
    let source = picked_session(dir.path(), &mut session, 40, 30);

    session.dispatch(Intent::Compress(source));
    session.dispatch(Intent::SetQuality(55));
    transcoder.release();
    assert!(session.wait_idle(WAIT));

    assert_eq!(session.state().quality, 55);
    assert!(session.state().compressed_source.is_some());
}

#[test]
fn test_preconditions_surface_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(common::services(
        dir.path(),
        Arc::new(RenderingTranscoder::default()),
    ));

    assert_eq!(
        session.dispatch(Intent::Compress(ImageSource::new("x.png"))),
        DispatchOutcome::Rejected
    );
    assert_eq!(session.state().error_message.as_deref(), Some("No image selected"));

    session.dispatch(Intent::ClearError);
    let _ = picked_session(dir.path(), &mut session, 8, 8);
    assert_eq!(session.dispatch(Intent::SaveToPhoto), DispatchOutcome::Rejected);
    assert_eq!(session.state().error_message.as_deref(), Some("Nothing to save yet"));
}

#[test]
fn test_wait_idle_accepts_unbounded_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = Arc::new(RenderingTranscoder::default());
    let mut session = Session::new(common::services(dir.path(), transcoder));

    assert!(session.wait_idle(Duration::MAX));

    let path = dir.path().join("sunset.png");
    common::write_test_image(&path, 30, 20);
    session.dispatch(Intent::PickImage(ImageSource::new(path)));
    assert!(session.wait_idle(Duration::MAX));
    assert_eq!(session.state().original_width, Some(30));
}

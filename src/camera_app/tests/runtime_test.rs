use super::fixture::Fixture;
use crate::camera_app::core::{CameraState, Msg, MESSAGE_NO_FRAME};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_requests_never_overlap() {
    let mut fixture = Fixture::new();
    assert!(fixture.pump_until(TIMEOUT, |f| f.runtime.model().frame.is_some()));

    fixture.runtime.dispatch(Msg::StartClicked);
    assert!(fixture.pump_until(TIMEOUT, |f| f.inference_client.calls() >= 4));

    assert_eq!(fixture.inference_client.max_in_flight(), 1);
}

#[test]
fn test_stop_halts_requests_until_next_start() {
    let mut fixture = Fixture::new();
    assert!(fixture.pump_until(TIMEOUT, |f| f.runtime.model().frame.is_some()));

    fixture.runtime.dispatch(Msg::StartClicked);
    assert!(fixture.pump_until(TIMEOUT, |f| f.inference_client.calls() >= 2));

    fixture.runtime.dispatch(Msg::StopClicked);
    assert!(fixture.pump_until(TIMEOUT, |f| !f.runtime.model().request_in_flight));
    let calls_after_stop = fixture.inference_client.calls();

    fixture.pump_for(Duration::from_millis(200));
    assert_eq!(fixture.inference_client.calls(), calls_after_stop);

    fixture.runtime.dispatch(Msg::StartClicked);
    assert!(fixture.pump_until(TIMEOUT, |f| f.inference_client.calls() > calls_after_stop));
}

#[test]
fn test_camera_read_failures_keep_the_loop_running() {
    let mut fixture = Fixture::with(1.0, |client| client);
    assert!(fixture.pump_until(TIMEOUT, |f| f.runtime.model().camera_error.is_some()));

    fixture.pump_for(Duration::from_millis(50));
    let model = fixture.runtime.model();
    assert_eq!(model.camera, CameraState::Available);
    assert!(model.frame.is_none());

    fixture.runtime.dispatch(Msg::StartClicked);
    assert_eq!(fixture.runtime.model().response, MESSAGE_NO_FRAME);

    fixture.pump_for(Duration::from_millis(50));
    assert!(fixture.runtime.model().processing);
    assert_eq!(fixture.inference_client.calls(), 0);
}

#[test]
fn test_http_error_is_displayed() {
    let mut fixture = Fixture::with(0.0, |client| client.failing_with(500, "internal boom"));
    assert!(fixture.pump_until(TIMEOUT, |f| f.runtime.model().frame.is_some()));

    fixture.runtime.dispatch(Msg::StartClicked);
    assert!(fixture.pump_until(TIMEOUT, |f| f
        .runtime
        .model()
        .response
        .starts_with("Error:")));

    let model = fixture.runtime.model();
    assert_eq!(model.response, "Error: Server error: 500 - internal boom");
    assert!(model.processing);
}

#[test]
fn test_idle_ui_holds_only_the_newest_frame() {
    let mut fixture = Fixture::new();
    assert!(fixture.pump_until(TIMEOUT, |f| f.runtime.model().frame.is_some()));
    let frames_seen = fixture.runtime.model().frame_count;

    std::thread::sleep(Duration::from_millis(300));
    let handled = fixture.runtime.pump();

    assert_eq!(handled, 1);
    assert_eq!(fixture.runtime.model().frame_count, frames_seen + 1);
}

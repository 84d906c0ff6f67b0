use super::fixture::test_config;
use crate::camera_app::core::{
    init, transition, Alert, CameraState, Effect, Model, Msg, MESSAGE_CAMERA_ERROR,
    MESSAGE_CAMERA_NOT_AVAILABLE,
    MESSAGE_CAMERA_READY, MESSAGE_NO_FRAME, MESSAGE_PROCESSING_STARTED,
    MESSAGE_PROCESSING_STOPPED,
};
use crate::config::Config;
use crate::device_camera::interface::Frame;
use crate::inference::interface::InferenceError;
use image::Rgb;
use std::sync::Arc;
use std::time::Duration;

fn ready_model(config: &Config) -> Model {
    let (model, _) = init(config);
    let (model, _) = transition(config, model, Msg::CameraOpenDone(Ok(())));
    let (model, _) = transition(
        config,
        model,
        Msg::FrameCaptureDone(Ok(Frame::from_pixel(4, 4, Rgb([1, 2, 3])))),
    );
    model
}

fn processing_model(config: &Config) -> Model {
    let (model, _) = transition(config, ready_model(config), Msg::StartClicked);
    model
}

fn count_sends(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::SendInference { .. }))
        .count()
}

#[test]
fn test_init() {
    let config = Config::default();
    let (model, effects) = init(&config);

    assert_eq!(model.camera, CameraState::Initializing);
    assert!(!model.processing);
    assert!(!model.request_in_flight);
    assert_eq!(model.base_url, "http://localhost:8080");
    assert_eq!(effects, vec![Effect::OpenCamera]);
}

#[test]
fn test_camera_open_flow() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (opened, effects) = transition(&config, model.clone(), Msg::CameraOpenDone(Ok(())));
    assert_eq!(opened.camera, CameraState::Available);
    assert_eq!(opened.response, MESSAGE_CAMERA_READY);
    assert_eq!(effects, vec![Effect::SubscribeFrames]);

    let (failed, effects) = transition(&config, model, Msg::CameraOpenDone(Err("busy".into())));
    assert_eq!(failed.camera, CameraState::Unavailable);
    assert_eq!(
        failed.response,
        "Error accessing camera. Make sure it is not used elsewhere and that permissions are granted."
    );
    assert_eq!(failed.response, MESSAGE_CAMERA_ERROR);
    assert_eq!(failed.camera_error.as_deref(), Some("busy"));
    assert_eq!(
        failed.alert,
        Some(Alert {
            title: "Camera error".to_string(),
            text: "Unable to access the camera.".to_string(),
        })
    );
    assert!(effects.is_empty());
}

#[test]
fn test_refused_start_raises_alert_until_dismissed() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, _) = transition(&config, model, Msg::StartClicked);
    assert_eq!(
        model.alert.as_ref().map(|alert| alert.title.as_str()),
        Some("Camera")
    );

    let (model, effects) = transition(&config, model, Msg::AlertDismissed);
    assert_eq!(model.alert, None);
    assert!(effects.is_empty());
}

#[test]
fn test_encode_failure_is_shown_and_clears_in_flight() {
    let config = Config::default();
    let model = processing_model(&config);

    let (model, _) = transition(
        &config,
        model,
        Msg::InferenceDone(Err(InferenceError::Encode("Image too small".to_string()))),
    );

    assert_eq!(model.response, "Error: Failed to encode image: Image too small");
    assert!(!model.request_in_flight);
}

#[test]
fn test_start_requires_camera() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, effects) = transition(&config, model, Msg::StartClicked);

    assert!(!model.processing);
    assert_eq!(model.response, MESSAGE_CAMERA_NOT_AVAILABLE);
    assert!(effects.is_empty());
}

#[test]
fn test_start_sends_immediately_and_schedules_next() {
    let config = Config::default();
    let model = ready_model(&config);

    let (model, effects) = transition(&config, model, Msg::StartClicked);

    assert!(model.processing);
    assert!(model.request_in_flight);
    assert_eq!(model.session, 1);
    assert_eq!(model.response, MESSAGE_PROCESSING_STARTED);
    assert_eq!(effects.len(), 2);
    assert!(matches!(
        &effects[0],
        Effect::SendInference { base_url, instruction, .. }
            if base_url == "http://localhost:8080" && instruction == "What do you see?"
    ));
    assert_eq!(
        effects[1],
        Effect::ScheduleSend {
            session: 1,
            delay: Duration::from_millis(500),
        }
    );
}

#[test]
fn test_start_without_frame_reschedules() {
    let config = Config::default();
    let (model, _) = init(&config);
    let (model, _) = transition(&config, model, Msg::CameraOpenDone(Ok(())));

    let (model, effects) = transition(&config, model, Msg::StartClicked);

    assert!(model.processing);
    assert!(!model.request_in_flight);
    assert_eq!(model.response, MESSAGE_NO_FRAME);
    assert_eq!(count_sends(&effects), 0);
    assert!(matches!(effects[..], [Effect::ScheduleSend { session: 1, .. }]));
}

#[test]
fn test_send_due_while_in_flight_only_reschedules() {
    let config = Config::default();
    let model = processing_model(&config);
    assert!(model.request_in_flight);

    let (model, effects) = transition(&config, model, Msg::SendDue { session: 1 });

    assert!(model.request_in_flight);
    assert_eq!(count_sends(&effects), 0);
    assert_eq!(
        effects,
        vec![Effect::ScheduleSend {
            session: 1,
            delay: Duration::from_millis(500),
        }]
    );
}

#[test]
fn test_send_due_after_reply_sends_again() {
    let config = Config::default();
    let model = processing_model(&config);

    let (model, _) = transition(
        &config,
        model,
        Msg::InferenceDone(Ok("A cat on a sofa.".to_string())),
    );
    assert!(!model.request_in_flight);
    assert_eq!(model.response, "A cat on a sofa.");

    let (model, effects) = transition(&config, model, Msg::SendDue { session: 1 });
    assert!(model.request_in_flight);
    assert_eq!(count_sends(&effects), 1);
}

#[test]
fn test_no_sends_after_stop() {
    let config = Config::default();
    let model = processing_model(&config);

    let (model, effects) = transition(&config, model, Msg::StopClicked);
    assert!(!model.processing);
    assert_eq!(model.response, MESSAGE_PROCESSING_STOPPED);
    assert!(effects.is_empty());

    let (model, _) = transition(&config, model, Msg::InferenceDone(Ok("late".to_string())));
    let (_, effects) = transition(&config, model, Msg::SendDue { session: 1 });
    assert!(effects.is_empty());
}

#[test]
fn test_stop_keeps_reply_text() {
    let config = Config::default();
    let model = processing_model(&config);
    let (model, _) = transition(&config, model, Msg::InferenceDone(Ok("A dog.".to_string())));

    let (model, _) = transition(&config, model, Msg::StopClicked);

    assert_eq!(model.response, "A dog.");
}

#[test]
fn test_restart_drops_sends_from_previous_session() {
    let config = Config::default();
    let model = processing_model(&config);
    let (model, _) = transition(&config, model, Msg::InferenceDone(Ok("ok".to_string())));
    let (model, _) = transition(&config, model, Msg::StopClicked);
    let (model, effects) = transition(&config, model, Msg::StartClicked);
    assert_eq!(model.session, 2);
    assert_eq!(count_sends(&effects), 1);

    let (model, _) = transition(&config, model, Msg::InferenceDone(Ok("ok".to_string())));
    let (model, stale) = transition(&config, model, Msg::SendDue { session: 1 });
    assert!(stale.is_empty());
    assert!(!model.request_in_flight);

    let (_, current) = transition(&config, model, Msg::SendDue { session: 2 });
    assert_eq!(count_sends(&current), 1);
}

#[test]
fn test_restart_while_in_flight_waits_for_reply() {
    let config = Config::default();
    let model = processing_model(&config);
    let (model, _) = transition(&config, model, Msg::StopClicked);

    let (model, effects) = transition(&config, model, Msg::StartClicked);

    assert!(model.request_in_flight);
    assert_eq!(count_sends(&effects), 0);
}

#[test]
fn test_server_error_is_shown_with_status_and_body() {
    let config = Config::default();
    let model = processing_model(&config);

    let (model, effects) = transition(
        &config,
        model,
        Msg::InferenceDone(Err(InferenceError::Server {
            status: 500,
            body: "boom".to_string(),
        })),
    );

    assert_eq!(model.response, "Error: Server error: 500 - boom");
    assert!(!model.request_in_flight);
    assert!(model.processing);
    assert!(effects.is_empty());
}

#[test]
fn test_frame_failure_keeps_last_frame() {
    let config = Config::default();
    let model = ready_model(&config);
    let frame = model.frame.clone();

    let (model, effects) = transition(
        &config,
        model,
        Msg::FrameCaptureDone(Err("Empty frame".into())),
    );

    assert_eq!(model.frame, frame);
    assert_eq!(model.camera_error.as_deref(), Some("Empty frame"));
    assert_eq!(model.camera, CameraState::Available);
    assert!(effects.is_empty());
}

#[test]
fn test_new_frame_replaces_previous() {
    let config = Config::default();
    let model = ready_model(&config);
    let next = Frame::from_pixel(4, 4, Rgb([9, 9, 9]));

    let (model, _) = transition(&config, model, Msg::FrameCaptureDone(Ok(next.clone())));

    assert_eq!(model.frame, Some(Arc::new(next)));
    assert_eq!(model.frame_count, 2);
}

#[test]
fn test_inputs_locked_while_processing() {
    let config = test_config();
    let model = processing_model(&config);

    let (model, _) = transition(&config, model, Msg::InstructionChanged("Read the sign".into()));
    let (model, _) = transition(&config, model, Msg::IntervalChanged(Duration::from_millis(500)));
    let (model, _) = transition(&config, model, Msg::BaseUrlChanged("http://other".into()));

    assert_eq!(model.instruction, "What do you see?");
    assert_eq!(model.request_interval, Duration::from_millis(10));
    assert_eq!(model.base_url, "http://other");
}

#[test]
fn test_interval_must_be_a_listed_choice() {
    let config = Config::default();
    let (model, _) = init(&config);

    let (model, _) = transition(&config, model, Msg::IntervalChanged(Duration::from_millis(300)));
    assert_eq!(model.request_interval, Duration::from_millis(500));

    let (model, _) = transition(&config, model, Msg::IntervalChanged(Duration::from_millis(2000)));
    assert_eq!(model.request_interval, Duration::from_millis(2000));
}

#[test]
fn test_send_trims_base_url() {
    let config = Config::default();
    let model = ready_model(&config);
    let (model, _) = transition(&config, model, Msg::BaseUrlChanged("  http://gpu:8080  ".into()));

    let (_, effects) = transition(&config, model, Msg::StartClicked);

    assert!(matches!(
        &effects[0],
        Effect::SendInference { base_url, .. } if base_url == "http://gpu:8080"
    ));
}

#[test]
fn test_close_releases_camera_and_stops() {
    let config = Config::default();
    let model = processing_model(&config);

    let (model, effects) = transition(&config, model, Msg::CloseRequested);

    assert!(!model.processing);
    assert_eq!(effects, vec![Effect::ReleaseCamera]);

    let (_, effects) = transition(&config, model, Msg::SendDue { session: 1 });
    assert!(effects.is_empty());
}

use crate::config::Config;
use crate::device_camera::interface::Frame;
use crate::inference::interface::InferenceError;
use std::sync::Arc;
use std::time::Duration;

pub const MESSAGE_CAMERA_INITIALIZING: &str = "Camera initialisation...";
pub const MESSAGE_CAMERA_READY: &str = "Camera access granted. Ready to start.";
pub const MESSAGE_CAMERA_NOT_AVAILABLE: &str = "Camera not available. Cannot start.";
pub const MESSAGE_PROCESSING_STARTED: &str = "Processing started...";
pub const MESSAGE_PROCESSING_STOPPED: &str = "Processing stopped.";
pub const MESSAGE_NO_FRAME: &str = "Failed to capture image. Stream might not be active.";
pub const MESSAGE_CAMERA_ERROR: &str =
    "Error accessing camera. Make sure it is not used elsewhere and that permissions are granted.";

/// Blocking notice shown in its own window until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub text: String,
}

impl Alert {
    fn new(title: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum CameraState {
    #[default]
    Initializing,
    Available,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub camera: CameraState,
    pub camera_error: Option<String>,
    pub frame: Option<Arc<Frame>>,
    pub frame_count: u64,
    pub processing: bool,
    pub request_in_flight: bool,
    pub session: u64,
    pub base_url: String,
    pub instruction: String,
    pub request_interval: Duration,
    pub response: String,
    pub alert: Option<Alert>,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            camera: CameraState::Initializing,
            camera_error: None,
            frame: None,
            frame_count: 0,
            processing: false,
            request_in_flight: false,
            session: 0,
            base_url: config.base_url.clone(),
            instruction: config.instruction.clone(),
            request_interval: config.request_interval,
            response: MESSAGE_CAMERA_INITIALIZING.to_string(),
            alert: None,
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    CameraOpenDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    FrameCaptureDone(Result<Frame, Box<dyn std::error::Error + Send + Sync>>),
    StartClicked,
    StopClicked,
    SendDue { session: u64 },
    InferenceDone(Result<String, InferenceError>),
    BaseUrlChanged(String),
    InstructionChanged(String),
    IntervalChanged(Duration),
    AlertDismissed,
    CloseRequested,
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::FrameCaptureDone(Ok(frame)) => {
                format!("FrameCaptureDone(Ok({}x{}))", frame.width(), frame.height())
            }
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenCamera,
    SubscribeFrames,
    ScheduleSend {
        session: u64,
        delay: Duration,
    },
    SendInference {
        frame: Arc<Frame>,
        base_url: String,
        instruction: String,
    },
    ReleaseCamera,
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::SendInference {
                frame,
                base_url,
                instruction,
            } => format!(
                "SendInference {{ frame: {}x{}, base_url: {:?}, instruction: {:?} }}",
                frame.width(),
                frame.height(),
                base_url,
                instruction
            ),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    (Model::new(config), vec![Effect::OpenCamera])
}

pub fn transition(config: &Config, mut model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match msg {
        Msg::CameraOpenDone(Ok(())) => {
            model.camera = CameraState::Available;
            model.response = MESSAGE_CAMERA_READY.to_string();
            (model, vec![Effect::SubscribeFrames])
        }
        Msg::CameraOpenDone(Err(e)) => {
            model.camera = CameraState::Unavailable;
            model.camera_error = Some(e.to_string());
            model.response = MESSAGE_CAMERA_ERROR.to_string();
            model.alert = Some(Alert::new("Camera error", "Unable to access the camera."));
            (model, vec![])
        }

        Msg::FrameCaptureDone(Ok(frame)) => {
            model.frame = Some(Arc::new(frame));
            model.frame_count += 1;
            model.camera_error = None;
            (model, vec![])
        }
        // The last good frame stays on screen; the subscription keeps polling.
        Msg::FrameCaptureDone(Err(e)) => {
            model.camera_error = Some(e.to_string());
            (model, vec![])
        }

        Msg::StartClicked => {
            if model.processing {
                return (model, vec![]);
            }
            if model.camera != CameraState::Available {
                model.response = MESSAGE_CAMERA_NOT_AVAILABLE.to_string();
                model.alert = Some(Alert::new(
                    "Camera",
                    "Camera not available. Please check permissions.",
                ));
                return (model, vec![]);
            }

            model.processing = true;
            model.session += 1;
            model.response = MESSAGE_PROCESSING_STARTED.to_string();

            send_due(model)
        }
        Msg::StopClicked => {
            model.processing = false;
            if model.response.starts_with(MESSAGE_PROCESSING_STARTED) {
                model.response = MESSAGE_PROCESSING_STOPPED.to_string();
            }
            (model, vec![])
        }

        Msg::SendDue { session } => {
            if session != model.session {
                return (model, vec![]);
            }
            send_due(model)
        }
        Msg::InferenceDone(result) => {
            model.request_in_flight = false;
            model.response = match result {
                Ok(reply) => reply,
                Err(e) => format!("Error: {}", e),
            };
            (model, vec![])
        }

        Msg::BaseUrlChanged(base_url) => {
            model.base_url = base_url;
            (model, vec![])
        }
        Msg::InstructionChanged(instruction) => {
            if !model.processing {
                model.instruction = instruction;
            }
            (model, vec![])
        }
        Msg::IntervalChanged(interval) => {
            if !model.processing && config.request_interval_choices.contains(&interval) {
                model.request_interval = interval;
            }
            (model, vec![])
        }

        Msg::AlertDismissed => {
            model.alert = None;
            (model, vec![])
        }

        Msg::CloseRequested => {
            model.processing = false;
            model.camera = CameraState::Unavailable;
            (model, vec![Effect::ReleaseCamera])
        }
    }
}

fn send_due(mut model: Model) -> (Model, Vec<Effect>) {
    if !model.processing {
        return (model, vec![]);
    }

    let schedule_next = Effect::ScheduleSend {
        session: model.session,
        delay: model.request_interval,
    };

    if model.request_in_flight {
        return (model, vec![schedule_next]);
    }

    let Some(frame) = model.frame.clone() else {
        model.response = MESSAGE_NO_FRAME.to_string();
        return (model, vec![schedule_next]);
    };

    model.request_in_flight = true;
    let send = Effect::SendInference {
        frame,
        base_url: model.base_url.trim().to_string(),
        instruction: model.instruction.clone(),
    };

    (model, vec![send, schedule_next])
}

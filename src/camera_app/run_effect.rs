use crate::camera_app::core::{Effect, Msg};
use crate::config::Config;
use crate::device_camera::interface::{DeviceCamera, Frame};
use crate::image_codec::{encode_jpeg, jpeg_data_url};
use crate::inference::interface::{InferenceClient, InferenceError, Prompt};
use crate::library::logger::interface::Logger;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError, Weak};

pub type Wake = Arc<dyn Fn() + Send + Sync>;

pub type FrameResult = Result<Frame, Box<dyn std::error::Error + Send + Sync>>;

/// Holds only the newest capture. Each write drops whatever was not taken.
#[derive(Default)]
pub struct FrameSlot {
    latest: Mutex<Option<FrameResult>>,
}

impl FrameSlot {
    /// Returns true when the slot was empty before this write.
    pub fn put(&self, frame: FrameResult) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(frame)
            .is_none()
    }

    pub fn take(&self) -> Option<FrameResult> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    inference_client: Arc<dyn InferenceClient + Send + Sync>,
    msg_sender: Sender<Msg>,
    frame_slot: Weak<FrameSlot>,
    wake: Wake,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        inference_client: Arc<dyn InferenceClient + Send + Sync>,
        msg_sender: Sender<Msg>,
        frame_slot: Weak<FrameSlot>,
        wake: Wake,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            device_camera,
            inference_client,
            msg_sender,
            frame_slot,
            wake,
        }
    }

    fn send(&self, msg: Msg) {
        let _ = self.msg_sender.send(msg);
        (self.wake)();
    }

    pub fn spawn(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.run_effect(effect));
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::OpenCamera => {
                let opened = self.device_camera.open();
                if let Err(e) = &opened {
                    let _ = self.logger.error(&format!("Camera open failed: {}", e));
                }
                self.send(Msg::CameraOpenDone(opened));
            }
            // Frames bypass the channel so an idle UI holds one frame, not a backlog.
            Effect::SubscribeFrames => loop {
                std::thread::sleep(self.config.frame_rate);
                let frame = self.device_camera.capture_frame();
                let Some(frame_slot) = self.frame_slot.upgrade() else {
                    break;
                };
                if frame_slot.put(frame) {
                    (self.wake)();
                }
            },
            Effect::ScheduleSend { session, delay } => {
                std::thread::sleep(delay);
                self.send(Msg::SendDue { session });
            }
            Effect::SendInference {
                frame,
                base_url,
                instruction,
            } => {
                let result = encode_jpeg(&frame, self.config.jpeg_quality)
                    .map_err(|e| InferenceError::Encode(e.to_string()))
                    .and_then(|jpeg| {
                        let prompt = Prompt {
                            instruction,
                            image_data_url: jpeg_data_url(&jpeg),
                        };
                        self.inference_client.complete(&base_url, &prompt)
                    });
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Inference failed: {}", e));
                }
                self.send(Msg::InferenceDone(result));
            }
            Effect::ReleaseCamera => {
                if let Err(e) = self.device_camera.release() {
                    let _ = self.logger.error(&format!("Camera release failed: {}", e));
                }
            }
        }
    }
}

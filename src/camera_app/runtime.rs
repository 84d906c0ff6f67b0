use crate::camera_app::core::{init, transition, Effect, Model, Msg};
use crate::camera_app::run_effect::{FrameSlot, RunEffect, Wake};
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::inference::interface::InferenceClient;
use crate::library::logger::interface::Logger;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Owns the model. Every message goes through `dispatch` on the thread that
/// owns the runtime; effects run on their own threads and report back
/// through the channel drained by `pump`.
pub struct Runtime {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    model: Model,
    pending_effects: Vec<Effect>,
    msg_receiver: Receiver<Msg>,
    frame_slot: Arc<FrameSlot>,
    run_effect: RunEffect,
}

impl Runtime {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        inference_client: Arc<dyn InferenceClient + Send + Sync>,
        wake: Wake,
    ) -> Self {
        let (msg_sender, msg_receiver) = channel();
        let (model, effects) = init(&config);
        let frame_slot = Arc::new(FrameSlot::default());
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            device_camera,
            inference_client,
            msg_sender,
            Arc::downgrade(&frame_slot),
            wake,
        );

        Self {
            config,
            logger: logger.with_namespace("runtime"),
            model,
            pending_effects: effects,
            msg_receiver,
            frame_slot,
            run_effect,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Spawns the effects produced by `init`.
    pub fn start(&mut self) {
        let effects = std::mem::take(&mut self.pending_effects);
        self.run_effect.spawn(effects);
    }

    pub fn dispatch(&mut self, msg: Msg) {
        match &msg {
            Msg::FrameCaptureDone(Ok(_)) => {}
            Msg::FrameCaptureDone(Err(e)) => {
                let _ = self.logger.error(&format!("Frame read failed: {}", e));
            }
            msg => {
                let _ = self
                    .logger
                    .info(&format!("msg: {}", msg.to_display_string()));
            }
        }

        let (model, effects) = transition(&self.config, self.model.clone(), msg);
        self.model = model;

        if !effects.is_empty() {
            let _ = self.logger.info(&format!(
                "effects: [{}]",
                effects
                    .iter()
                    .map(Effect::to_display_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        self.run_effect.spawn(effects);
    }

    /// Applies the newest frame, if any, and every message that has arrived
    /// since the last call.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        if let Some(frame) = self.frame_slot.take() {
            self.dispatch(Msg::FrameCaptureDone(frame));
            handled += 1;
        }
        while let Ok(msg) = self.msg_receiver.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }
}

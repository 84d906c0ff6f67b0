use crate::camera_app::core::Msg;
use crate::camera_app::render::render;
use crate::camera_app::run_effect::Wake;
use crate::camera_app::runtime::Runtime;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::inference::interface::InferenceClient;
use crate::library::logger::interface::Logger;
use std::sync::Arc;

pub struct CameraApp {
    runtime: Runtime,
    preview: Option<egui::TextureHandle>,
    preview_frame_count: u64,
    close_dispatched: bool,
}

impl CameraApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        inference_client: Arc<dyn InferenceClient + Send + Sync>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let wake: Wake = Arc::new(move || ctx.request_repaint());

        let mut runtime = Runtime::new(config, logger, device_camera, inference_client, wake);
        runtime.start();

        Self {
            runtime,
            preview: None,
            preview_frame_count: 0,
            close_dispatched: false,
        }
    }

    /// Uploads the newest frame to the GPU, at most once per frame received.
    fn sync_preview(&mut self, ctx: &egui::Context) {
        let model = self.runtime.model();
        if model.frame_count == self.preview_frame_count {
            return;
        }
        let Some(frame) = &model.frame else {
            return;
        };

        let image = egui::ColorImage::from_rgb(
            [frame.width() as usize, frame.height() as usize],
            frame.as_raw(),
        );
        match &mut self.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview =
                    Some(ctx.load_texture("camera_preview", image, egui::TextureOptions::LINEAR));
            }
        }
        self.preview_frame_count = model.frame_count;
    }
}

impl eframe::App for CameraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.runtime.pump();

        if !self.close_dispatched && ctx.input(|i| i.viewport().close_requested()) {
            self.close_dispatched = true;
            self.runtime.dispatch(Msg::CloseRequested);
        }

        self.sync_preview(ctx);

        let msgs = render(
            ctx,
            self.runtime.config(),
            self.runtime.model(),
            self.preview.as_ref(),
        );
        for msg in msgs {
            self.runtime.dispatch(msg);
        }

        ctx.request_repaint_after(self.runtime.config().frame_rate);
    }
}

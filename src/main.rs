use camera_app::gui::CameraApp;
use clap::Parser;
use cli::Args;
use config::Config;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use inference::impl_fake::InferenceClientFake;
use inference::impl_http::InferenceClientHttp;
use inference::interface::InferenceClient;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::sync::Arc;
use std::time::Duration;

mod camera_app;
mod cli;
mod config;
mod device_camera;
mod image_codec;
mod inference;
mod library;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone)).with_namespace("cam_reco");

    let device_camera = build_device_camera(&args, &config, logger.clone());

    let inference_client: Arc<dyn InferenceClient + Send + Sync> = if args.offline {
        Arc::new(InferenceClientFake::new(
            logger.clone(),
            Duration::from_millis(300),
        ))
    } else {
        Arc::new(InferenceClientHttp::new(
            logger.clone(),
            config.max_tokens,
            config.request_timeout,
        ))
    };

    let _ = logger.info(&format!(
        "Starting with base url {} and interval {}ms",
        config.base_url,
        config.request_interval.as_millis()
    ));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Camera Interaction App",
        options,
        Box::new(move |cc| {
            Box::new(CameraApp::new(
                cc,
                config,
                logger,
                device_camera,
                inference_client,
            ))
        }),
    )?;

    Ok(())
}

#[cfg(feature = "camera-opencv")]
fn build_device_camera(
    args: &Args,
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    use device_camera::impl_opencv::DeviceCameraOpenCv;

    if args.fake_camera {
        return Arc::new(DeviceCameraFake::new(logger, config.camera_resolution));
    }
    Arc::new(DeviceCameraOpenCv::new(
        logger,
        config.camera_index,
        config.camera_resolution,
    ))
}

#[cfg(not(feature = "camera-opencv"))]
fn build_device_camera(
    args: &Args,
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn DeviceCamera + Send + Sync> {
    if !args.fake_camera {
        let _ = logger.info("Built without the camera-opencv feature, using the test pattern camera");
    }
    Arc::new(DeviceCameraFake::new(logger, config.camera_resolution))
}

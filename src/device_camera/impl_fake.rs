use crate::device_camera::interface::{DeviceCamera, Frame};
use crate::library::logger::interface::Logger;
use image::Rgb;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Renders a moving test pattern. Reads fail at random with `failure_rate`.
pub struct DeviceCameraFake {
    width: u32,
    height: u32,
    failure_rate: f32,
    opened: AtomicBool,
    frame_count: AtomicU64,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, resolution: (u32, u32)) -> Self {
        Self {
            width: resolution.0,
            height: resolution.1,
            failure_rate: 0.0,
            opened: AtomicBool::new(false),
            frame_count: AtomicU64::new(0),
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    pub fn with_failure_rate(mut self, failure_rate: f32) -> Self {
        self.failure_rate = failure_rate;
        self
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Opening camera at {}x{}",
            self.width, self.height
        ))?;
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Releasing camera")?;
        self.opened.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        if !self.opened.load(Ordering::SeqCst) {
            return Err("Camera is not open".into());
        }

        if rand::random::<f32>() < self.failure_rate {
            return Err("Failed to read frame".into());
        }

        let tick = self.frame_count.fetch_add(1, Ordering::SeqCst);
        let bar_x = (tick * 8 % u64::from(self.width.max(1))) as u32;
        let (width, height) = (self.width, self.height);

        let frame = Frame::from_fn(width, height, |x, y| {
            if x.abs_diff(bar_x) < 12 {
                return Rgb([255, 255, 255]);
            }
            let noise = rand::random::<u8>() / 16;
            Rgb([
                ((x * 255) / width.max(1)) as u8 ^ noise,
                ((y * 255) / height.max(1)) as u8,
                (tick % 256) as u8,
            ])
        });

        Ok(frame)
    }
}

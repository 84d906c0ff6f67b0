use crate::device_camera::interface::{DeviceCamera, Frame};
use crate::library::logger::interface::Logger;
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::sync::{Arc, Mutex, PoisonError};

pub struct DeviceCameraOpenCv {
    index: i32,
    resolution: (u32, u32),
    capture: Mutex<Option<VideoCapture>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraOpenCv {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, index: i32, resolution: (u32, u32)) -> Self {
        Self {
            index,
            resolution,
            capture: Mutex::new(None),
            logger: logger.with_namespace("camera").with_namespace("opencv"),
        }
    }
}

impl DeviceCamera for DeviceCameraOpenCv {
    fn open(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger
            .info(&format!("Opening camera device {}", self.index))?;

        let mut capture = VideoCapture::new(self.index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(format!("Failed to open camera device {}", self.index).into());
        }

        // Drivers may ignore the requested size; frames carry their own dimensions.
        capture.set(videoio::CAP_PROP_FRAME_WIDTH, f64::from(self.resolution.0))?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, f64::from(self.resolution.1))?;

        *self.capture.lock().unwrap_or_else(PoisonError::into_inner) = Some(capture);
        self.logger.info("Camera opened")?;
        Ok(())
    }

    fn release(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut capture) = guard.take() {
            self.logger.info("Releasing camera")?;
            capture.release()?;
        }
        Ok(())
    }

    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        let capture = guard.as_mut().ok_or("Camera is not open")?;

        let mut bgr = Mat::default();
        if !capture.read(&mut bgr)? || bgr.empty() {
            return Err("Empty frame".into());
        }
        drop(guard);

        let mut rgb = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        let width = u32::try_from(rgb.cols())?;
        let height = u32::try_from(rgb.rows())?;
        let bytes = rgb.data_bytes()?.to_vec();

        Frame::from_raw(width, height, bytes).ok_or_else(|| "Frame buffer size mismatch".into())
    }
}

use image::RgbImage;

pub type Frame = RgbImage;

pub trait DeviceCamera {
    fn open(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn release(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>>;
}

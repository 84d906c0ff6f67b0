use crate::device_camera::interface::Frame;
use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;

pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(frame)?;
    Ok(buffer)
}

pub fn jpeg_data_url(jpeg: &[u8]) -> String {
    format!(
        "data:image/jpeg;base64,{}",
        general_purpose::STANDARD.encode(jpeg)
    )
}

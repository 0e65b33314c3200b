use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageOutputFormat};
use log::{debug, info};
use std::io::Cursor;

use crate::config::ImageConfig;
use crate::errors::VisionError;

/// Minimum number of bytes needed to sniff a format
const MIN_FORMAT_BYTES: usize = 8;

/// Decode a photo, stretch it to the configured square and re-encode as JPEG.
///
/// The aspect ratio is not preserved. Any format the `image` crate can decode
/// is accepted; anything else yields [`VisionError::Decode`].
pub fn prepare_photo(bytes: &[u8], config: &ImageConfig) -> Result<Vec<u8>, VisionError> {
    if let Some(format) = detect_image_format(bytes) {
        debug!("Preparing {:?} photo of {} bytes", format, bytes.len());
    }

    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = (decoded.width(), decoded.height());

    let resized = decoded.resize_exact(
        config.target_width,
        config.target_height,
        FilterType::CatmullRom,
    );

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut output = Vec::new();
    rgb.write_to(
        &mut Cursor::new(&mut output),
        ImageOutputFormat::Jpeg(config.jpeg_quality),
    )?;

    info!(
        "Photo resized from {}x{} to {}x{}, {} JPEG bytes",
        width,
        height,
        config.target_width,
        config.target_height,
        output.len()
    );

    Ok(output)
}

/// Guess the container format from the leading bytes of a photo
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.len() < MIN_FORMAT_BYTES {
        debug!(
            "Could not read enough bytes to determine image format (read {}, need at least {})",
            bytes.len(),
            MIN_FORMAT_BYTES
        );
        return None;
    }

    match image::guess_format(bytes) {
        Ok(format) => Some(format),
        Err(e) => {
            debug!("Could not determine image format: {}", e);
            None
        }
    }
}

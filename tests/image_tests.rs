//! # Image Preprocessing Tests
//!
//! Checks that any decodable photo comes out as a 512x512 JPEG.

use homework_bot::config::ImageConfig;
use homework_bot::errors::VisionError;
use homework_bot::image_processing::{detect_image_format, prepare_photo};
use image::{DynamicImage, ImageFormat, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(image: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test wide, tall, tiny and already-square inputs all become 512x512 JPEGs
    #[test]
    fn test_output_is_always_512_square_jpeg() {
        let config = ImageConfig::default();

        for (width, height) in [(1280, 720), (300, 900), (7, 3), (512, 512)] {
            let input = encode(gradient(width, height), ImageOutputFormat::Png);
            let output = prepare_photo(&input, &config).unwrap();

            assert_eq!(detect_image_format(&output), Some(ImageFormat::Jpeg));
            let decoded = image::load_from_memory(&output).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (512, 512));
        }
    }

    /// Test JPEG input is accepted as well as PNG
    #[test]
    fn test_jpeg_input() {
        let input = encode(gradient(640, 480), ImageOutputFormat::Jpeg(90));
        assert_eq!(detect_image_format(&input), Some(ImageFormat::Jpeg));

        let output = prepare_photo(&input, &ImageConfig::default()).unwrap();
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (512, 512));
    }

    /// Test transparent images lose their alpha channel instead of failing
    #[test]
    fn test_alpha_channel_is_dropped() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([10, 20, 30, 100])));
        let input = encode(rgba, ImageOutputFormat::Png);

        let output = prepare_photo(&input, &ImageConfig::default()).unwrap();
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (512, 512));
    }

    /// Test custom target sizes are honoured
    #[test]
    fn test_custom_target_size() {
        let config = ImageConfig {
            target_width: 128,
            target_height: 64,
            ..Default::default()
        };
        let input = encode(gradient(100, 100), ImageOutputFormat::Png);
        let output = prepare_photo(&input, &config).unwrap();
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (128, 64));
    }

    /// Test undecodable bytes surface as a decode error
    #[test]
    fn test_garbage_is_decode_error() {
        let result = prepare_photo(b"definitely not an image at all", &ImageConfig::default());
        assert!(matches!(result, Err(VisionError::Decode(_))));

        let result = prepare_photo(&[], &ImageConfig::default());
        assert!(matches!(result, Err(VisionError::Decode(_))));
    }

    /// Test format detection on short and unknown input
    #[test]
    fn test_detect_format_edge_cases() {
        assert_eq!(detect_image_format(&[0xFF, 0xD8]), None);
        assert_eq!(detect_image_format(b"plain text, no magic"), None);

        let png = encode(gradient(4, 4), ImageOutputFormat::Png);
        assert_eq!(detect_image_format(&png), Some(ImageFormat::Png));
    }
}

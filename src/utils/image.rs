//! Image loading and channel conversion helpers.
//!
//! The pipeline works on 8-bit RGB buffers internally; these functions decode
//! uploads (files or byte streams) into that representation and derive the
//! single-channel images the detection stages need.

use crate::core::RectifyError;
use image::{DynamicImage, GrayImage, RgbImage};

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns [`RectifyError::ImageDecode`] if the file is not a decodable
/// raster image.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, RectifyError> {
    let img = image::open(path).map_err(RectifyError::ImageDecode)?;
    Ok(dynamic_to_rgb(img))
}

/// Decodes an image from an in-memory byte buffer and converts it to
/// RgbImage.
///
/// This is the entry point for uploaded byte streams; the format (JPEG, PNG,
/// ...) is guessed from the content.
///
/// # Errors
///
/// Returns [`RectifyError::ImageDecode`] if the bytes are not a decodable
/// raster image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, RectifyError> {
    let img = image::load_from_memory(bytes).map_err(RectifyError::ImageDecode)?;
    Ok(dynamic_to_rgb(img))
}

/// Extracts the saturation channel of an RGB image, as in the HSV color
/// space.
///
/// Saturation is computed per pixel as `255 * (max - min) / max` over the
/// three channels, with zero for black pixels. Receipt paper is
/// low-saturation, so this channel separates it well from colorful
/// backgrounds.
pub fn saturation_channel(image: &RgbImage) -> GrayImage {
    let mut out = GrayImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        let max = src.0.iter().copied().max().unwrap_or(0) as u16;
        let min = src.0.iter().copied().min().unwrap_or(0) as u16;
        dst.0[0] = if max == 0 {
            0
        } else {
            ((max - min) * 255 / max) as u8
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_decode_image_rejects_garbage() {
        let result = decode_image(&[0u8, 1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(RectifyError::ImageDecode(_))));
    }

    #[test]
    fn test_decode_image_roundtrip_png() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(1, 0, Rgb([10, 200, 30]));

        let mut bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut bytes);
        image::DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(1, 0), &Rgb([10, 200, 30]));
    }

    #[test]
    fn test_saturation_channel_values() {
        let mut img = RgbImage::new(5, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255])); // white: saturation 0
        img.put_pixel(1, 0, Rgb([0, 0, 0])); // black: saturation 0
        img.put_pixel(2, 0, Rgb([255, 0, 0])); // pure red: saturation 255
        img.put_pixel(3, 0, Rgb([200, 100, 100])); // muted red
        img.put_pixel(4, 0, Rgb([200, 50, 125])); // non-integral ratio

        let sat = saturation_channel(&img);
        assert_eq!(sat.get_pixel(0, 0).0[0], 0);
        assert_eq!(sat.get_pixel(1, 0).0[0], 0);
        assert_eq!(sat.get_pixel(2, 0).0[0], 255);
        assert_eq!(sat.get_pixel(3, 0).0[0], (100u32 * 255 / 200) as u8);
        // 150 * 255 / 200 truncates to 191
        assert_eq!(sat.get_pixel(4, 0).0[0], 191);
    }
}

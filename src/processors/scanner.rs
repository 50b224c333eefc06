//! Receipt quadrilateral detection and perspective unwarping.
//!
//! Detection runs on a downscaled copy of the input: the saturation channel
//! is thresholded into a paper-foreground mask, cleaned with morphology, and
//! searched for contours. The boundary quadrilateral is then chosen by an
//! explicit three-tier strategy chain:
//!
//! 1. the first of the largest contours whose polygon approximation has
//!    exactly four vertices,
//! 2. otherwise the minimum-area rectangle of the largest contour,
//! 3. otherwise (no contours at all) the whole image, unrectified.
//!
//! The winning quadrilateral is scaled back to source resolution and the
//! full-resolution image is unwarped to an axis-aligned crop.

use crate::core::ScannerConfig;
use crate::processors::geometry::{Point, Polygon};
use crate::processors::types::QuadTier;
use crate::utils::image::saturation_channel;
use crate::utils::transform::four_point_unwarp;
use image::{GrayImage, RgbImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use tracing::{debug, warn};

/// Detects the receipt boundary in `image` and returns the rectified crop.
///
/// Never fails for structurally valid input: when no usable quadrilateral is
/// found, the original image is returned unchanged.
pub fn scan(image: &RgbImage, config: &ScannerConfig) -> RgbImage {
    scan_with_tier(image, config).0
}

/// Like [`scan`], but also reports which detection tier produced the result.
pub fn scan_with_tier(image: &RgbImage, config: &ScannerConfig) -> (RgbImage, QuadTier) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return (image.clone(), QuadTier::WholeImage);
    }

    // Contour search runs at a fixed working height; remember the ratio to
    // map detected coordinates back to source resolution.
    let ratio = height as f32 / config.working_height as f32;
    let small_width = (((width as f32) / ratio).round() as u32).max(1);
    let small = imageops::resize(
        image,
        small_width,
        config.working_height,
        imageops::FilterType::Triangle,
    );

    let mask = foreground_mask(&small, config);

    let Some((quad, tier)) = detect_quad(&mask, config) else {
        debug!("no contours detected, keeping the whole image");
        return (image.clone(), QuadTier::WholeImage);
    };

    let scaled = quad.map(|p| p.scaled(ratio));
    match four_point_unwarp(image, scaled) {
        Ok(crop) => {
            debug!(
                tier = ?tier,
                width = crop.width(),
                height = crop.height(),
                "unwarped receipt crop"
            );
            (crop, tier)
        }
        Err(err) => {
            warn!("degenerate quadrilateral ({err}), keeping the whole image");
            (image.clone(), QuadTier::WholeImage)
        }
    }
}

/// Builds the paper-foreground mask of the downscaled image.
///
/// Low-saturation pixels become foreground (inverse binary threshold on the
/// saturation channel), then a morphological closing and opening suppress
/// speckle noise and fill gaps. Runs of the same square element compose, so
/// `n` iterations of radius `k` are applied as one pass of radius `n * k`.
fn foreground_mask(small: &RgbImage, config: &ScannerConfig) -> GrayImage {
    let mut mask = saturation_channel(small);
    for pixel in mask.pixels_mut() {
        pixel.0[0] = if pixel.0[0] <= config.saturation_threshold {
            255
        } else {
            0
        };
    }

    let k = (config.morph_kernel_radius as u16 * config.morph_iterations as u16).min(255) as u8;
    if k > 0 {
        // closing
        mask = erode(&dilate(&mask, Norm::LInf, k), Norm::LInf, k);
        // opening
        mask = dilate(&erode(&mask, Norm::LInf, k), Norm::LInf, k);
    }
    mask
}

/// Finds the receipt quadrilateral in the foreground mask.
///
/// Returns `None` only when the mask contains no contours at all (the
/// whole-image tier). Candidate contours are ranked by area; the loop accepts
/// the first one that approximates to exactly four vertices, not necessarily
/// the best-fitting one.
fn detect_quad(mask: &GrayImage, config: &ScannerConfig) -> Option<([Point; 4], QuadTier)> {
    let mut contours: Vec<Polygon> = find_contours::<u32>(mask)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(Polygon::from_contour)
        .collect();

    if contours.is_empty() {
        return None;
    }

    contours.sort_by(|a, b| b.area().total_cmp(&a.area()));
    contours.truncate(config.max_candidates);

    for contour in &contours {
        let epsilon = config.approx_tolerance_ratio * contour.perimeter();
        let approx = contour.approx_polygon(epsilon);
        if approx.points.len() == 4 {
            let quad = [
                approx.points[0],
                approx.points[1],
                approx.points[2],
                approx.points[3],
            ];
            return Some((quad, QuadTier::Polygon));
        }
    }

    let corners = contours[0].min_area_rect().box_points();
    Some((corners, QuadTier::MinAreaRect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    /// Saturated dark blue: always background in the foreground mask.
    const BACKGROUND: Rgb<u8> = Rgb([8, 8, 160]);

    fn filled_mask(width: u32, height: u32, fill: impl Fn(u32, u32) -> bool) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if fill(x, y) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }

    #[test]
    fn test_detect_quad_rectangle_hits_polygon_tier() {
        let mask = filled_mask(200, 200, |x, y| (40..160).contains(&x) && (50..150).contains(&y));
        let (quad, tier) = detect_quad(&mask, &ScannerConfig::default()).unwrap();
        assert_eq!(tier, QuadTier::Polygon);

        let xs: Vec<f32> = quad.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = quad.iter().map(|p| p.y).collect();
        let width = xs.iter().cloned().fold(f32::MIN, f32::max)
            - xs.iter().cloned().fold(f32::MAX, f32::min);
        let height = ys.iter().cloned().fold(f32::MIN, f32::max)
            - ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((width - 119.0).abs() <= 3.0, "quad width {width}");
        assert!((height - 99.0).abs() <= 3.0, "quad height {height}");
    }

    #[test]
    fn test_detect_quad_cross_falls_back_to_min_area_rect() {
        // A plus shape keeps 12 corners after approximation, so the polygon
        // tier cannot accept it.
        let mask = filled_mask(200, 200, |x, y| {
            let vertical = (80..120).contains(&x) && (20..180).contains(&y);
            let horizontal = (20..180).contains(&x) && (80..120).contains(&y);
            vertical || horizontal
        });
        let (quad, tier) = detect_quad(&mask, &ScannerConfig::default()).unwrap();
        assert_eq!(tier, QuadTier::MinAreaRect);

        // The rectangle must enclose the plus but stay close to its convex
        // hull: between the hull's minimum rectangle (~19600 px²) and the
        // axis-aligned bounding box (~25300 px²).
        let area = Polygon::new(quad.to_vec()).area();
        assert!(
            (18500.0..=26000.0).contains(&area),
            "min-area rect area {area}"
        );
    }

    #[test]
    fn test_detect_quad_empty_mask() {
        let mask = GrayImage::new(100, 100);
        assert!(detect_quad(&mask, &ScannerConfig::default()).is_none());
    }

    #[test]
    fn test_scan_whole_image_fallback_keeps_dimensions() {
        // A fully saturated image has no foreground, hence no contours.
        let image = RgbImage::from_pixel(60, 80, Rgb([255, 0, 0]));
        let (result, tier) = scan_with_tier(&image, &ScannerConfig::default());
        assert_eq!(tier, QuadTier::WholeImage);
        assert_eq!(result.dimensions(), image.dimensions());
    }

    #[test]
    fn test_scan_crops_bright_rectangle() {
        let mut image = RgbImage::from_pixel(120, 160, BACKGROUND);
        for y in 30..120 {
            for x in 20..80 {
                image.put_pixel(x, y, Rgb([245, 245, 245]));
            }
        }

        let (crop, tier) = scan_with_tier(&image, &ScannerConfig::default());
        assert_eq!(tier, QuadTier::Polygon);
        assert!((crop.width() as i32 - 60).unsigned_abs() <= 5, "crop width {}", crop.width());
        assert!((crop.height() as i32 - 90).unsigned_abs() <= 5, "crop height {}", crop.height());

        // The crop interior is receipt paper, not background
        let center = crop.get_pixel(crop.width() / 2, crop.height() / 2);
        assert!(center.0[0] > 200 && center.0[1] > 200 && center.0[2] > 200);
    }

    #[test]
    fn test_foreground_mask_polarity() {
        let mut image = RgbImage::from_pixel(64, 64, BACKGROUND);
        for y in 16..48 {
            for x in 16..48 {
                image.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }
        let mask = foreground_mask(&image, &ScannerConfig::default());
        assert_eq!(mask.get_pixel(32, 32).0[0], 255);
        assert_eq!(mask.get_pixel(2, 2).0[0], 0);
    }
}

//! Text-line orientation axis estimation.
//!
//! Decides whether the dominant line structure of an unwarped crop is
//! horizontal or vertical, narrowing the rotation search to two candidates.
//! The crop's edge map is run through a Hough line transform; detected line
//! angles are bucketed into a horizontal family (near 90°) and a vertical
//! family (near 0°/180°), and the family with the tighter angular clustering
//! wins. Receipts have strong horizontal text rows when upright and strong
//! vertical ones when sideways, so the tighter cluster marks the more
//! reliable family.

use crate::core::OrientationConfig;
use crate::processors::types::OrientationAxis;
use image::{RgbImage, imageops};
use imageproc::edges::canny;
use imageproc::filter::box_filter;
use imageproc::hough::{LineDetectionOptions, detect_lines};
use tracing::debug;

/// Estimates the dominant text-line axis of an unwarped receipt crop.
///
/// Deterministic for a fixed input; on a tie between the two angle families
/// the horizontal axis wins.
pub fn estimate_axis(image: &RgbImage, config: &OrientationConfig) -> OrientationAxis {
    let gray = imageops::grayscale(image);
    let blurred = box_filter(&gray, config.blur_radius, config.blur_radius);
    let edges = canny(&blurred, config.canny_low, config.canny_high);

    let lines = detect_lines(
        &edges,
        LineDetectionOptions {
            vote_threshold: config.hough_vote_threshold,
            suppression_radius: config.hough_suppression_radius,
        },
    );

    let angles = lines.iter().map(|line| line.angle_in_degrees as f32);
    let (horizontal, vertical) = classify_angles(angles, config);
    debug!(
        horizontal = horizontal.len(),
        vertical = vertical.len(),
        "bucketed hough line angles"
    );

    axis_from_buckets(&horizontal, &vertical)
}

/// Buckets detected line angles into the horizontal and vertical families.
///
/// Angles inside `horizontal_bucket` (inclusive) are horizontal; angles at or
/// below `vertical_low` or at or above `vertical_high` are vertical, after
/// normalization so that near-0° and near-180° lines land in the same family.
/// Everything in between is ambiguous and discarded.
pub(crate) fn classify_angles(
    angles: impl IntoIterator<Item = f32>,
    config: &OrientationConfig,
) -> (Vec<f32>, Vec<f32>) {
    let (h_min, h_max) = config.horizontal_bucket;
    let mut horizontal = Vec::new();
    let mut vertical = Vec::new();

    for angle in angles {
        if (h_min..=h_max).contains(&angle) {
            horizontal.push(angle);
        } else if angle <= config.vertical_low || angle >= config.vertical_high {
            vertical.push(normalize_vertical_angle(angle));
        }
    }

    (horizontal, vertical)
}

/// Maps vertical-family angles above 90° to their negative equivalents, so
/// that lines near 0° and near 180° are treated as the same orientation.
pub(crate) fn normalize_vertical_angle(angle: f32) -> f32 {
    if angle > 90.0 { angle - 180.0 } else { angle }
}

/// Picks the axis whose angle bucket clusters tighter around its median.
///
/// Strict `<` comparison: on equal mean errors (including two empty buckets)
/// the horizontal axis is the default.
pub(crate) fn axis_from_buckets(horizontal: &[f32], vertical: &[f32]) -> OrientationAxis {
    let (_, v_error) = median_and_mean_error(vertical);
    let (_, h_error) = median_and_mean_error(horizontal);

    if v_error < h_error {
        OrientationAxis::Vertical
    } else {
        OrientationAxis::Horizontal
    }
}

/// Computes the median of `values` and the mean absolute deviation from it.
///
/// An empty slice yields `(0.0, 0.0)`.
pub(crate) fn median_and_mean_error(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let mean_error = values.iter().map(|v| (v - median).abs()).sum::<f32>() / values.len() as f32;
    (median, mean_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// White page with black horizontal bands (tight horizontal family) and
    /// two loosely tilted near-vertical strokes (scattered vertical family).
    fn banded_page(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        for y in (20..height.saturating_sub(28)).step_by(24) {
            for dy in 0..8 {
                for x in 10..width - 10 {
                    img.put_pixel(x, y + dy, Rgb([0, 0, 0]));
                }
            }
        }

        // Strokes roughly 10° off vertical, one leaning each way. Their
        // angles straddle the vertical bucket with a wide spread, while the
        // bands cluster exactly at 90°.
        let tilt = (height as f32 * (10.0_f32).to_radians().tan()) as i32;
        for (anchor, lean) in [(width as i32 / 4, tilt), (3 * width as i32 / 4, -tilt)] {
            for y in 0..height as i32 {
                let x = anchor + lean * y / height as i32;
                for dx in 0..5 {
                    let px = x + dx;
                    if px >= 0 && (px as u32) < width {
                        img.put_pixel(px as u32, y as u32, Rgb([0, 0, 0]));
                    }
                }
            }
        }
        img
    }

    #[test]
    fn test_median_and_mean_error() {
        let (median, error) = median_and_mean_error(&[88.0, 90.0, 92.0]);
        assert_eq!(median, 90.0);
        assert!((error - 4.0 / 3.0).abs() < 1e-5);

        let (median, error) = median_and_mean_error(&[1.0, 3.0]);
        assert_eq!(median, 2.0);
        assert_eq!(error, 1.0);
    }

    #[test]
    fn test_median_and_mean_error_empty() {
        assert_eq!(median_and_mean_error(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_vertical_angle() {
        assert_eq!(normalize_vertical_angle(178.0), -2.0);
        assert_eq!(normalize_vertical_angle(90.5), -89.5);
        assert_eq!(normalize_vertical_angle(5.0), 5.0);
        assert_eq!(normalize_vertical_angle(90.0), 90.0);
    }

    #[test]
    fn test_classify_angles_buckets() {
        let config = OrientationConfig::default();
        let angles = [75.0, 90.0, 105.0, 15.0, 165.0, 179.0, 45.0, 120.0];
        let (horizontal, vertical) = classify_angles(angles, &config);

        // Bucket bounds are inclusive; 45 and 120 are ambiguous and dropped
        assert_eq!(horizontal, vec![75.0, 90.0, 105.0]);
        // 165 and 179 normalize into the negative range
        assert_eq!(vertical, vec![15.0, -15.0, -1.0]);
    }

    #[test]
    fn test_axis_tie_defaults_to_horizontal() {
        // Both buckets empty: mean errors are equal, horizontal wins
        assert_eq!(axis_from_buckets(&[], &[]), OrientationAxis::Horizontal);

        // Identical spreads: still horizontal via strict comparison
        let horizontal = [89.0, 91.0];
        let vertical = [-1.0, 1.0];
        assert_eq!(
            axis_from_buckets(&horizontal, &vertical),
            OrientationAxis::Horizontal
        );
    }

    #[test]
    fn test_axis_prefers_tighter_cluster() {
        let horizontal = [75.0, 90.0, 105.0];
        let vertical = [-1.0, 0.0, 1.0];
        assert_eq!(
            axis_from_buckets(&horizontal, &vertical),
            OrientationAxis::Vertical
        );
    }

    #[test]
    fn test_estimate_axis_on_banded_pages() {
        let config = OrientationConfig::default();

        // Upright page: band angles cluster tightly in the horizontal
        // bucket, the tilted strokes scatter the vertical bucket.
        let upright = banded_page(400, 300);
        assert_eq!(estimate_axis(&upright, &config), OrientationAxis::Horizontal);

        // Sideways page: the families swap buckets and vertical wins.
        let sideways = image::imageops::rotate90(&upright);
        assert_eq!(estimate_axis(&sideways, &config), OrientationAxis::Vertical);
    }
}

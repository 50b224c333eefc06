//! Per-stage configuration for the rectification pipeline.
//!
//! Every tunable defaults to the matching constant in
//! [`crate::core::constants`]; the structs deserialize from JSON so a caller
//! can override individual fields:
//!
//! ```rust
//! use receipt_rectify::core::config::RectifyConfig;
//!
//! let config: RectifyConfig = serde_json::from_str(r#"
//! {
//!   "scanner": { "saturation_threshold": 60 },
//!   "selector": { "peak_multiplier": 2.0 }
//! }
//! "#).unwrap();
//! assert_eq!(config.scanner.saturation_threshold, 60);
//! assert_eq!(config.scanner.working_height, 500);
//! ```

use serde::{Deserialize, Serialize};

use super::constants::*;

/// Configuration for quadrilateral detection and unwarping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Height of the downscaled working image used for contour search.
    pub working_height: u32,
    /// Saturation cutoff for the inverse-binary foreground mask.
    pub saturation_threshold: u8,
    /// Radius of the square morphology element (radius 2 = 5x5).
    pub morph_kernel_radius: u8,
    /// Iterations for each of the closing and opening passes.
    pub morph_iterations: u8,
    /// Number of largest contours considered as boundary candidates.
    pub max_candidates: usize,
    /// Polygon approximation tolerance as a fraction of the perimeter.
    pub approx_tolerance_ratio: f32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            working_height: WORKING_HEIGHT,
            saturation_threshold: SATURATION_THRESHOLD,
            morph_kernel_radius: MORPH_KERNEL_RADIUS,
            morph_iterations: MORPH_ITERATIONS,
            max_candidates: MAX_QUAD_CANDIDATES,
            approx_tolerance_ratio: APPROX_TOLERANCE_RATIO,
        }
    }
}

/// Configuration for the line-structure orientation estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Radius of the box blur applied before edge detection.
    pub blur_radius: u32,
    /// Low threshold for Canny edge detection.
    pub canny_low: f32,
    /// High threshold for Canny edge detection.
    pub canny_high: f32,
    /// Minimum Hough accumulator votes for a detected line.
    pub hough_vote_threshold: u32,
    /// Non-maximum suppression radius for Hough peaks.
    pub hough_suppression_radius: u32,
    /// Inclusive bounds (degrees) of the horizontal line-angle bucket.
    pub horizontal_bucket: (f32, f32),
    /// Angles at or below this value (degrees) are vertical.
    pub vertical_low: f32,
    /// Angles at or above this value (degrees) are vertical.
    pub vertical_high: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            blur_radius: BLUR_RADIUS,
            canny_low: CANNY_LOW,
            canny_high: CANNY_HIGH,
            hough_vote_threshold: HOUGH_VOTE_THRESHOLD,
            hough_suppression_radius: HOUGH_SUPPRESSION_RADIUS,
            horizontal_bucket: (HORIZONTAL_BUCKET_MIN, HORIZONTAL_BUCKET_MAX),
            vertical_low: VERTICAL_BUCKET_LOW,
            vertical_high: VERTICAL_BUCKET_HIGH,
        }
    }
}

/// Configuration for projection-profile rotation scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Weight of the row-profile variance term in the score.
    pub variance_weight: f64,
    /// Weight of the peak-count term in the score.
    pub peak_weight: f64,
    /// A row is a peak when its sum exceeds this multiple of the mean.
    pub peak_multiplier: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            variance_weight: VARIANCE_WEIGHT,
            peak_weight: PEAK_WEIGHT,
            peak_multiplier: PEAK_MULTIPLIER,
        }
    }
}

/// Top-level configuration covering every pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    /// Quadrilateral detection and unwarping settings.
    pub scanner: ScannerConfig,
    /// Orientation axis estimation settings.
    pub orientation: OrientationConfig,
    /// Rotation scoring settings.
    pub selector: SelectorConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = RectifyConfig::default();
        assert_eq!(config.scanner.working_height, WORKING_HEIGHT);
        assert_eq!(config.scanner.saturation_threshold, SATURATION_THRESHOLD);
        assert_eq!(config.scanner.max_candidates, MAX_QUAD_CANDIDATES);
        assert_eq!(config.orientation.horizontal_bucket, (75.0, 105.0));
        assert_eq!(config.selector.variance_weight, 0.5);
        assert_eq!(config.selector.peak_weight, 50.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{ "working_height": 640 }"#).unwrap();
        assert_eq!(config.working_height, 640);
        assert_eq!(config.saturation_threshold, SATURATION_THRESHOLD);
        assert_eq!(config.approx_tolerance_ratio, APPROX_TOLERANCE_RATIO);
    }
}

//! Tuning constants for the rectification pipeline.
//!
//! These are the empirically chosen defaults behind
//! [`crate::core::config`]; every value can be overridden per stage through
//! the config structs.

/// Height (pixels) of the downscaled working image used for contour search.
///
/// Boundary detection is resolution-independent above this size, and running
/// the mask and contour passes at a fixed height keeps their cost flat.
pub const WORKING_HEIGHT: u32 = 500;

/// Saturation cutoff for the paper-foreground mask.
///
/// Receipt paper is nearly colorless; pixels with saturation at or below this
/// value become foreground (inverse binary threshold).
pub const SATURATION_THRESHOLD: u8 = 40;

/// Radius of the square structuring element used by the morphology passes.
///
/// Radius 2 corresponds to a 5x5 element.
pub const MORPH_KERNEL_RADIUS: u8 = 2;

/// Iterations applied for each of the closing and opening passes.
pub const MORPH_ITERATIONS: u8 = 2;

/// Number of largest contours considered as boundary candidates.
pub const MAX_QUAD_CANDIDATES: usize = 5;

/// Polygon approximation tolerance, as a fraction of the contour perimeter.
pub const APPROX_TOLERANCE_RATIO: f32 = 0.04;

/// Radius of the box blur applied before edge detection (radius 2 = 5x5).
pub const BLUR_RADIUS: u32 = 2;

/// Low threshold for Canny edge detection.
pub const CANNY_LOW: f32 = 50.0;

/// High threshold for Canny edge detection.
pub const CANNY_HIGH: f32 = 100.0;

/// Minimum Hough accumulator votes for a line to be reported.
///
/// Calibrated for edge maps at [`WORKING_HEIGHT`]-scale crops; text rows on a
/// receipt clear this comfortably while glyph fragments do not.
pub const HOUGH_VOTE_THRESHOLD: u32 = 120;

/// Non-maximum suppression radius for Hough peaks.
pub const HOUGH_SUPPRESSION_RADIUS: u32 = 8;

/// Lower inclusive bound (degrees) of the horizontal line-angle bucket.
///
/// Hough angles are of the line normal, so angles near 90° are horizontal
/// lines.
pub const HORIZONTAL_BUCKET_MIN: f32 = 75.0;

/// Upper inclusive bound (degrees) of the horizontal line-angle bucket.
pub const HORIZONTAL_BUCKET_MAX: f32 = 105.0;

/// Angles at or below this value (degrees) belong to the vertical bucket.
pub const VERTICAL_BUCKET_LOW: f32 = 15.0;

/// Angles at or above this value (degrees) belong to the vertical bucket,
/// after normalization to the equivalent negative angle.
pub const VERTICAL_BUCKET_HIGH: f32 = 165.0;

/// Weight of the row-profile variance term in the rotation score.
pub const VARIANCE_WEIGHT: f64 = 0.5;

/// Weight of the peak-count term in the rotation score.
pub const PEAK_WEIGHT: f64 = 50.0;

/// A profile row counts as a peak when it exceeds this multiple of the mean.
pub const PEAK_MULTIPLIER: f64 = 1.5;

//! The end-to-end rectification pipeline.
//!
//! A single invocation is a pure, synchronous computation:
//! load → scan → estimate axis → select rotation → rotate. Each stage owns
//! its output buffer and reads its input immutably, so independent
//! invocations are safe to run concurrently.

use crate::core::{RectifyConfig, RectifyResult};
use crate::processors::{
    OrientationAxis, QuadTier, Rotation, estimate_axis, scan_with_tier, select_rotation,
};
use crate::utils::image::{decode_image, load_image};
use image::RgbImage;
use std::path::Path;
use tracing::debug;

/// Per-stage decisions taken while rectifying one image.
///
/// Informational only; useful for logging and for tuning the stage configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectifyReport {
    /// Which detection tier produced the receipt quadrilateral.
    pub tier: QuadTier,
    /// The estimated dominant text-line axis of the crop.
    pub axis: OrientationAxis,
    /// The rotation applied to produce the final upright image.
    pub rotation: Rotation,
}

/// Rectifies a decoded receipt photo into an upright, cropped image.
///
/// Never fails: geometric ambiguity is resolved internally with best-effort
/// heuristics so the downstream recognizer always receives an image.
pub fn rectify_image(image: &RgbImage, config: &RectifyConfig) -> RgbImage {
    rectify_image_with_report(image, config).0
}

/// Like [`rectify_image`], but also returns the per-stage decisions.
pub fn rectify_image_with_report(
    image: &RgbImage,
    config: &RectifyConfig,
) -> (RgbImage, RectifyReport) {
    let (crop, tier) = scan_with_tier(image, &config.scanner);
    let axis = estimate_axis(&crop, &config.orientation);
    let rotation = select_rotation(&crop, axis.candidates(), &config.selector);
    debug!(?tier, ?axis, %rotation, "rectification decisions");

    let upright = rotation.apply(&crop);
    (
        upright,
        RectifyReport {
            tier,
            axis,
            rotation,
        },
    )
}

/// Loads an image from `path` and rectifies it.
///
/// # Errors
///
/// Returns an error only when the file cannot be read or decoded; see
/// [`rectify_image`] for the infallible geometric stages.
pub fn rectify_path(path: impl AsRef<Path>, config: &RectifyConfig) -> RectifyResult<RgbImage> {
    let image = load_image(path.as_ref())?;
    Ok(rectify_image(&image, config))
}

/// Decodes an uploaded byte stream (JPEG, PNG, ...) and rectifies it.
///
/// # Errors
///
/// Returns an error only when the bytes cannot be decoded.
pub fn rectify_bytes(bytes: &[u8], config: &RectifyConfig) -> RectifyResult<RgbImage> {
    let image = decode_image(bytes)?;
    Ok(rectify_image(&image, config))
}

//! Type definitions shared across the processors module.

use image::{RgbImage, imageops};
use serde::{Deserialize, Serialize};

/// One of the four canonical rotations applied during orientation correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation (0 degrees).
    None,
    /// 90 degrees clockwise.
    Clockwise90,
    /// 180 degrees.
    Half,
    /// 90 degrees counter-clockwise (-90 degrees).
    CounterClockwise90,
}

impl Rotation {
    /// Applies this rotation to an image, producing a new buffer.
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        match self {
            Rotation::None => image.clone(),
            Rotation::Clockwise90 => imageops::rotate90(image),
            Rotation::Half => imageops::rotate180(image),
            Rotation::CounterClockwise90 => imageops::rotate270(image),
        }
    }

    /// Returns the signed rotation angle in degrees.
    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Half => 180,
            Rotation::CounterClockwise90 => -90,
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// The dominant text-line axis of an unwarped crop.
///
/// Narrows the rotation search to two candidates: a horizontally-dominant
/// crop is either upright or upside down, a vertically-dominant crop is
/// rotated sideways one way or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrientationAxis {
    /// Dominant line structure is horizontal; candidates are 0° and 180°.
    Horizontal,
    /// Dominant line structure is vertical; candidates are 90° and -90°.
    Vertical,
}

impl OrientationAxis {
    /// Returns the two rotation candidates for this axis, in the order they
    /// are scored.
    pub fn candidates(&self) -> [Rotation; 2] {
        match self {
            OrientationAxis::Horizontal => [Rotation::None, Rotation::Half],
            OrientationAxis::Vertical => [Rotation::Clockwise90, Rotation::CounterClockwise90],
        }
    }
}

/// Which detection tier produced the receipt quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuadTier {
    /// A contour approximated to exactly four vertices.
    Polygon,
    /// Minimum-area rectangle of the largest contour.
    MinAreaRect,
    /// No contours found; the whole image was kept unrectified.
    WholeImage,
}

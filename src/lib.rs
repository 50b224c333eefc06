//! # Receipt Rectify
//!
//! A Rust library that turns an arbitrarily rotated, skewed photograph of a
//! restaurant receipt into an upright, cropped, axis-aligned image ready for
//! text recognition.
//!
//! ## Pipeline
//!
//! Data flow is strictly linear:
//!
//! 1. **Load** - decode an uploaded JPEG/PNG into an RGB buffer
//! 2. **Scan** - find the receipt's bounding quadrilateral on a downscaled
//!    copy and perspective-unwarp the full-resolution image to it
//! 3. **Estimate axis** - classify the crop's dominant line structure as
//!    horizontal or vertical, narrowing the rotation search to two candidates
//! 4. **Select rotation** - score each candidate by horizontal-projection
//!    statistics and apply the winner
//!
//! Only decode failures surface as errors; every geometric ambiguity is
//! absorbed by fallbacks so a downstream recognizer always gets an image.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use receipt_rectify::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RectifyConfig::default();
//! let upright = rectify_path("receipt.jpg", &config)?;
//! upright.save("receipt-upright.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! Stage parameters deserialize from JSON, so deployments can tune the
//! empirically chosen thresholds without code changes:
//!
//! ```rust
//! use receipt_rectify::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: RectifyConfig = serde_json::from_str(r#"
//! {
//!   "scanner": { "saturation_threshold": 55 },
//!   "orientation": { "canny_low": 40.0 }
//! }
//! "#)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! * [`core`] - Constants, stage configuration, and error handling
//! * [`pipeline`] - The end-to-end rectification pipeline
//! * [`processors`] - The individual detection and scoring stages
//! * [`utils`] - Image decoding and perspective transform utilities

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Brings the essentials into scope with a single use statement:
///
/// ```rust
/// use receipt_rectify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{RectifyConfig, RectifyError, RectifyResult};
    pub use crate::pipeline::{
        RectifyReport, rectify_bytes, rectify_image, rectify_image_with_report, rectify_path,
    };
    pub use crate::processors::{OrientationAxis, QuadTier, Rotation};
    pub use crate::utils::{decode_image, load_image};
}

//! Image processing stages of the rectification pipeline.
//!
//! # Modules
//!
//! * `geometry` - Geometric primitives and algorithms for boundary detection
//! * `scanner` - Receipt quadrilateral detection and perspective unwarping
//! * `orientation` - Text-line orientation axis estimation
//! * `selection` - Rotation selection by projection-profile scoring
//! * `types` - Type definitions shared across the processors

pub mod geometry;
pub mod orientation;
pub mod scanner;
pub mod selection;
pub mod types;

pub use geometry::{MinAreaRect, Point, Polygon, order_quad};
pub use orientation::estimate_axis;
pub use scanner::{scan, scan_with_tier};
pub use selection::{projection_score, select_rotation};
pub use types::{OrientationAxis, QuadTier, Rotation};

//! Utility functions for the rectification pipeline.
//!
//! This module provides image decoding helpers, perspective transformation
//! utilities, and logging setup.

pub mod image;
pub mod transform;

pub use image::{decode_image, dynamic_to_rgb, load_image, saturation_channel};
pub use transform::{four_point_unwarp, perspective_transform, warp_perspective};

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and a formatting
/// layer. Call once at application startup, before the first pipeline
/// invocation, so the per-stage `debug!` decisions are visible:
///
/// ```rust
/// receipt_rectify::utils::init_tracing();
/// tracing::debug!("rectification service starting");
/// ```
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

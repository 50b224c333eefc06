//! Core types for the rectification pipeline.
//!
//! This module contains the pieces shared by every stage:
//! - Tuning constants
//! - Stage configuration structs
//! - Error handling
//!
//! It re-exports the most commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;

pub use config::{OrientationConfig, RectifyConfig, ScannerConfig, SelectorConfig};
pub use constants::*;
pub use errors::{RectifyError, RectifyResult};

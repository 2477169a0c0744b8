//! Errors for the fallible outer surfaces (configuration, colours, viewport).
//!
//! The geometric pipeline itself never fails: degenerate input degrades to
//! "nothing visible this cycle" and is reported through
//! [`ShatterEvent`](crate::outputs::ShatterEvent) instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ShatterError {
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid ring #{index}: {reason}")]
    InvalidRing { index: usize, reason: String },
    #[error("invalid config value `{field}`: {value}")]
    InvalidConfigValue { field: &'static str, value: f32 },
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("invalid ease {0}")]
    InvalidEase(String),
    #[error("invalid color `{0}` (expected #RRGGBB)")]
    InvalidColor(String),
}

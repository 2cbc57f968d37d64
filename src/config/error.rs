//! Error types and result aliases.
//!
//! Defines the `CaptchaError` enumeration and common `Result` type.

use crate::config::Backend;
use std::path::PathBuf;
use thiserror::Error;

/// CAPTCHA errors.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// The configured font file is missing or cannot be parsed.
    #[error("font file is unavailable: {}: {reason}", path.display())]
    FontUnavailable { path: PathBuf, reason: String },

    /// A specific backend was requested but is not compiled in.
    #[error("rasterization backend `{0}` is not available")]
    BackendUnavailable(Backend),

    /// Neither rasterization backend is available.
    #[error("no rasterization backend is available (enable the `raster` or `vector` feature)")]
    NoBackend,

    /// Canvas, padding and offset do not leave room for the text.
    #[error("invalid layout geometry: {0}")]
    InvalidGeometry(String),

    /// PNG encoding failed.
    #[error("image encoding failed: {0}")]
    Encode(String),
}

impl CaptchaError {
    /// Whether this is a deterministic misconfiguration rather than a runtime fault.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;

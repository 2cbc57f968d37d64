//! Library definitions.
//!
//! Exports the code generator, glyph layout, rendering backends and the
//! challenge orchestrator.

pub mod captcha;
pub mod config;
pub mod render;
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
pub use captcha::{Captcha, CodeGenerator, GlyphMetrics, GlyphPlacement, GlyphPlan, VerifyCode, layout};
pub use config::{Backend, CaptchaError, Config, Result};
pub use render::{CaptchaFont, Renderer, available_backends, select_renderer};
pub use web::ImageResponse;

//! CAPTCHA generation.
//!
//! Implements code generation, glyph layout, and the per-challenge lifecycle.

pub mod generator;
pub mod layout;
pub mod manager;

pub use generator::{CodeGenerator, VerifyCode};
pub use layout::{GlyphMetrics, GlyphPlacement, GlyphPlan, TextExtent, layout};
pub use manager::Captcha;

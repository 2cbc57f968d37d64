//! Glyph layout.
//!
//! Resolves every character of a code into a size, rotation and position
//! before any pixel is painted. All backends paint the same plan, so the plan
//! alone decides what the challenge looks like.
//!
//! One scale factor is derived from the whole string measured at a reference
//! size. Each glyph then gets a random nominal size and rotation, scaled by
//! that shared factor, and the cursor advances by the glyph's own measured
//! width plus the configured offset.

use crate::config::{CaptchaError, Config, Result};
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::debug;

/// Point size at which the whole code is measured.
pub const REFERENCE_SIZE: f32 = 30.0;
/// Overshoot trimmed from measured text boxes.
const BOX_MARGIN: f32 = 8.0;
/// Left edge of the first glyph. Padding does not move it, so with wide
/// fonts the last glyph can overhang the right edge by a few pixels.
const START_X: i32 = 10;
/// Nominal per-glyph sizes, before scaling.
const GLYPH_SIZES: RangeInclusive<u32> = 26..=32;
/// Per-glyph rotation in degrees, clockwise.
const ROTATIONS: RangeInclusive<i32> = -10..=10;
/// Slack so glyphs rarely touch the canvas edge at the largest size.
const SIZE_SLACK: f32 = 0.8;

/// Rendered extent of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Font measurement capability used by the layout.
pub trait GlyphMetrics {
    /// Measures `text` set at `size`.
    fn text_extent(&self, size: f32, text: &str) -> TextExtent;
}

/// A single resolved glyph. `(x, y)` is the left end of the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub font_size: u32,
    pub rotation: i32,
    pub x: i32,
    pub y: i32,
}

/// Fully resolved painting instructions for one code.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlan {
    pub glyphs: Vec<GlyphPlacement>,
    /// Shared scale factor, kept for diagnostics.
    pub scale: f32,
}

impl GlyphPlan {
    /// The code this plan paints.
    #[must_use]
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }
}

/// Lays out `code` on the configured canvas.
///
/// # Errors
///
/// Returns `InvalidGeometry` when the code is empty, when padding leaves no
/// room on the canvas, when the measured text has no positive extent, or
/// when a scaled glyph size truncates to zero.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn layout<M, R>(code: &str, config: &Config, metrics: &M, rng: &mut R) -> Result<GlyphPlan>
where
    M: GlyphMetrics + ?Sized,
    R: Rng + ?Sized,
{
    let length = code.chars().count();
    if length == 0 {
        return Err(CaptchaError::InvalidGeometry(
            "verification code is empty".to_string(),
        ));
    }

    let available_width = available_span(config.width, config.padding, "width")?;
    let available_height = available_span(config.height, config.padding, "height")?;

    let extent = metrics.text_extent(REFERENCE_SIZE, code);
    let text_width = extent.width.trunc() - BOX_MARGIN;
    let text_height = extent.height.trunc() - BOX_MARGIN;
    let effective_width = text_width + config.offset as f32 * (length - 1) as f32;

    if effective_width <= 0.0 || text_height <= 0.0 {
        return Err(CaptchaError::InvalidGeometry(format!(
            "text extent {effective_width}x{text_height} is not positive (offset {})",
            config.offset
        )));
    }

    let scale = (available_width / effective_width).min(available_height / text_height);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CaptchaError::InvalidGeometry(format!(
            "scale factor {scale} is not usable"
        )));
    }

    let y = (config.height as f32 * 27.0 / 40.0).round() as i32;
    let mut x = START_X;
    let mut glyphs = Vec::with_capacity(length);

    for ch in code.chars() {
        let nominal = rng.random_range(GLYPH_SIZES);
        let font_size = (nominal as f32 * scale * SIZE_SLACK) as u32;
        let rotation = rng.random_range(ROTATIONS);
        if font_size == 0 {
            return Err(CaptchaError::InvalidGeometry(format!(
                "glyph size collapses to zero at scale {scale}"
            )));
        }

        glyphs.push(GlyphPlacement {
            ch,
            font_size,
            rotation,
            x,
            y,
        });

        let mut buf = [0u8; 4];
        let advance = metrics
            .text_extent(font_size as f32, ch.encode_utf8(&mut buf))
            .width as i32;
        x += advance + config.offset;
    }

    debug!(
        code_length = length,
        scale,
        text_width = effective_width,
        text_height,
        "Glyph layout computed"
    );

    Ok(GlyphPlan { glyphs, scale })
}

#[allow(clippy::cast_precision_loss)]
fn available_span(extent: u32, padding: u32, axis: &str) -> Result<f32> {
    let span = i64::from(extent) - 2 * i64::from(padding);
    if span <= 0 {
        return Err(CaptchaError::InvalidGeometry(format!(
            "padding {padding} consumes the entire canvas {axis} {extent}"
        )));
    }
    Ok(span as f32)
}

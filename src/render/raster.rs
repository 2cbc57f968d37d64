//! Bitmap backend.
//!
//! Each glyph is drawn upright into a coverage mask, the mask is rotated
//! about the glyph's baseline origin, and the result is composited onto the
//! canvas.

use crate::captcha::layout::{GlyphPlacement, GlyphPlan};
use crate::config::{Backend, Config, Result};
use crate::render::color::split_color;
use crate::render::{CaptchaFont, Renderer, blend_at, encode_png, new_canvas};
use ab_glyph::{Font, PxScale, ScaleFont};
use image::{GrayImage, Luma, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::geometric_transformations::{Interpolation, rotate};

/// Renders through `imageproc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterRenderer;

impl Renderer for RasterRenderer {
    fn backend(&self) -> Backend {
        Backend::Raster
    }

    fn render(&self, plan: &GlyphPlan, config: &Config, font: &CaptchaFont) -> Result<Vec<u8>> {
        let mut img = new_canvas(config);
        let fore = split_color(config.fore_color);
        for glyph in &plan.glyphs {
            draw_glyph(&mut img, glyph, font, fore);
        }
        encode_png(&img)
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_glyph(img: &mut RgbaImage, glyph: &GlyphPlacement, font: &CaptchaFont, fore: [u8; 3]) {
    let face = font.face();
    let scale = PxScale::from(glyph.font_size as f32);
    let scaled = face.as_scaled(scale);
    let mut buf = [0u8; 4];
    let text = glyph.ch.encode_utf8(&mut buf);

    // Room for the glyph to swing through its rotation without clipping.
    let pad = glyph.font_size;
    let (text_width, _) = text_size(scale, face, text);
    let line_height = scaled.height().ceil().max(1.0) as u32;
    let mut mask = GrayImage::new(text_width + 2 * pad, line_height + 2 * pad);
    draw_text_mut(&mut mask, Luma([u8::MAX]), pad as i32, pad as i32, scale, face, text);

    let origin = (pad as f32, pad as f32 + scaled.ascent());
    let rotated = rotate(
        &mask,
        origin,
        (glyph.rotation as f32).to_radians(),
        Interpolation::Bilinear,
        Luma([0]),
    );

    let dx = i64::from(glyph.x) - i64::from(pad);
    let dy = i64::from(glyph.y) - origin.1.round() as i64;
    for (mx, my, coverage) in rotated.enumerate_pixels() {
        if coverage[0] == 0 {
            continue;
        }
        blend_at(
            img,
            dx + i64::from(mx),
            dy + i64::from(my),
            fore,
            f32::from(coverage[0]) / 255.0,
        );
    }
}

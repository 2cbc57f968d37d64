//! Outline backend.
//!
//! Glyph outlines are scaled, rotated and translated as geometry, then
//! filled with an anti-aliasing rasterizer. No intermediate bitmap is
//! resampled, so rotated edges stay crisp.

use crate::captcha::layout::{GlyphPlacement, GlyphPlan};
use crate::config::{Backend, Config, Result};
use crate::render::color::split_color;
use crate::render::{CaptchaFont, Renderer, blend_at, encode_png, new_canvas};
use ab_glyph::{Font, OutlineCurve, Point, PxScale, ScaleFont, point};
use ab_glyph_rasterizer::Rasterizer;
use image::RgbaImage;
use kurbo::Affine;

/// Renders glyph outlines directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct VectorRenderer;

impl Renderer for VectorRenderer {
    fn backend(&self) -> Backend {
        Backend::Vector
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

/// Maps unscaled, y-up outline coordinates onto the canvas.
fn glyph_transform(glyph: &GlyphPlacement, h_scale: f32, v_scale: f32) -> Affine {
    Affine::translate((f64::from(glyph.x), f64::from(glyph.y)))
        * Affine::rotate(f64::from(glyph.rotation).to_radians())
        * Affine::scale_non_uniform(f64::from(h_scale), -f64::from(v_scale))
}

#[allow(clippy::cast_possible_truncation)]
fn apply(transform: Affine, p: Point) -> Point {
    let mapped = transform * kurbo::Point::new(f64::from(p.x), f64::from(p.y));
    point(mapped.x as f32, mapped.y as f32)
}

fn transform_curve(transform: Affine, curve: &OutlineCurve) -> OutlineCurve {
    match curve {
        OutlineCurve::Line(p0, p1) => OutlineCurve::Line(apply(transform, *p0), apply(transform, *p1)),
        OutlineCurve::Quad(p0, p1, p2) => OutlineCurve::Quad(
            apply(transform, *p0),
            apply(transform, *p1),
            apply(transform, *p2),
        ),
        OutlineCurve::Cubic(p0, p1, p2, p3) => OutlineCurve::Cubic(
            apply(transform, *p0),
            apply(transform, *p1),
            apply(transform, *p2),
            apply(transform, *p3),
        ),
    }
}

fn curve_points(curve: &OutlineCurve) -> Vec<Point> {
    match curve {
        OutlineCurve::Line(p0, p1) => vec![*p0, *p1],
        OutlineCurve::Quad(p0, p1, p2) => vec![*p0, *p1, *p2],
        OutlineCurve::Cubic(p0, p1, p2, p3) => vec![*p0, *p1, *p2, *p3],
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_glyph(img: &mut RgbaImage, glyph: &GlyphPlacement, font: &CaptchaFont, fore: [u8; 3]) {
    let face = font.face();
    let id = face.glyph_id(glyph.ch);
    let Some(outline) = face.outline(id) else {
        return;
    };
    #[allow(clippy::cast_precision_loss)]
    let scaled = face.as_scaled(PxScale::from(glyph.font_size as f32));
    let transform = glyph_transform(glyph, scaled.h_scale_factor(), scaled.v_scale_factor());

    let curves: Vec<OutlineCurve> = outline
        .curves
        .iter()
        .map(|c| transform_curve(transform, c))
        .collect();

    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for p in curves.iter().flat_map(curve_points) {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if min_x > max_x || min_y > max_y {
        return;
    }

    // Rasterize in a local frame so every point has non-negative coordinates.
    let origin = point(min_x.floor(), min_y.floor());
    let width = (max_x - origin.x).ceil() as usize + 1;
    let height = (max_y - origin.y).ceil() as usize + 1;
    let local = |p: Point| point(p.x - origin.x, p.y - origin.y);

    let mut rasterizer = Rasterizer::new(width, height);
    for curve in &curves {
        match curve {
            OutlineCurve::Line(p0, p1) => rasterizer.draw_line(local(*p0), local(*p1)),
            OutlineCurve::Quad(p0, p1, p2) => {
                rasterizer.draw_quad(local(*p0), local(*p1), local(*p2));
            }
            OutlineCurve::Cubic(p0, p1, p2, p3) => {
                rasterizer.draw_cubic(local(*p0), local(*p1), local(*p2), local(*p3));
            }
        }
    }

    let (ox, oy) = (origin.x as i64, origin.y as i64);
    rasterizer.for_each_pixel_2d(|x, y, coverage| {
        if coverage > 0.0 {
            blend_at(img, ox + i64::from(x), oy + i64::from(y), fore, coverage);
        }
    });
}

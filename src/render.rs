//! Rendering backends.
//!
//! A `Renderer` paints a `GlyphPlan` and encodes the result as PNG. Which
//! implementations exist depends on the enabled cargo features; the probe
//! prefers the vector backend, then the raster one.

mod color;
mod font;
#[cfg(feature = "raster")]
mod raster;
#[cfg(feature = "vector")]
mod vector;

pub use crate::config::Backend;
pub use color::split_color;
pub use font::CaptchaFont;
#[cfg(feature = "raster")]
pub use raster::RasterRenderer;
#[cfg(feature = "vector")]
pub use vector::VectorRenderer;

use crate::captcha::layout::GlyphPlan;
use crate::config::{CaptchaError, Config, Result};
use image::{ImageFormat, RgbaImage};
use tracing::{info, warn};

/// Paints glyph plans into PNG images.
pub trait Renderer: Send + Sync {
    fn backend(&self) -> Backend;

    /// Paints `plan` on a fresh canvas and returns PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded.
    fn render(&self, plan: &GlyphPlan, config: &Config, font: &CaptchaFont) -> Result<Vec<u8>>;
}

/// Backends compiled into this build, in probe order.
#[must_use]
pub fn available_backends() -> Vec<Backend> {
    let mut backends = Vec::with_capacity(2);
    if cfg!(feature = "vector") {
        backends.push(Backend::Vector);
    }
    if cfg!(feature = "raster") {
        backends.push(Backend::Raster);
    }
    backends
}

/// Picks the preferred backend, or the first available one.
///
/// # Errors
///
/// Returns `BackendUnavailable` if `preferred` is not compiled in, or
/// `NoBackend` if nothing is.
pub fn select_renderer(preferred: Option<Backend>) -> Result<Box<dyn Renderer>> {
    let available = available_backends();
    let backend = match preferred {
        Some(backend) if available.contains(&backend) => backend,
        Some(backend) => {
            warn!(requested = %backend, ?available, "Requested backend is not available");
            return Err(CaptchaError::BackendUnavailable(backend));
        }
        None => *available.first().ok_or(CaptchaError::NoBackend)?,
    };
    info!(%backend, "Rendering backend selected");
    renderer_for(backend)
}

fn renderer_for(backend: Backend) -> Result<Box<dyn Renderer>> {
    match backend {
        #[cfg(feature = "vector")]
        Backend::Vector => Ok(Box::new(VectorRenderer)),
        #[cfg(feature = "raster")]
        Backend::Raster => Ok(Box::new(RasterRenderer)),
        #[allow(unreachable_patterns)]
        other => Err(CaptchaError::BackendUnavailable(other)),
    }
}

/// Creates the canvas with the configured background.
pub(crate) fn new_canvas(config: &Config) -> RgbaImage {
    RgbaImage::from_pixel(
        config.width,
        config.height,
        color::background(config.back_color, config.transparent),
    )
}

pub(crate) fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| CaptchaError::Encode(format!("PNG encode failed: {e}")))?;
    Ok(png)
}

/// Blends `coverage` of `fore` into the canvas pixel at `(x, y)`, ignoring
/// points outside the canvas.
pub(crate) fn blend_at(img: &mut RgbaImage, x: i64, y: i64, fore: [u8; 3], coverage: f32) {
    let (Ok(px), Ok(py)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if px < img.width() && py < img.height() {
        color::blend_coverage(img.get_pixel_mut(px, py), fore, coverage);
    }
}

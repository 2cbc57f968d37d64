//! Test utilities and shared configuration.
//!
//! Common helpers for unit tests: a standard configuration, deterministic
//! font metrics, and lookup of an installed TrueType font.

#[cfg(any(test, feature = "testing"))]
use crate::captcha::layout::{GlyphMetrics, TextExtent};
#[cfg(any(test, feature = "testing"))]
use crate::config::Config;
#[cfg(any(test, feature = "testing"))]
use crate::render::split_color;
#[cfg(any(test, feature = "testing"))]
use image::RgbaImage;
#[cfg(any(test, feature = "testing"))]
use std::path::PathBuf;

/// Fonts commonly present on Linux and macOS hosts.
#[cfg(any(test, feature = "testing"))]
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Creates the default 120x50 configuration used throughout the tests.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn create_test_config() -> Config {
    Config {
        font_file: test_font_path().unwrap_or_else(|| PathBuf::from("assets/captcha.ttf")),
        log_format: "pretty".to_string(),
        ..Config::default()
    }
}

/// Metrics of an idealised monospace font: every glyph is 3/5 of the size
/// wide and the line is 6/5 of the size high.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Copy)]
pub struct StubMetrics;

#[cfg(any(test, feature = "testing"))]
impl GlyphMetrics for StubMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_extent(&self, size: f32, text: &str) -> TextExtent {
        TextExtent {
            width: size * 3.0 / 5.0 * text.chars().count() as f32,
            height: size * 6.0 / 5.0,
        }
    }
}

/// Locates a TrueType font, honouring `CAPTCHA_TEST_FONT` first.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn test_font_path() -> Option<PathBuf> {
    std::env::var("CAPTCHA_TEST_FONT")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

/// Counts pixels whose color differs from the background.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn ink_pixels(img: &RgbaImage, back_color: u32) -> usize {
    let back = split_color(back_color);
    img.pixels().filter(|p| p.0[..3] != back).count()
}

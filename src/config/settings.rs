//! Configuration settings.
//!
//! Defines the `Config` struct and environment variable loading logic.

use crate::captcha::generator::clamp_length_bounds;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Rasterization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Glyph outlines are transformed, then filled.
    Vector,
    /// Glyphs are drawn upright into a bitmap, then the bitmap is rotated.
    Raster,
}

impl Backend {
    /// Parses a backend name. Unknown names mean "probe automatically".
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "vector" | "imagick" => Some(Self::Vector),
            "raster" | "gd" => Some(Self::Raster),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector => f.write_str("vector"),
            Self::Raster => f.write_str("raster"),
        }
    }
}

fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_bool(key: &str) -> bool {
    env::var(key)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

fn get_env_u32_or(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn get_env_i32_or(key: &str, default: i32) -> i32 {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn get_env_usize_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn get_env_color_or(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| parse_color(&s))
        .unwrap_or(default)
}

/// Parses a 24-bit packed color written as `0xRRGGBB`, `#RRGGBB` or bare hex.
fn parse_color(s: &str) -> Option<u32> {
    let s = s.trim();
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('#'))
        .unwrap_or(s);
    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|c| *c <= 0x00FF_FFFF)
}

/// Challenge configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Padding kept free around the text.
    pub padding: u32,
    /// Background color, packed `0xRRGGBB`.
    pub back_color: u32,
    /// Text color, packed `0xRRGGBB`.
    pub fore_color: u32,
    /// Whether the background is transparent.
    pub transparent: bool,
    /// Minimum length of generated codes.
    pub min_length: usize,
    /// Maximum length of generated codes.
    pub max_length: usize,
    /// Horizontal adjustment between glyphs. Negative values compress the text.
    pub offset: i32,
    /// TrueType font used for measuring and painting.
    pub font_file: PathBuf,
    /// When set, this code is always used and never regenerated.
    pub fixed_verify_code: Option<String>,
    /// How many times the same code is displayed before it is replaced. 0 is unlimited.
    pub test_limit: u32,
    /// Forced backend, or `None` to probe.
    pub backend: Option<Backend>,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 120,
            height: 50,
            padding: 2,
            back_color: 0xFF_FFFF,
            fore_color: 0x20_40A0,
            transparent: false,
            min_length: 6,
            max_length: 7,
            offset: -2,
            font_file: PathBuf::from("assets/captcha.ttf"),
            fixed_verify_code: None,
            test_limit: 3,
            backend: None,
            log_format: "json".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Every setting is optional; missing or unparseable values keep their default.
    #[must_use]
    pub fn from_env() -> Arc<Self> {
        let defaults = Self::default();

        Arc::new(Self {
            width: get_env_u32_or("CAPTCHA_WIDTH", defaults.width),
            height: get_env_u32_or("CAPTCHA_HEIGHT", defaults.height),
            padding: get_env_u32_or("CAPTCHA_PADDING", defaults.padding),
            back_color: get_env_color_or("CAPTCHA_BACK_COLOR", defaults.back_color),
            fore_color: get_env_color_or("CAPTCHA_FORE_COLOR", defaults.fore_color),
            transparent: get_env_bool("CAPTCHA_TRANSPARENT"),
            min_length: get_env_usize_or("CAPTCHA_MIN_LENGTH", defaults.min_length),
            max_length: get_env_usize_or("CAPTCHA_MAX_LENGTH", defaults.max_length),
            offset: get_env_i32_or("CAPTCHA_OFFSET", defaults.offset),
            font_file: env::var("CAPTCHA_FONT_FILE")
                .ok()
                .filter(|s| !s.is_empty())
                .map_or(defaults.font_file, PathBuf::from),
            fixed_verify_code: env::var("CAPTCHA_FIXED_CODE")
                .ok()
                .filter(|s| !s.is_empty()),
            test_limit: get_env_u32_or("CAPTCHA_TEST_LIMIT", defaults.test_limit),
            backend: Backend::parse(&get_env_or("CAPTCHA_BACKEND", "auto")),
            log_format: get_env_or("LOG_FORMAT", &defaults.log_format),
        })
    }

    /// Code length bounds after clamping into `[3, 20]` with `min <= max`.
    #[must_use]
    pub fn length_bounds(&self) -> (usize, usize) {
        clamp_length_bounds(self.min_length, self.max_length)
    }
}

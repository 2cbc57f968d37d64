//! Font loading and measurement.

use crate::captcha::layout::{GlyphMetrics, TextExtent};
use crate::config::{CaptchaError, Result};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A TrueType font loaded from disk.
pub struct CaptchaFont {
    font: FontVec,
    path: PathBuf,
}

impl CaptchaFont {
    /// Loads the font at `path`.
    ///
    /// # Errors
    ///
    /// Returns `FontUnavailable` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| CaptchaError::FontUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(data).map_err(|e| CaptchaError::FontUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), glyphs = font.glyph_count(), "Font loaded");
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) const fn face(&self) -> &FontVec {
        &self.font
    }
}

impl GlyphMetrics for CaptchaFont {
    fn text_extent(&self, size: f32, text: &str) -> TextExtent {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut last = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = last {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            last = Some(id);
        }
        TextExtent {
            width,
            height: scaled.height(),
        }
    }
}

//! CAPTCHA lifecycle management.
//!
//! Owns the verification code of one challenge and coordinates layout and
//! rendering.

use crate::captcha::generator::VerifyCode;
use crate::captcha::layout::{GlyphPlan, layout};
use crate::config::{Config, Result};
use crate::render::{Backend, CaptchaFont, Renderer, select_renderer};
use crate::web::ImageResponse;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

/// A visual challenge: its code, font and rendering backend.
pub struct Captcha {
    config: Arc<Config>,
    font: CaptchaFont,
    renderer: Box<dyn Renderer>,
    code: VerifyCode,
}

impl Captcha {
    /// Creates a challenge from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the font file cannot be loaded or no rendering
    /// backend is available.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let font = CaptchaFont::from_file(&config.font_file)?;
        let renderer = select_renderer(config.backend)?;
        info!(
            backend = %renderer.backend(),
            font_file = %font.path().display(),
            width = config.width,
            height = config.height,
            "Captcha initialized"
        );
        Ok(Self::with_parts(config, font, renderer))
    }

    /// Creates a challenge with an already loaded font and chosen renderer.
    #[must_use]
    pub fn with_parts(config: Arc<Config>, font: CaptchaFont, renderer: Box<dyn Renderer>) -> Self {
        let code = VerifyCode::new(&config);
        Self {
            config,
            font,
            renderer,
            code,
        }
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        self.renderer.backend()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the verification code, regenerating it when asked.
    pub fn verify_code(&mut self, regenerate: bool) -> &str {
        self.code.get(regenerate, &mut rand::rng())
    }

    pub fn verify_code_with<R: Rng + ?Sized>(&mut self, regenerate: bool, rng: &mut R) -> &str {
        self.code.get(regenerate, rng)
    }

    /// Lays out the current code without painting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured geometry leaves no room for the text.
    pub fn plan_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GlyphPlan> {
        let code = self.code.get(false, rng).to_string();
        layout(&code, &self.config, &self.font, rng)
    }

    /// Renders the current code as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is degenerate or encoding fails.
    pub fn render(&mut self) -> Result<Vec<u8>> {
        self.render_with(&mut rand::rng())
    }

    /// Renders the current code as PNG using the given randomness.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is degenerate or encoding fails.
    pub fn render_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<u8>> {
        let plan = self.plan_with(rng)?;
        self.paint(&plan)
    }

    /// Produces the image response for one display of the challenge.
    ///
    /// The code is replaced once it has been displayed `test_limit` times.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is degenerate or encoding fails.
    pub fn run(&mut self) -> Result<ImageResponse> {
        self.run_with(&mut rand::rng())
    }

    /// # Errors
    ///
    /// Returns an error if the layout is degenerate or encoding fails.
    pub fn run_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ImageResponse> {
        let code = self.code.next_for_display(rng).to_string();
        let plan = layout(&code, &self.config, &self.font, rng)?;
        let body = self.paint(&plan)?;
        Ok(ImageResponse::png(body))
    }

    fn paint(&self, plan: &GlyphPlan) -> Result<Vec<u8>> {
        let png = self.renderer.render(plan, &self.config, &self.font)?;
        info!(
            backend = %self.renderer.backend(),
            glyphs = plan.glyphs.len(),
            scale = plan.scale,
            bytes = png.len(),
            "Captcha rendered"
        );
        Ok(png)
    }
}

//! Verification code generation.
//!
//! Codes alternate loosely between consonants and vowels so they stay
//! pronounceable, which keeps them easy to transcribe.

use crate::config::Config;
use rand::Rng;
use tracing::debug;

const VOWELS: &[u8] = b"aeiou";
const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxyz";

/// Shortest code ever generated.
pub const MIN_CODE_LENGTH: usize = 3;
/// Longest code ever generated.
pub const MAX_CODE_LENGTH: usize = 20;

/// Clamps requested length bounds into `[3, 20]`.
///
/// A minimum above the maximum raises the maximum to match.
#[must_use]
pub fn clamp_length_bounds(min_length: usize, max_length: usize) -> (usize, usize) {
    let max_length = max_length.max(min_length).min(MAX_CODE_LENGTH);
    let min_length = min_length.clamp(MIN_CODE_LENGTH, max_length.max(MIN_CODE_LENGTH));
    (min_length, max_length.max(min_length))
}

/// Generates random pronounceable codes.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    min_length: usize,
    max_length: usize,
}

impl CodeGenerator {
    #[must_use]
    pub fn new(min_length: usize, max_length: usize) -> Self {
        let (min_length, max_length) = clamp_length_bounds(min_length, max_length);
        Self {
            min_length,
            max_length,
        }
    }

    #[must_use]
    pub const fn bounds(&self) -> (usize, usize) {
        (self.min_length, self.max_length)
    }

    /// Generates a new code.
    ///
    /// Odd positions favour vowels (8 in 11), even positions favour consonants
    /// (10 in 11).
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let length = rng.random_range(self.min_length..=self.max_length);
        (0..length)
            .map(|i| {
                let roll = rng.random_range(0..=10);
                let vowel = if i % 2 == 1 { roll > 2 } else { roll > 9 };
                if vowel {
                    VOWELS[rng.random_range(0..VOWELS.len())] as char
                } else {
                    CONSONANTS[rng.random_range(0..CONSONANTS.len())] as char
                }
            })
            .collect()
    }
}

/// The code of one challenge, held between generation and rendering.
#[derive(Debug, Clone)]
pub struct VerifyCode {
    generator: CodeGenerator,
    fixed: Option<String>,
    current: Option<String>,
    test_limit: u32,
    display_count: u32,
}

impl VerifyCode {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let (min_length, max_length) = config.length_bounds();
        Self {
            generator: CodeGenerator::new(min_length, max_length),
            fixed: config.fixed_verify_code.clone(),
            current: None,
            test_limit: config.test_limit,
            display_count: 0,
        }
    }

    /// Returns the code, generating it on first use or when `regenerate` is set.
    ///
    /// A fixed code is returned unconditionally.
    pub fn get<R: Rng + ?Sized>(&mut self, regenerate: bool, rng: &mut R) -> &str {
        if let Some(fixed) = &self.fixed {
            return fixed;
        }

        if regenerate || self.current.is_none() {
            let code = self.generator.generate(rng);
            debug!(length = code.len(), "Verification code generated");
            self.display_count = 0;
            self.current = Some(code);
        }
        self.current.as_deref().unwrap_or_default()
    }

    /// Returns the code to display next, replacing it once it has been shown
    /// `test_limit` times.
    pub fn next_for_display<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        let exhausted = self.test_limit > 0 && self.display_count >= self.test_limit;
        if exhausted && self.fixed.is_none() {
            debug!(
                display_count = self.display_count,
                test_limit = self.test_limit,
                "Display limit reached, regenerating"
            );
        }
        self.get(exhausted, rng);
        self.display_count = self.display_count.saturating_add(1);
        self.get(false, rng)
    }

    /// How many times the current code has been displayed.
    #[must_use]
    pub const fn display_count(&self) -> u32 {
        self.display_count
    }
}

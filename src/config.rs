//! Configuration management.
//!
//! Loads challenge settings from environment variables. The binary calls
//! dotenvy first, so a `.env` file works as well.

mod error;
mod settings;

pub use error::{CaptchaError, Result};
pub use settings::{Backend, Config};

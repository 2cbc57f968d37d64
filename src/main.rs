//! `pcaptcha` - renders a distorted-text challenge image.
//!
//! Loads configuration, sets up logging, renders one challenge and writes
//! the PNG to the path given as the first argument. Without an argument the
//! image is printed to stdout as a `data:` URI. The code itself is printed
//! on its own line so the caller can store it.
//!
//! Copyright (C) 2026 pcaptcha contributors
//! SPDX-License-Identifier: AGPL-3.0-only

use pcaptcha::{Captcha, Config};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(non_blocking);

    if config.log_format.eq_ignore_ascii_case("pretty") {
        subscriber.init();
    } else {
        subscriber.json().init();
    }

    info!(
        width = config.width,
        height = config.height,
        backend = ?config.backend,
        font_file = %config.font_file.display(),
        log_format = %config.log_format,
        "Configuration loaded"
    );

    let mut captcha = match Captcha::new(config) {
        Ok(captcha) => captcha,
        Err(e) => {
            error!(error = %e, "Captcha configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let response = match captcha.run() {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Captcha rendering failed");
            return ExitCode::FAILURE;
        }
    };

    match std::env::args_os().nth(1) {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &response.body) {
                error!(path = %path.to_string_lossy(), error = %e, "Failed to write image");
                return ExitCode::FAILURE;
            }
            info!(path = %path.to_string_lossy(), bytes = response.body.len(), "Image written");
        }
        None => println!("{}", response.to_data_uri()),
    }
    println!("{}", captcha.verify_code(false));

    ExitCode::SUCCESS
}

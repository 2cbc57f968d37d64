use crate::common::create_test_config;
use pcaptcha::render::split_color;
use pcaptcha::{
    Backend, Captcha, CaptchaError, CaptchaFont, Config, Renderer, available_backends, layout,
    select_renderer,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

fn load_font(config: &Config) -> Option<CaptchaFont> {
    CaptchaFont::from_file(&config.font_file).ok()
}

fn ink(png: &[u8], back_color: u32) -> usize {
    let img = image::load_from_memory(png).unwrap().to_rgba8();
    let back = split_color(back_color);
    img.pixels().filter(|p| p.0[..3] != back).count()
}

#[test]
fn test_every_backend_renders_the_plan() {
    let config = create_test_config();
    let Some(font) = load_font(&config) else {
        eprintln!("no TrueType font installed, skipping");
        return;
    };
    let plan = layout("zantok", &config, &font, &mut StdRng::seed_from_u64(4)).unwrap();

    for backend in available_backends() {
        let renderer = select_renderer(Some(backend)).unwrap();
        let png = renderer.render(&plan, &config, &font).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (120, 50), "{backend}");
        assert!(ink(&png, config.back_color) > 50, "{backend} painted nothing");
    }
}

#[test]
fn test_same_seed_same_image() {
    let config = create_test_config();
    let Some(font) = load_font(&config) else {
        eprintln!("no TrueType font installed, skipping");
        return;
    };
    for backend in available_backends() {
        let renderer = select_renderer(Some(backend)).unwrap();
        let a = layout("bafoku", &config, &font, &mut StdRng::seed_from_u64(10)).unwrap();
        let b = layout("bafoku", &config, &font, &mut StdRng::seed_from_u64(10)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            renderer.render(&a, &config, &font).unwrap(),
            renderer.render(&b, &config, &font).unwrap()
        );
    }
}

#[test]
fn test_transparent_background() {
    let config = Config {
        transparent: true,
        ..create_test_config()
    };
    let Some(font) = load_font(&config) else {
        eprintln!("no TrueType font installed, skipping");
        return;
    };
    let plan = layout("mivoda", &config, &font, &mut StdRng::seed_from_u64(2)).unwrap();
    for backend in available_backends() {
        let png = select_renderer(Some(backend))
            .unwrap()
            .render(&plan, &config, &font)
            .unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[3], 0, "{backend}");
        assert!(img.pixels().any(|p| p.0[3] > 0), "{backend}");
    }
}

#[test]
fn test_captcha_run_with_forced_backend() {
    let base = create_test_config();
    if load_font(&base).is_none() {
        eprintln!("no TrueType font installed, skipping");
        return;
    }
    for backend in [Backend::Vector, Backend::Raster] {
        let config = Arc::new(Config {
            backend: Some(backend),
            ..base.clone()
        });
        match Captcha::new(config) {
            Ok(mut captcha) => {
                assert_eq!(captcha.backend(), backend);
                let response = captcha.run_with(&mut StdRng::seed_from_u64(1)).unwrap();
                assert!(response.body.starts_with(b"\x89PNG"));
                assert!(response.to_data_uri().starts_with("data:image/png;base64,"));
            }
            Err(err) => assert!(matches!(err, CaptchaError::BackendUnavailable(b) if b == backend)),
        }
    }
}

#[test]
fn test_missing_font_reported_before_rendering() {
    let config = Arc::new(Config {
        font_file: "/nonexistent/SpicyRice.ttf".into(),
        ..create_test_config()
    });
    match Captcha::new(config) {
        Err(CaptchaError::FontUnavailable { path, .. }) => {
            assert!(path.ends_with("SpicyRice.ttf"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("missing font accepted"),
    }
}

struct InkMask {
    pixels: Vec<bool>,
    bounds: (u32, u32, u32, u32),
}

/// Pixels closer to the text color than to the background, on the red channel.
fn ink_mask(png: &[u8], config: &Config) -> InkMask {
    let img = image::load_from_memory(png).unwrap().to_rgba8();
    let back = i32::from(split_color(config.back_color)[0]);
    let fore = i32::from(split_color(config.fore_color)[0]);
    let mid = (back + fore) / 2;

    let mut bounds = (u32::MAX, u32::MAX, 0, 0);
    let mut pixels = Vec::with_capacity((img.width() * img.height()) as usize);
    for (x, y, p) in img.enumerate_pixels() {
        let red = i32::from(p.0[0]);
        let inked = if fore < back { red < mid } else { red > mid };
        if inked {
            bounds = (bounds.0.min(x), bounds.1.min(y), bounds.2.max(x), bounds.3.max(y));
        }
        pixels.push(inked);
    }
    InkMask { pixels, bounds }
}

#[test]
fn test_backends_paint_equivalent_images() {
    let config = create_test_config();
    let Some(font) = load_font(&config) else {
        eprintln!("no TrueType font installed, skipping");
        return;
    };
    let backends = available_backends();
    if backends.len() < 2 {
        eprintln!("only one backend compiled in, skipping");
        return;
    }

    for seed in 0..5 {
        let plan = layout("zantok", &config, &font, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert!(plan.glyphs.iter().any(|g| g.rotation != 0));

        let masks: Vec<InkMask> = backends
            .iter()
            .map(|&backend| {
                let png = select_renderer(Some(backend))
                    .unwrap()
                    .render(&plan, &config, &font)
                    .unwrap();
                ink_mask(&png, &config)
            })
            .collect();

        let (a, b) = (&masks[0], &masks[1]);
        let both = a.pixels.iter().zip(&b.pixels).filter(|(x, y)| **x && **y).count();
        let either = a.pixels.iter().zip(&b.pixels).filter(|(x, y)| **x || **y).count();
        assert!(either > 0, "seed {seed}: nothing painted");
        #[allow(clippy::cast_precision_loss)]
        let iou = both as f64 / either as f64;
        assert!(iou > 0.85, "seed {seed}: overlap {iou:.3} between backends");

        let edges = [
            (a.bounds.0, b.bounds.0),
            (a.bounds.1, b.bounds.1),
            (a.bounds.2, b.bounds.2),
            (a.bounds.3, b.bounds.3),
        ];
        for (left, right) in edges {
            assert!(
                left.abs_diff(right) <= 3,
                "seed {seed}: ink boxes {:?} and {:?} disagree",
                a.bounds,
                b.bounds
            );
        }
    }
}

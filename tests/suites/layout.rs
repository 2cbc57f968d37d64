use crate::common::{FixedPitch, create_test_config};
use pcaptcha::{CaptchaError, CodeGenerator, Config, GlyphMetrics, layout};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_reference_canvas() {
    let config = Config {
        width: 120,
        height: 50,
        padding: 2,
        offset: -2,
        ..create_test_config()
    };
    let metrics = FixedPitch::default();
    for seed in 0..50 {
        let plan = layout("abcdef", &config, &metrics, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert!(plan.scale.is_finite() && plan.scale > 0.0);
        assert!(plan.glyphs.iter().all(|g| g.x <= 118));
    }
}

#[test]
fn test_glyphs_stay_on_canvas() {
    let config = create_test_config();
    let metrics = FixedPitch::default();
    let (min, max) = config.length_bounds();
    let generator = CodeGenerator::new(min, max);
    let mut rng = StdRng::seed_from_u64(31);

    for _ in 0..200 {
        let code = generator.generate(&mut rng);
        let plan = layout(&code, &config, &metrics, &mut rng).unwrap();
        for glyph in &plan.glyphs {
            let size = glyph.font_size as f32;
            let width = metrics.text_extent(size, &glyph.ch.to_string()).width as i32;
            // FixedPitch glyphs rise 4/5 of their size above the baseline.
            let ascent = (size * 0.8).ceil() as i32;
            let descent = (size * 0.2).ceil() as i32;
            assert!(glyph.x >= 0);
            assert!(glyph.x + width <= config.width as i32, "{code}: {glyph:?}");
            assert!(glyph.y - ascent >= 0, "{code}: {glyph:?}");
            assert!(glyph.y + descent <= config.height as i32, "{code}: {glyph:?}");
        }
    }
}

#[test]
fn test_padding_consuming_canvas_is_config_error() {
    let config = Config {
        width: 120,
        padding: 60,
        ..create_test_config()
    };
    let err = layout("abcdef", &config, &FixedPitch::default(), &mut StdRng::seed_from_u64(1))
        .unwrap_err();
    assert!(matches!(err, CaptchaError::InvalidGeometry(_)));
    assert!(err.is_config());
}

#[test]
fn test_positive_offset_spreads_glyphs() {
    let metrics = FixedPitch::default();
    let tight = Config {
        offset: -2,
        ..create_test_config()
    };
    let loose = Config {
        offset: 4,
        ..create_test_config()
    };
    let a = layout("abcdef", &tight, &metrics, &mut StdRng::seed_from_u64(3)).unwrap();
    let b = layout("abcdef", &loose, &metrics, &mut StdRng::seed_from_u64(3)).unwrap();
    assert!(b.scale < a.scale);
    let gaps = |plan: &pcaptcha::GlyphPlan| {
        plan.glyphs
            .windows(2)
            .map(|w| {
                let width = metrics.text_extent(w[0].font_size as f32, "a").width as i32;
                w[1].x - w[0].x - width
            })
            .collect::<Vec<_>>()
    };
    assert!(gaps(&a).iter().all(|g| *g == -2));
    assert!(gaps(&b).iter().all(|g| *g == 4));
}

#[test]
fn test_layout_is_reproducible() {
    let config = create_test_config();
    let metrics = FixedPitch::default();
    let a = layout("pocuma", &config, &metrics, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = layout("pocuma", &config, &metrics, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);
}

//! Color decomposition and compositing.

use image::Rgba;

/// Splits a packed `0xRRGGBB` color into its channels.
#[must_use]
pub fn split_color(color: u32) -> [u8; 3] {
    let [_, red, green, blue] = (color % 0x100_0000).to_be_bytes();
    [red, green, blue]
}

pub(crate) fn background(color: u32, transparent: bool) -> Rgba<u8> {
    let [r, g, b] = split_color(color);
    Rgba([r, g, b, if transparent { 0 } else { u8::MAX }])
}

/// Composites `fore` over `dst` with the given coverage (source-over).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn blend_coverage(dst: &mut Rgba<u8>, fore: [u8; 3], coverage: f32) {
    let src_a = coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    for (channel, fore) in dst.0.iter_mut().take(3).zip(fore) {
        let mixed = (f32::from(fore) * src_a + f32::from(*channel) * dst_a * (1.0 - src_a)) / out_a;
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

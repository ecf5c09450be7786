//! Per-channel auto-contrast.

use image::RgbaImage;

/// Number of colour channels that get stretched. Alpha (index 3) is left alone.
const COLOUR_CHANNELS: usize = 3;

/// Stretch each colour channel so its darkest value maps to 0 and its
/// brightest to 255.
///
/// Channels whose values are all equal are returned unchanged.
pub fn auto_contrast(mut image: RgbaImage) -> RgbaImage {
    let mut lo = [u8::MAX; COLOUR_CHANNELS];
    let mut hi = [u8::MIN; COLOUR_CHANNELS];

    for px in image.pixels() {
        for c in 0..COLOUR_CHANNELS {
            lo[c] = lo[c].min(px[c]);
            hi[c] = hi[c].max(px[c]);
        }
    }

    let luts: [[u8; 256]; COLOUR_CHANNELS] = std::array::from_fn(|c| stretch_lut(lo[c], hi[c]));

    for px in image.pixels_mut() {
        for (c, lut) in luts.iter().enumerate() {
            px[c] = lut[px[c] as usize];
        }
    }

    image
}

/// Lookup table mapping `lo..=hi` linearly onto `0..=255`.
fn stretch_lut(lo: u8, hi: u8) -> [u8; 256] {
    std::array::from_fn(|v| {
        if hi <= lo {
            return v as u8;
        }
        let (lo, hi) = (u32::from(lo), u32::from(hi));
        let v = (v as u32).clamp(lo, hi);
        ((v - lo) * 255 / (hi - lo)) as u8
    })
}

//! Pixelation transform.
//!
//! An image is shrunk with a linear filter so every block gets the average
//! colour of the region it covers, then blown back up to its original size
//! with nearest-neighbour sampling to give hard block edges.
//!
//! The shrink runs on premultiplied colour so transparent pixels add no
//! colour to the blocks they share with opaque ones.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, Rgba32FImage, RgbaImage};

use crate::error::{SpriteError, Result};
use crate::types::PixelationConfig;

use super::contrast::auto_contrast;

/// Pixelate an image, keeping its dimensions.
///
/// # Errors
///
/// Returns `InvalidConfig` for a zero pixel size and `EmptyInput` for an
/// image with no pixels.
pub fn pixelate(image: &RgbaImage, config: &PixelationConfig) -> Result<RgbaImage> {
    config.validate()?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(SpriteError::EmptyInput {
            message: format!("image has zero dimensions ({}x{})", width, height),
            help: Some("Input image must have non-zero width and height".to_string()),
        });
    }

    let (small_w, small_h) = config.reduced_size(width, height);

    let blocky = if (small_w, small_h) == (width, height) {
        image.clone()
    } else {
        let small = imageops::resize(&premultiply(image), small_w, small_h, FilterType::Triangle);
        upscale_nearest(&unpremultiply(&small), width, height)
    };

    if config.auto_adjust {
        Ok(auto_contrast(blocky))
    } else {
        Ok(blocky)
    }
}

/// Normalised colour with each channel scaled by alpha.
fn premultiply(image: &RgbaImage) -> Rgba32FImage {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0.map(|c| f32::from(c) / 255.0);
        Rgba([r * a, g * a, b * a, a])
    })
}

/// Back to straight 8-bit colour. Pixels whose alpha rounds to zero become
/// fully transparent black.
fn unpremultiply(image: &Rgba32FImage) -> RgbaImage {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = to_u8(a);
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), alpha])
    })
}

/// Scale an image to `width` x `height` by nearest-neighbour sampling.
///
/// Each output pixel copies the source pixel whose centre is closest to its
/// own centre, so blocks are as even as integer sizes allow.
pub fn upscale_nearest(small: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = small.dimensions();
    if src_w == 0 || src_h == 0 {
        return RgbaImage::new(width, height);
    }

    let columns: Vec<u32> = (0..width).map(|x| nearest_index(x, width, src_w)).collect();
    let rows: Vec<u32> = (0..height).map(|y| nearest_index(y, height, src_h)).collect();

    ImageBuffer::from_fn(width, height, |x, y| {
        *small.get_pixel(columns[x as usize], rows[y as usize])
    })
}

/// Source index whose centre is nearest to the centre of `dst` when a
/// `src_len` axis is stretched over `dst_len`.
fn nearest_index(dst: u32, dst_len: u32, src_len: u32) -> u32 {
    let centre = (2 * u64::from(dst) + 1) * u64::from(src_len);
    let idx = centre / (2 * u64::from(dst_len));
    (idx as u32).min(src_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A deterministic, busy test image.
    fn noise(width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([
                ((x * 37 + y * 11) % 256) as u8,
                ((x * 5 + y * 71) % 256) as u8,
                ((x * y * 13) % 256) as u8,
                255,
            ])
        })
    }

    /// Assert every block of the given partition holds a single colour.
    fn assert_blocks_uniform(img: &RgbaImage, xs: &[u32], ys: &[u32]) {
        for bounds_y in ys.windows(2) {
            for bounds_x in xs.windows(2) {
                let expected = img.get_pixel(bounds_x[0], bounds_y[0]);
                for y in bounds_y[0]..bounds_y[1] {
                    for x in bounds_x[0]..bounds_x[1] {
                        assert_eq!(
                            img.get_pixel(x, y),
                            expected,
                            "pixel ({}, {}) differs from block at ({}, {})",
                            x,
                            y,
                            bounds_x[0],
                            bounds_y[0]
                        );
                    }
                }
            }
        }
    }

    fn config(pixel_size: u32, auto_adjust: bool) -> PixelationConfig {
        PixelationConfig::new(pixel_size, auto_adjust).unwrap()
    }

    #[test]
    fn test_preserves_dimensions() {
        for (w, h, p) in [(100, 100, 16), (17, 5, 4), (1, 1, 8), (64, 31, 3), (9, 40, 1)] {
            let out = pixelate(&noise(w, h), &config(p, false)).unwrap();
            assert_eq!(out.dimensions(), (w, h), "{}x{} at pixel size {}", w, h, p);
        }
    }

    #[test]
    fn test_exact_multiple_gives_square_blocks() {
        let out = pixelate(&noise(8, 8), &config(4, false)).unwrap();
        assert_blocks_uniform(&out, &[0, 4, 8], &[0, 4, 8]);
    }

    #[test]
    fn test_remainder_spreads_over_blocks() {
        // 10 / 4 = 2 blocks per axis, each 5 pixels wide
        let out = pixelate(&noise(10, 10), &config(4, false)).unwrap();
        assert_blocks_uniform(&out, &[0, 5, 10], &[0, 5, 10]);
    }

    #[test]
    fn test_hundred_pixels_at_sixteen_has_six_blocks_per_row() {
        // Gradient so every reduced column gets a distinct colour
        let img = ImageBuffer::from_fn(100, 100, |x, _| Rgba([(x * 2) as u8, 0, 0, 255]));
        let out = pixelate(&img, &config(16, false)).unwrap();

        assert_eq!(out.dimensions(), (100, 100));

        let row: Vec<_> = (0..100).map(|x| *out.get_pixel(x, 50)).collect();
        let runs = 1 + row.windows(2).filter(|pair| pair[0] != pair[1]).count();
        assert_eq!(runs, 6);
    }

    #[test]
    fn test_repixelating_keeps_block_boundaries() {
        let p = config(4, false);
        let once = pixelate(&noise(10, 10), &p).unwrap();
        let twice = pixelate(&once, &p).unwrap();

        assert_blocks_uniform(&once, &[0, 5, 10], &[0, 5, 10]);
        assert_blocks_uniform(&twice, &[0, 5, 10], &[0, 5, 10]);
    }

    #[test]
    fn test_pixel_size_one_is_identity() {
        let img = noise(13, 7);
        let out = pixelate(&img, &config(1, false)).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_pixel_size_one_with_auto_adjust_only_stretches() {
        let img = noise(13, 7);
        let out = pixelate(&img, &config(1, true)).unwrap();
        assert_eq!(out, auto_contrast(img));
    }

    #[test]
    fn test_block_larger_than_image_gives_single_block() {
        let out = pixelate(&noise(5, 3), &config(32, false)).unwrap();
        assert_blocks_uniform(&out, &[0, 5], &[0, 3]);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = RgbaImage::from_pixel(20, 12, Rgba([40, 90, 160, 255]));
        let out = pixelate(&img, &config(4, false)).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_transparent_image_stays_transparent() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        let out = pixelate(&img, &config(4, true)).unwrap();
        assert!(out.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_transparent_neighbours_keep_hue() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

        let out = pixelate(&img, &config(2, false)).unwrap();

        for x in 0..2 {
            let [r, g, b, a] = out.get_pixel(x, 0).0;
            assert_eq!([r, g, b], [255, 0, 0]);
            assert!((127..=128).contains(&a), "alpha was {}", a);
        }
    }

    #[test]
    fn test_sprite_edges_have_no_dark_halo() {
        // Opaque green square on a transparent border
        let img = ImageBuffer::from_fn(8, 8, |x, y| {
            if (2..6).contains(&x) && (2..6).contains(&y) {
                Rgba([40, 200, 90, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let out = pixelate(&img, &config(4, false)).unwrap();

        for px in out.pixels().filter(|p| p[3] > 0) {
            assert_eq!([px[0], px[1], px[2]], [40, 200, 90], "pixel {:?}", px);
        }
    }

    #[test]
    fn test_premultiply_round_trip() {
        let img = ImageBuffer::from_fn(4, 4, |x, y| Rgba([(x * 60) as u8, (y * 80) as u8, 7, 255]));
        assert_eq!(unpremultiply(&premultiply(&img)), img);

        let clear = RgbaImage::from_pixel(1, 1, Rgba([200, 10, 10, 0]));
        assert_eq!(unpremultiply(&premultiply(&clear)).get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_auto_adjust_stretches_output() {
        // Left half dark grey, right half light grey
        let img = ImageBuffer::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgba([60, 60, 60, 255])
            } else {
                Rgba([180, 180, 180, 255])
            }
        });
        let out = pixelate(&img, &config(4, true)).unwrap();

        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(7, 7).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_pixel_size_rejected() {
        let bad = PixelationConfig {
            pixel_size: 0,
            auto_adjust: false,
        };
        let err = pixelate(&noise(4, 4), &bad).unwrap_err();
        assert!(matches!(err, SpriteError::InvalidConfig { .. }));
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = pixelate(&RgbaImage::new(0, 0), &config(4, false)).unwrap_err();
        assert!(matches!(err, SpriteError::EmptyInput { .. }));
    }

    #[test]
    fn test_upscale_nearest_doubles() {
        let mut small = RgbaImage::new(2, 1);
        small.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        small.put_pixel(1, 0, Rgba([0, 255, 0, 255]));

        let big = upscale_nearest(&small, 4, 2);

        assert_eq!(big.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(big.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(big.get_pixel(2, 0).0, [0, 255, 0, 255]);
        assert_eq!(big.get_pixel(3, 1).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_nearest_index_stays_in_bounds() {
        for dst_len in 1..40 {
            for src_len in 1..=dst_len {
                for dst in 0..dst_len {
                    assert!(nearest_index(dst, dst_len, src_len) < src_len);
                }
            }
        }
    }
}

//! Mask-weighted blending toward a target color.

use crate::buffer::{Channels, Image, Mask};
use crate::color::Color;
use crate::error::ImageError;

/// Blends masked pixels toward a target color.
///
/// For each pixel with weight `w`, every RGB channel becomes
/// `round(orig * (1 - w) + target * w)`. Alpha is carried over unchanged
/// unless the target specifies one *and* the image has an alpha channel, in
/// which case it is blended the same way.
///
/// Channels are processed independently; there is no cross-channel
/// interaction and no dependency between pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorTransformer;

impl ColorTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Produce a new image with `mask` applied toward `target`.
    ///
    /// The input image is not modified. An all-zero mask yields an exact
    /// copy.
    pub fn apply(&self, image: &Image, mask: &Mask, target: Color) -> Result<Image, ImageError> {
        if (mask.width(), mask.height()) != (image.width(), image.height()) {
            return Err(ImageError::MaskMismatch {
                image: (image.width(), image.height()),
                mask: (mask.width(), mask.height()),
            });
        }

        if mask.is_clear() {
            return Ok(image.clone());
        }

        let n = image.channels().count();
        let blend_alpha = image.channels() == Channels::Rgba && target.a.is_some();
        let t = [
            target.r as f32,
            target.g as f32,
            target.b as f32,
            target.a.unwrap_or(0) as f32,
        ];

        let mut data = image.data().to_vec();
        for (pixel, &w) in data.chunks_exact_mut(n).zip(mask.weights()) {
            if w == 0.0 {
                continue;
            }
            for c in 0..3 {
                pixel[c] = blend(pixel[c], t[c], w);
            }
            if blend_alpha {
                pixel[3] = blend(pixel[3], t[3], w);
            }
        }

        Image::new(image.width(), image.height(), image.channels(), data)
    }
}

#[inline]
fn blend(orig: u8, target: f32, w: f32) -> u8 {
    (orig as f32 * (1.0 - w) + target * w).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_weight_replaces_color() {
        let image = Image::filled(2, 1, Channels::Rgb, Color::rgb(255, 0, 0)).unwrap();
        let mask = Mask::new(2, 1, vec![1.0, 0.0]).unwrap();
        let out = ColorTransformer::new()
            .apply(&image, &mask, Color::rgb(0, 0, 255))
            .unwrap();
        assert_eq!(out.data(), &[0, 0, 255, 255, 0, 0]);
    }

    #[test]
    fn test_half_weight_rounds_half_away_from_zero() {
        let image = Image::filled(1, 1, Channels::Rgb, Color::rgb(255, 0, 1)).unwrap();
        let mask = Mask::new(1, 1, vec![0.5]).unwrap();
        let out = ColorTransformer::new()
            .apply(&image, &mask, Color::rgb(0, 0, 0))
            .unwrap();
        // 127.5 -> 128, 0.5 -> 1
        assert_eq!(out.data(), &[128, 0, 1]);
    }

    #[test]
    fn test_alpha_preserved_without_target_alpha() {
        let image = Image::filled(1, 1, Channels::Rgba, Color::rgba(10, 10, 10, 40)).unwrap();
        let mask = Mask::new(1, 1, vec![1.0]).unwrap();
        let out = ColorTransformer::new()
            .apply(&image, &mask, Color::rgb(200, 200, 200))
            .unwrap();
        assert_eq!(out.data(), &[200, 200, 200, 40]);
    }

    #[test]
    fn test_alpha_blended_with_target_alpha() {
        let image = Image::filled(1, 1, Channels::Rgba, Color::rgba(0, 0, 0, 0)).unwrap();
        let mask = Mask::new(1, 1, vec![1.0]).unwrap();
        let out = ColorTransformer::new()
            .apply(&image, &mask, Color::rgba(0, 0, 0, 255))
            .unwrap();
        assert_eq!(out.data()[3], 255);
    }

    #[test]
    fn test_target_alpha_ignored_for_rgb_images() {
        let image = Image::filled(1, 1, Channels::Rgb, Color::rgb(0, 0, 0)).unwrap();
        let mask = Mask::new(1, 1, vec![1.0]).unwrap();
        let out = ColorTransformer::new()
            .apply(&image, &mask, Color::rgba(9, 9, 9, 0))
            .unwrap();
        assert_eq!(out.data(), &[9, 9, 9]);
    }

    #[test]
    fn test_clear_mask_copies_input() {
        let image = Image::filled(3, 3, Channels::Rgba, Color::rgba(1, 2, 3, 4)).unwrap();
        let out = ColorTransformer::new()
            .apply(&image, &Mask::clear(3, 3), Color::rgb(0, 0, 0))
            .unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let image = Image::filled(2, 2, Channels::Rgb, Color::rgb(0, 0, 0)).unwrap();
        let err = ColorTransformer::new()
            .apply(&image, &Mask::clear(1, 1), Color::rgb(0, 0, 0))
            .unwrap_err();
        assert!(matches!(err, ImageError::MaskMismatch { .. }));
    }
}

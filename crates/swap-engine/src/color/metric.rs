//! Perceptually weighted color distance
//!
//! Distances are Euclidean in a scaled RGB space where each channel is
//! multiplied by the square root of its weight. Human vision is most
//! sensitive to green, then blue, then red, so the default weights are
//! `(2, 4, 3)`. Distances are reported as a percentage of the largest
//! possible distance (black to white), which makes a tolerance of `10`
//! mean the same thing regardless of the configured weights.

use super::color::Color;
use crate::error::OptionsError;

/// Per-channel weights of the distance metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    /// Red weight
    pub r: f32,
    /// Green weight
    pub g: f32,
    /// Blue weight
    pub b: f32,
}

impl ChannelWeights {
    /// Create validated channel weights.
    ///
    /// Every weight must be finite and strictly positive; a zero weight would
    /// let two different colors sit at distance 0 and match fully.
    pub fn new(r: f32, g: f32, b: f32) -> Result<Self, OptionsError> {
        let valid = |w: f32| w.is_finite() && w > 0.0;
        if valid(r) && valid(g) && valid(b) {
            Ok(Self { r, g, b })
        } else {
            Err(OptionsError::InvalidWeights { r, g, b })
        }
    }
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self {
            r: 2.0,
            g: 4.0,
            b: 3.0,
        }
    }
}

/// Weighted Euclidean color metric normalized to a 0..=100 scale.
///
/// # Example
///
/// ```
/// use swap_engine::{Color, ColorMetric};
///
/// let metric = ColorMetric::default();
/// let black = Color::rgb(0, 0, 0);
/// let white = Color::rgb(255, 255, 255);
///
/// assert_eq!(metric.distance(black, black), 0.0);
/// assert!((metric.distance(black, white) - 100.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMetric {
    /// sqrt(weight) per channel
    scale: [f32; 3],
    /// Raw distance between black and white
    max_raw: f32,
}

impl ColorMetric {
    /// Create a metric from channel weights.
    pub fn new(weights: ChannelWeights) -> Self {
        let scale = [weights.r.sqrt(), weights.g.sqrt(), weights.b.sqrt()];
        let max_raw = 255.0 * (weights.r + weights.g + weights.b).sqrt();
        Self { scale, max_raw }
    }

    /// Map a color into the weighted space.
    ///
    /// Plain Euclidean distance between two mapped colors equals their raw
    /// weighted distance. Alpha does not participate.
    #[inline]
    pub fn to_perceptual(&self, color: Color) -> [f32; 3] {
        self.rgb_to_perceptual(color.rgb_bytes())
    }

    /// [`to_perceptual`](Self::to_perceptual) for bare RGB bytes.
    #[inline]
    pub fn rgb_to_perceptual(&self, rgb: [u8; 3]) -> [f32; 3] {
        [
            rgb[0] as f32 * self.scale[0],
            rgb[1] as f32 * self.scale[1],
            rgb[2] as f32 * self.scale[2],
        ]
    }

    /// Raw weighted distance between two points of the weighted space.
    #[inline]
    pub fn raw_distance(&self, a: [f32; 3], b: [f32; 3]) -> f32 {
        let d0 = a[0] - b[0];
        let d1 = a[1] - b[1];
        let d2 = a[2] - b[2];
        (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
    }

    /// Perceptual distance between two colors on the 0..=100 scale.
    ///
    /// Identical RGB components always yield exactly 0.
    pub fn distance(&self, a: Color, b: Color) -> f32 {
        if a.rgb_bytes() == b.rgb_bytes() {
            return 0.0;
        }
        let raw = self.raw_distance(self.to_perceptual(a), self.to_perceptual(b));
        self.to_percent(raw).min(100.0)
    }

    /// Convert a tolerance percentage into a raw distance threshold.
    #[inline]
    pub fn threshold(&self, percent: f32) -> f32 {
        percent.clamp(0.0, 100.0) / 100.0 * self.max_raw
    }

    /// Convert a raw distance back into a percentage of the maximum.
    #[inline]
    pub fn to_percent(&self, raw: f32) -> f32 {
        raw / self.max_raw * 100.0
    }

    /// The raw distance between black and white.
    #[inline]
    pub fn max_raw_distance(&self) -> f32 {
        self.max_raw
    }
}

impl Default for ColorMetric {
    fn default() -> Self {
        Self::new(ChannelWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_colors_have_zero_distance() {
        let metric = ColorMetric::default();
        for color in [
            Color::rgb(0, 0, 0),
            Color::rgb(12, 200, 99),
            Color::rgba(12, 200, 99, 0),
        ] {
            assert_eq!(metric.distance(color, color), 0.0);
        }
        // Alpha is ignored
        assert_eq!(
            metric.distance(Color::rgba(1, 2, 3, 0), Color::rgba(1, 2, 3, 255)),
            0.0
        );
    }

    #[test]
    fn test_black_white_is_maximum() {
        let metric = ColorMetric::default();
        let d = metric.distance(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255));
        assert!((d - 100.0).abs() < 1e-4, "expected 100, got {d}");
        // Default weights sum to 9, so the raw maximum is 255 * 3
        assert!((metric.max_raw_distance() - 765.0).abs() < 1e-3);
    }

    #[test]
    fn test_green_weighs_more_than_red() {
        let metric = ColorMetric::default();
        let base = Color::rgb(100, 100, 100);
        let red_shift = metric.distance(base, Color::rgb(130, 100, 100));
        let green_shift = metric.distance(base, Color::rgb(100, 130, 100));
        let blue_shift = metric.distance(base, Color::rgb(100, 100, 130));
        assert!(green_shift > blue_shift);
        assert!(blue_shift > red_shift);
    }

    #[test]
    fn test_threshold_round_trip() {
        let metric = ColorMetric::new(ChannelWeights::new(1.0, 1.0, 1.0).unwrap());
        for percent in [0.0, 5.0, 37.5, 100.0] {
            let raw = metric.threshold(percent);
            assert!((metric.to_percent(raw) - percent).abs() < 1e-4);
        }
        assert_eq!(metric.threshold(150.0), metric.max_raw_distance());
    }

    #[test]
    fn test_distance_is_symmetric() {
        let metric = ColorMetric::default();
        let a = Color::rgb(10, 250, 3);
        let b = Color::rgb(200, 40, 90);
        assert_eq!(metric.distance(a, b), metric.distance(b, a));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        assert!(ChannelWeights::new(0.0, 1.0, 1.0).is_err());
        assert!(ChannelWeights::new(1.0, f32::NAN, 1.0).is_err());
        assert!(ChannelWeights::new(1.0, 1.0, -3.0).is_err());
        assert!(ChannelWeights::new(0.3, 0.59, 0.11).is_ok());
    }
}

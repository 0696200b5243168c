//! Continuous per-pixel match weights.
//!
//! A hard threshold turns the anti-aliased rim of a shape into a jagged
//! staircase: rim pixels are either fully swapped or not at all. The matcher
//! instead returns a weight that stays at 1.0 inside a plateau around the
//! source color and falls off smoothly to exactly 0.0 at the tolerance
//! threshold.
//!
//! ```text
//! weight
//!   1 |██████████▄
//!     |           ▀▄
//!     |             ▀▄
//!   0 +---------------▀▀▀▀▀▀▀▀  distance
//!     0     core×T      T
//! ```

use crate::color::{Color, ColorMetric};
use crate::error::OptionsError;
use crate::instruction::SwapInstruction;

/// Shape of the transition between the plateau and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Falloff {
    /// Straight line from 1 to 0
    Linear,
    /// Hermite curve, flat at both ends
    #[default]
    Smoothstep,
}

impl Falloff {
    /// Weight for `u` in 0..=1, where `u = 1` is the plateau edge and `u = 0`
    /// the threshold.
    #[inline]
    fn apply(self, u: f32) -> f32 {
        match self {
            Falloff::Linear => u,
            Falloff::Smoothstep => u * u * (3.0 - 2.0 * u),
        }
    }
}

/// Options shared by every matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Transition curve
    pub falloff: Falloff,
    /// Fraction of the threshold that matches fully (0..=1)
    pub core: f32,
}

impl MatchOptions {
    /// Default options: smoothstep falloff with a 60% plateau.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the falloff curve.
    #[inline]
    pub fn falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Set the plateau fraction.
    #[inline]
    pub fn core(mut self, core: f32) -> Self {
        self.core = core;
        self
    }

    /// Check that the plateau fraction is usable.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.core.is_finite() && (0.0..=1.0).contains(&self.core) {
            Ok(())
        } else {
            Err(OptionsError::CoreOutOfRange(self.core))
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            falloff: Falloff::Smoothstep,
            core: 0.6,
        }
    }
}

/// Match weights for a single instruction.
///
/// Construction precomputes everything the per-pixel path needs, so
/// [`weight_rgb`](Self::weight_rgb) performs no allocation.
///
/// # Example
///
/// ```
/// use swap_engine::{Color, ColorMatcher, ColorMetric, MatchOptions, SwapInstruction, ToleranceSpec};
///
/// let instruction = SwapInstruction::new(
///     Color::rgb(255, 0, 0),
///     Color::rgb(0, 0, 255),
///     ToleranceSpec::new(10.0, 0).unwrap(),
/// );
/// let matcher = ColorMatcher::new(&ColorMetric::default(), &instruction, &MatchOptions::default());
///
/// assert_eq!(matcher.weight(Color::rgb(255, 0, 0)), 1.0);
/// assert_eq!(matcher.weight(Color::rgb(0, 255, 0)), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ColorMatcher {
    metric: ColorMetric,
    source_rgb: [u8; 3],
    source: [f32; 3],
    /// Raw distance at which the weight reaches 0
    threshold: f32,
    /// Raw distance up to which the weight stays 1
    inner: f32,
    falloff: Falloff,
}

impl ColorMatcher {
    pub fn new(metric: &ColorMetric, instruction: &SwapInstruction, options: &MatchOptions) -> Self {
        let threshold = metric.threshold(instruction.tolerance.percent());
        let core = options.core.clamp(0.0, 1.0);
        Self {
            metric: *metric,
            source_rgb: instruction.source.rgb_bytes(),
            source: metric.to_perceptual(instruction.source),
            threshold,
            inner: threshold * core,
            falloff: options.falloff,
        }
    }

    /// Match weight of an RGB pixel, in 0..=1.
    #[inline]
    pub fn weight_rgb(&self, rgb: [u8; 3]) -> f32 {
        if rgb == self.source_rgb {
            return 1.0;
        }
        if self.threshold <= 0.0 {
            return 0.0;
        }

        let d = self
            .metric
            .raw_distance(self.source, self.metric.rgb_to_perceptual(rgb));
        if d >= self.threshold {
            0.0
        } else if d <= self.inner {
            1.0
        } else {
            let u = (self.threshold - d) / (self.threshold - self.inner);
            self.falloff.apply(u.clamp(0.0, 1.0))
        }
    }

    /// Match weight of a color, ignoring its alpha.
    #[inline]
    pub fn weight(&self, pixel: Color) -> f32 {
        self.weight_rgb(pixel.rgb_bytes())
    }

    /// Raw distance threshold beyond which nothing matches.
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

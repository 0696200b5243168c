//! Mask construction: match, suppress, feather, scale.

use crate::buffer::{Image, Mask};
use crate::color::ColorMetric;
use crate::error::OptionsError;
use crate::instruction::SwapInstruction;
use crate::matcher::{ColorMatcher, MatchOptions};

use super::consensus::suppress_isolated;
use super::feather::feather;

/// Options for mask shaping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskOptions {
    /// Multiplier applied to matching pixels without matching neighbours.
    ///
    /// - 0.0 = drop isolated matches entirely (default)
    /// - 1.0 = disable consensus suppression
    pub isolated_factor: f32,
}

impl MaskOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the isolated-pixel multiplier.
    #[inline]
    pub fn isolated_factor(mut self, factor: f32) -> Self {
        self.isolated_factor = factor;
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        let f = self.isolated_factor;
        if f.is_finite() && (0.0..=1.0).contains(&f) {
            Ok(())
        } else {
            Err(OptionsError::IsolatedFactorOutOfRange(f))
        }
    }
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            isolated_factor: 0.0,
        }
    }
}

/// Builds soft-edged masks for swap instructions.
///
/// # Processing Order
///
/// 1. **Match**: raw weight per pixel via [`ColorMatcher`]
/// 2. **Consensus**: isolated matches scaled by `isolated_factor`
/// 3. **Feather**: Gaussian blur when the instruction's radius is non-zero
/// 4. **Opacity**: every weight scaled by the instruction's opacity
///
/// Steps 1 and 2–4 are exposed separately ([`match_weights`](Self::match_weights)
/// and [`shape`](Self::shape)) so callers can observe each stage.
///
/// # Example
///
/// ```
/// use swap_engine::{Channels, Color, Image, MaskBuilder, SwapInstruction};
///
/// let image = Image::filled(3, 3, Channels::Rgb, Color::rgb(255, 0, 0)).unwrap();
/// let instruction = SwapInstruction::exact(Color::rgb(255, 0, 0), Color::rgb(0, 0, 255));
///
/// let mask = MaskBuilder::default().build(&image, &instruction);
/// assert!(mask.weights().iter().all(|&w| w == 1.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MaskBuilder {
    metric: ColorMetric,
    matching: MatchOptions,
    options: MaskOptions,
}

impl MaskBuilder {
    pub fn new(metric: ColorMetric, matching: MatchOptions, options: MaskOptions) -> Self {
        Self {
            metric,
            matching,
            options,
        }
    }

    /// Full mask for `instruction` over `image`.
    pub fn build(&self, image: &Image, instruction: &SwapInstruction) -> Mask {
        let raw = self.match_weights(image, instruction);
        self.shape(raw, image.width(), image.height(), instruction)
    }

    /// Step 1: raw, unsmoothed match weights in row-major order.
    pub fn match_weights(&self, image: &Image, instruction: &SwapInstruction) -> Vec<f32> {
        let matcher = ColorMatcher::new(&self.metric, instruction, &self.matching);
        image
            .pixels()
            .map(|p| matcher.weight_rgb([p[0], p[1], p[2]]))
            .collect()
    }

    /// Steps 2–4: turn raw weights into the final mask.
    pub fn shape(
        &self,
        raw: Vec<f32>,
        width: usize,
        height: usize,
        instruction: &SwapInstruction,
    ) -> Mask {
        let factor = self.options.isolated_factor.clamp(0.0, 1.0);
        let mut weights = suppress_isolated(&raw, width, height, factor);

        let radius = instruction.tolerance.feather_radius();
        if radius > 0 {
            weights = feather(&weights, width, height, radius);
        }

        let opacity = instruction.opacity();
        if opacity < 1.0 {
            for w in &mut weights {
                *w = (*w * opacity).clamp(0.0, 1.0);
            }
        }

        Mask::from_weights(width, height, weights)
    }
}

//! ColorSwapper builder, the main entry point for the crate.
//!
//! [`ColorSwapper`] bundles the distance metric, matcher options and mask
//! options behind a fluent configuration API.

use crate::buffer::{Image, Mask};
use crate::color::{ChannelWeights, ColorMetric};
use crate::instruction::SwapInstruction;
use crate::mask::{MaskBuilder, MaskOptions};
use crate::matcher::{ColorMatcher, Falloff, MatchOptions};
use crate::transform::ColorTransformer;

use super::EngineError;

/// High-level color swap builder.
///
/// # Design
///
/// - Configuration methods consume and return `self` (standard builder pattern)
/// - [`swap()`](Self::swap) takes `&self` so one swapper serves many images
/// - [`validate()`](Self::validate) reports option errors up front; the
///   per-pixel path clamps instead of failing
///
/// # Example
///
/// ```
/// use swap_engine::{Channels, Color, ColorSwapper, Falloff, Image, SwapInstruction, ToleranceSpec};
///
/// let image = Image::filled(2, 2, Channels::Rgb, Color::rgb(255, 0, 0)).unwrap();
/// let instruction = SwapInstruction::new(
///     Color::rgb(255, 0, 0),
///     Color::rgb(0, 0, 255),
///     ToleranceSpec::new(10.0, 0).unwrap(),
/// );
///
/// let swapper = ColorSwapper::new().falloff(Falloff::Linear);
/// let result = swapper.swap(&image, &instruction).unwrap();
///
/// assert_eq!(result.pixel(0, 0), Color::rgb(0, 0, 255));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColorSwapper {
    weights: ChannelWeights,
    matching: MatchOptions,
    mask: MaskOptions,
}

impl ColorSwapper {
    /// Create a swapper with default weights `(2, 4, 3)`, smoothstep falloff,
    /// a 60% plateau and full isolated-pixel suppression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel weights of the distance metric.
    #[inline]
    pub fn weights(mut self, weights: ChannelWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the falloff curve between plateau and threshold.
    #[inline]
    pub fn falloff(mut self, falloff: Falloff) -> Self {
        self.matching = self.matching.falloff(falloff);
        self
    }

    /// Set the plateau fraction (0..=1).
    #[inline]
    pub fn core(mut self, core: f32) -> Self {
        self.matching = self.matching.core(core);
        self
    }

    /// Set the isolated-pixel multiplier (0..=1).
    #[inline]
    pub fn isolated_factor(mut self, factor: f32) -> Self {
        self.mask = self.mask.isolated_factor(factor);
        self
    }

    /// Check every option.
    pub fn validate(&self) -> Result<(), EngineError> {
        ChannelWeights::new(self.weights.r, self.weights.g, self.weights.b)?;
        self.matching.validate()?;
        self.mask.validate()?;
        Ok(())
    }

    /// The distance metric built from the configured weights.
    #[inline]
    pub fn metric(&self) -> ColorMetric {
        ColorMetric::new(self.weights)
    }

    /// Matcher for a single instruction.
    pub fn matcher(&self, instruction: &SwapInstruction) -> ColorMatcher {
        ColorMatcher::new(&self.metric(), instruction, &self.matching)
    }

    fn mask_builder(&self) -> MaskBuilder {
        MaskBuilder::new(self.metric(), self.matching, self.mask)
    }

    /// Raw match weights, before consensus, feathering and opacity.
    pub fn match_weights(&self, image: &Image, instruction: &SwapInstruction) -> Vec<f32> {
        self.mask_builder().match_weights(image, instruction)
    }

    /// Shape raw weights from [`match_weights`](Self::match_weights) into a mask.
    pub fn shape(
        &self,
        raw: Vec<f32>,
        width: usize,
        height: usize,
        instruction: &SwapInstruction,
    ) -> Mask {
        self.mask_builder().shape(raw, width, height, instruction)
    }

    /// Final mask for `instruction` over `image`.
    pub fn mask(&self, image: &Image, instruction: &SwapInstruction) -> Mask {
        self.mask_builder().build(image, instruction)
    }

    /// Apply one instruction, returning a new image.
    pub fn swap(&self, image: &Image, instruction: &SwapInstruction) -> Result<Image, EngineError> {
        let mask = self.mask(image, instruction);
        Ok(ColorTransformer::new().apply(image, &mask, instruction.target)?)
    }

    /// Apply instructions in order, each to the previous result.
    pub fn swap_all(
        &self,
        image: &Image,
        instructions: &[SwapInstruction],
    ) -> Result<Image, EngineError> {
        let mut current = image.clone();
        for instruction in instructions {
            current = self.swap(&current, instruction)?;
        }
        Ok(current)
    }
}

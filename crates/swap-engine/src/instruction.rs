//! Swap instructions and their tolerance settings.
//!
//! Both types can only be built through validating constructors, so the
//! matcher, mask builder and transformer never see out-of-range parameters.

use crate::color::Color;
use crate::error::InstructionError;

/// Matching tolerance and edge softness for one instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceSpec {
    percent: f32,
    feather_radius: u32,
}

impl ToleranceSpec {
    /// Exact matching without feathering.
    pub const EXACT: Self = Self {
        percent: 0.0,
        feather_radius: 0,
    };

    /// Create a validated tolerance.
    ///
    /// # Arguments
    /// * `percent` - Maximum perceptual distance, 0..=100
    /// * `feather_radius` - Blur radius in pixels, must be non-negative
    ///
    /// # Example
    /// ```
    /// use swap_engine::{InstructionError, ToleranceSpec};
    ///
    /// assert!(ToleranceSpec::new(10.0, 2).is_ok());
    /// assert_eq!(
    ///     ToleranceSpec::new(150.0, 0),
    ///     Err(InstructionError::ToleranceOutOfRange(150.0))
    /// );
    /// ```
    pub fn new(percent: f32, feather_radius: i64) -> Result<Self, InstructionError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(InstructionError::ToleranceOutOfRange(percent));
        }
        if feather_radius < 0 {
            return Err(InstructionError::NegativeFeather(feather_radius));
        }
        let feather_radius = u32::try_from(feather_radius)
            .map_err(|_| InstructionError::FeatherOutOfRange(feather_radius))?;
        Ok(Self {
            percent,
            feather_radius,
        })
    }

    /// Tolerance as a percentage of the maximum perceptual distance.
    #[inline]
    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// Feather radius in pixels (0 = no blur).
    #[inline]
    pub fn feather_radius(&self) -> u32 {
        self.feather_radius
    }
}

impl Default for ToleranceSpec {
    fn default() -> Self {
        Self::EXACT
    }
}

/// Replace `source` (within `tolerance`) by `target`.
///
/// `opacity` scales the final mask; 1.0 (the default) performs a full swap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapInstruction {
    /// Color to look for
    pub source: Color,
    /// Replacement color; an explicit alpha opts into alpha blending
    pub target: Color,
    /// Matching tolerance and feathering
    pub tolerance: ToleranceSpec,
    opacity: f32,
}

impl SwapInstruction {
    /// Create an instruction with full opacity.
    pub fn new(source: Color, target: Color, tolerance: ToleranceSpec) -> Self {
        Self {
            source,
            target,
            tolerance,
            opacity: 1.0,
        }
    }

    /// Exact-match instruction (tolerance 0, no feathering).
    pub fn exact(source: Color, target: Color) -> Self {
        Self::new(source, target, ToleranceSpec::EXACT)
    }

    /// Set the blend opacity, 0..=1.
    pub fn with_opacity(mut self, opacity: f32) -> Result<Self, InstructionError> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(InstructionError::OpacityOutOfRange(opacity));
        }
        self.opacity = opacity;
        Ok(self)
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

//! Per-pixel blend weights.

use crate::error::ImageError;

/// A per-pixel weight buffer with values in 0.0..=1.0.
///
/// `0.0` leaves a pixel untouched, `1.0` replaces it fully. Masks are
/// produced by [`MaskBuilder`](crate::MaskBuilder) and consumed by
/// [`ColorTransformer`](crate::ColorTransformer); both sides rely on the
/// range invariant, which [`Mask::new`] enforces for externally built masks.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl Mask {
    /// Create a mask from untrusted weights.
    pub fn new(width: usize, height: usize, weights: Vec<f32>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage);
        }
        if weights.len() != width * height {
            return Err(ImageError::BufferLength {
                expected: width * height,
                actual: weights.len(),
            });
        }
        if let Some(index) = weights.iter().position(|w| !(0.0..=1.0).contains(w)) {
            return Err(ImageError::MaskWeightOutOfRange { index });
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Wrap weights the engine already produced within range.
    pub(crate) fn from_weights(width: usize, height: usize, weights: Vec<f32>) -> Self {
        debug_assert_eq!(weights.len(), width * height);
        debug_assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));
        Self {
            width,
            height,
            weights,
        }
    }

    /// A mask that leaves every pixel untouched.
    pub fn clear(width: usize, height: usize) -> Self {
        Self::from_weights(width, height, vec![0.0; width * height])
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight of the pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.weights[y * self.width + x]
    }

    /// Whether no pixel is affected.
    pub fn is_clear(&self) -> bool {
        self.weights.iter().all(|&w| w == 0.0)
    }

    /// Number of pixels with a non-zero weight.
    pub fn coverage(&self) -> usize {
        self.weights.iter().filter(|&&w| w > 0.0).count()
    }
}

//! Error types for the swap engine
//!
//! Color parsing, instruction validation, option validation and buffer
//! construction each get their own enum so callers can map failures onto
//! their own taxonomy.

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing colors from hex strings or component lists.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (3, 6 or 8 digits after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
    /// Component list must hold 3 (RGB) or 4 (RGBA) values
    ComponentCount(usize),
    /// A component lies outside 0..=255
    ComponentOutOfRange {
        /// Position of the component (0 = red, 3 = alpha)
        index: usize,
        /// The rejected value
        value: i64,
    },
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3, 6 or 8 digits)")
            }
            ParseColorError::InvalidHex(err) => write!(f, "invalid hex character: {}", err),
            ParseColorError::ComponentCount(n) => {
                write!(f, "expected 3 or 4 color components, got {}", n)
            }
            ParseColorError::ComponentOutOfRange { index, value } => {
                write!(
                    f,
                    "color component {} is {} (must be within 0..=255)",
                    index, value
                )
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for swap instruction validation.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionError {
    /// Tolerance must be a finite percentage within 0..=100
    ToleranceOutOfRange(f32),
    /// Feather radius must not be negative
    NegativeFeather(i64),
    /// Feather radius does not fit the pixel coordinate range
    FeatherOutOfRange(i64),
    /// Opacity must be finite and within 0..=1
    OpacityOutOfRange(f32),
    /// Source or target color could not be parsed
    InvalidColor(ParseColorError),
}

impl From<ParseColorError> for InstructionError {
    fn from(err: ParseColorError) -> Self {
        InstructionError::InvalidColor(err)
    }
}

impl fmt::Display for InstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionError::ToleranceOutOfRange(t) => {
                write!(f, "tolerance {} is outside 0..=100", t)
            }
            InstructionError::NegativeFeather(r) => {
                write!(f, "feather radius {} is negative", r)
            }
            InstructionError::FeatherOutOfRange(r) => {
                write!(f, "feather radius {} is too large", r)
            }
            InstructionError::OpacityOutOfRange(o) => {
                write!(f, "opacity {} is outside 0..=1", o)
            }
            InstructionError::InvalidColor(err) => write!(f, "invalid color: {}", err),
        }
    }
}

impl std::error::Error for InstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstructionError::InvalidColor(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for matcher and mask option validation.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    /// Channel weights must be finite and strictly positive
    InvalidWeights {
        /// Red weight
        r: f32,
        /// Green weight
        g: f32,
        /// Blue weight
        b: f32,
    },
    /// Plateau fraction must be within 0..=1
    CoreOutOfRange(f32),
    /// Isolated-pixel factor must be within 0..=1
    IsolatedFactorOutOfRange(f32),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::InvalidWeights { r, g, b } => {
                write!(
                    f,
                    "channel weights ({}, {}, {}) must be finite and positive",
                    r, g, b
                )
            }
            OptionsError::CoreOutOfRange(c) => {
                write!(f, "match plateau {} is outside 0..=1", c)
            }
            OptionsError::IsolatedFactorOutOfRange(v) => {
                write!(f, "isolated pixel factor {} is outside 0..=1", v)
            }
        }
    }
}

impl std::error::Error for OptionsError {}

/// Error type for image and mask buffers.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Width or height is zero
    EmptyImage,
    /// Buffer length disagrees with `width * height * channels`
    BufferLength {
        /// Expected number of samples
        expected: usize,
        /// Number of samples provided
        actual: usize,
    },
    /// Only 3 (RGB) and 4 (RGBA) channels are supported
    UnsupportedChannels(usize),
    /// Mask dimensions differ from the image it is applied to
    MaskMismatch {
        /// Image dimensions (width, height)
        image: (usize, usize),
        /// Mask dimensions (width, height)
        mask: (usize, usize),
    },
    /// A mask weight is NaN or outside 0..=1
    MaskWeightOutOfRange {
        /// Pixel index of the offending weight
        index: usize,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::EmptyImage => write!(f, "image has zero width or height"),
            ImageError::BufferLength { expected, actual } => {
                write!(
                    f,
                    "pixel buffer holds {} samples, expected {}",
                    actual, expected
                )
            }
            ImageError::UnsupportedChannels(n) => {
                write!(f, "unsupported channel count {} (expected 3 or 4)", n)
            }
            ImageError::MaskMismatch { image, mask } => {
                write!(
                    f,
                    "mask is {}x{} but image is {}x{}",
                    mask.0, mask.1, image.0, image.1
                )
            }
            ImageError::MaskWeightOutOfRange { index } => {
                write!(f, "mask weight at pixel {} is outside 0..=1", index)
            }
        }
    }
}

impl std::error::Error for ImageError {}

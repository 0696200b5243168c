//! Unified error type for the swap-engine public API.

use crate::error::{ImageError, InstructionError, OptionsError, ParseColorError};
use std::fmt;

/// Unified error type for the swap-engine public API.
///
/// Wraps all error types from the crate into a single enum for
/// convenient `?` propagation in application code.
///
/// # Example
///
/// ```
/// use swap_engine::{Color, EngineError, SwapInstruction, ToleranceSpec};
///
/// fn parse(source: &str, target: &str) -> Result<SwapInstruction, EngineError> {
///     let tolerance = ToleranceSpec::new(10.0, 1)?;
///     Ok(SwapInstruction::new(source.parse()?, target.parse()?, tolerance))
/// }
///
/// assert!(parse("#ff0000", "#0000ff").is_ok());
/// assert!(parse("#ff00", "#0000ff").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Color parsing error (invalid hex string or component list)
    ParseColor(ParseColorError),
    /// Instruction validation error
    Instruction(InstructionError),
    /// Matcher or mask option validation error
    Options(OptionsError),
    /// Pixel buffer or mask error
    Image(ImageError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ParseColor(err) => write!(f, "color parse error: {}", err),
            EngineError::Instruction(err) => write!(f, "instruction error: {}", err),
            EngineError::Options(err) => write!(f, "options error: {}", err),
            EngineError::Image(err) => write!(f, "image error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::ParseColor(err) => Some(err),
            EngineError::Instruction(err) => Some(err),
            EngineError::Options(err) => Some(err),
            EngineError::Image(err) => Some(err),
        }
    }
}

impl From<ParseColorError> for EngineError {
    fn from(err: ParseColorError) -> Self {
        EngineError::ParseColor(err)
    }
}

impl From<InstructionError> for EngineError {
    fn from(err: InstructionError) -> Self {
        EngineError::Instruction(err)
    }
}

impl From<OptionsError> for EngineError {
    fn from(err: OptionsError) -> Self {
        EngineError::Options(err)
    }
}

impl From<ImageError> for EngineError {
    fn from(err: ImageError) -> Self {
        EngineError::Image(err)
    }
}

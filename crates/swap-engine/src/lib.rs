#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! swap-engine: tolerance-based color replacement with soft masks
//!
//! This library replaces every pixel that is perceptually close to a source
//! color with a target color, without the jagged edges and banding that a
//! hard threshold produces on anti-aliased artwork and photos.
//!
//! # Quick Start
//!
//! The [`ColorSwapper`] builder is the primary entry point:
//!
//! ```
//! use swap_engine::{Channels, Color, ColorSwapper, Image, SwapInstruction, ToleranceSpec};
//!
//! let red: Color = "#ff0000".parse().unwrap();
//! let blue: Color = "#0000ff".parse().unwrap();
//! let image = Image::filled(2, 2, Channels::Rgb, red).unwrap();
//!
//! let instruction = SwapInstruction::new(red, blue, ToleranceSpec::new(10.0, 0).unwrap());
//! let result = ColorSwapper::new().swap(&image, &instruction).unwrap();
//!
//! assert_eq!(result, Image::filled(2, 2, Channels::Rgb, blue).unwrap());
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Image + SwapInstruction
//!     |
//!     v
//! ColorMatcher             (weight per pixel from weighted RGB distance)
//!     |
//!     v
//! Consensus                (isolated matches scaled by isolated_factor)
//!     |
//!     v
//! Feather                  (separable Gaussian, sigma = radius / 2)
//!     |
//!     v
//! Opacity                  (uniform scale)
//!     |
//!     v
//! ColorTransformer         (round(orig * (1 - w) + target * w))
//!     |
//!     v
//! new Image
//! ```
//!
//! Multiple instructions are applied strictly in order, each one seeing the
//! output of the previous ([`ColorSwapper::swap_all`]).
//!
//! # Distance Metric
//!
//! [`ColorMetric`] measures Euclidean distance in RGB after scaling each
//! channel by the square root of its weight:
//!
//! ```text
//! d = sqrt(wr * dr^2 + wg * dg^2 + wb * db^2)
//! ```
//!
//! Default weights are `(2, 4, 3)`: the eye is most sensitive to green and
//! least to red. The result is divided by the black-to-white distance and
//! multiplied by 100, so tolerances are percentages independent of the
//! weights. Identical colors are always at distance exactly 0, and alpha
//! never contributes.
//!
//! # Match Weights
//!
//! A tolerance `T` maps to a raw threshold. Pixels at or beyond it weigh
//! 0.0. Pixels within `core * T` weigh 1.0 (the plateau, default 60%), so
//! colors that are clearly the same shade swap completely. Between the two
//! the weight follows [`Falloff::Smoothstep`] (default) or
//! [`Falloff::Linear`], which leaves anti-aliased rim pixels partially
//! blended.
//!
//! # Masks
//!
//! [`MaskBuilder`] turns raw weights into a [`Mask`]. A matching pixel whose
//! eight neighbours all failed to match is treated as noise and scaled by
//! `isolated_factor` (default 0.0). With a non-zero feather radius the mask
//! is blurred so the replacement fades in over that many pixels; the blur
//! kernel is strictly positive, so feathering only ever widens the affected
//! region.

pub mod api;
pub mod buffer;
pub mod color;
pub mod error;
pub mod instruction;
pub mod mask;
pub mod matcher;
pub mod transform;


pub use api::{ColorSwapper, EngineError};
pub use buffer::{Channels, Image, Mask};
pub use color::{ChannelWeights, Color, ColorMetric};
pub use error::{ImageError, InstructionError, OptionsError, ParseColorError};
pub use instruction::{SwapInstruction, ToleranceSpec};
pub use mask::{MaskBuilder, MaskOptions};
pub use matcher::{ColorMatcher, Falloff, MatchOptions};
pub use transform::ColorTransformer;

//! Color types and distance utilities
//!
//! - [`Color`]: 8-bit RGB(A) values parsed from hex strings or components
//! - [`ColorMetric`]: perceptually weighted distance on a 0..=100 scale
//!
//! # Example
//!
//! ```
//! use swap_engine::{Color, ColorMetric};
//!
//! let metric = ColorMetric::default();
//! let red: Color = "#FF0000".parse().unwrap();
//! let near_red = Color::rgb(240, 0, 0);
//!
//! assert!(metric.distance(red, near_red) < 5.0);
//! ```

mod color;
mod metric;

pub use color::Color;
pub use metric::{ChannelWeights, ColorMetric};

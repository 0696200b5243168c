//! Pixel and weight buffers shared by every stage.

mod image;
mod mask;

pub use image::{Channels, Image};
pub use mask::Mask;

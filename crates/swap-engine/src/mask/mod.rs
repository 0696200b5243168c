//! Soft-edged mask construction.
//!
//! A mask assigns every pixel a blend weight for one instruction. The
//! [`MaskBuilder`] pipeline keeps anti-aliased rims partially weighted,
//! drops isolated look-alike pixels, and optionally feathers transitions
//! so the blended result has no hard edge.

mod builder;
mod consensus;
mod feather;

pub use builder::{MaskBuilder, MaskOptions};
pub use consensus::suppress_isolated;
pub use feather::{feather, gaussian_kernel};

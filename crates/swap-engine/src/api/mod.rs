//! Public API for the swap-engine crate.
//!
//! This module provides the high-level API: [`ColorSwapper`] builder and
//! [`EngineError`] unified error type.

mod builder;
mod error;

pub use builder::ColorSwapper;
pub use error::EngineError;

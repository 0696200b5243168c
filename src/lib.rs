//! Paintswap - tolerance-based color swapping
//!
//! Decodes PNG/JPEG input, replaces colors through soft-edged masks and
//! re-encodes the result. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;

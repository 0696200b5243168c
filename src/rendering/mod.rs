pub mod codec;

pub use codec::{decode, encode, probe, Decoded, ImageHeader, OutputFormat};

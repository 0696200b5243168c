pub mod config;
pub mod instruction;

pub use config::{
    AppConfig, ConfigSource, FalloffCurve, LimitsConfig, MatchingConfig, OutputConfig,
    PngCompression, WeightsConfig,
};
pub use instruction::{parse_instructions, ColorValue, InstructionPayload};

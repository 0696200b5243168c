use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use swap_engine::{ChannelWeights, ColorSwapper, Falloff};

use crate::error::ConfigError;

/// Configuration embedded into the binary
const EMBEDDED_CONFIG: &str = include_str!("../../config.yaml");

/// Application configuration loaded from config.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Request size and concurrency limits
    pub limits: LimitsConfig,

    /// Color matching parameters
    pub matching: MatchingConfig,

    /// Encoder settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub max_instructions: usize,
    pub max_input_bytes: usize,
    pub max_feather_radius: u32,

    /// Worker pool size; `None` means one worker per CPU core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_requests: Option<usize>,

    pub request_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_width: 4096,
            max_height: 4096,
            max_instructions: 32,
            max_input_bytes: 10 * 1024 * 1024,
            max_feather_radius: 64,
            max_concurrent_requests: None,
            request_timeout_ms: 30_000,
        }
    }
}

impl LimitsConfig {
    /// Effective worker pool size.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_requests.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FalloffCurve {
    Linear,
    #[default]
    Smoothstep,
}

impl From<FalloffCurve> for Falloff {
    fn from(curve: FalloffCurve) -> Self {
        match curve {
            FalloffCurve::Linear => Falloff::Linear,
            FalloffCurve::Smoothstep => Falloff::Smoothstep,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WeightsConfig {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        let w = ChannelWeights::default();
        Self {
            r: w.r,
            g: w.g,
            b: w.b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: WeightsConfig,
    pub falloff: FalloffCurve,
    pub core: f32,
    pub isolated_factor: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            falloff: FalloffCurve::default(),
            core: 0.6,
            isolated_factor: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl From<PngCompression> for png::Compression {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Default => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub jpeg_quality: u8,
    pub png_compression: PngCompression,
    pub optimize_png: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            png_compression: PngCompression::default(),
            optimize_png: false,
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
    /// The named file could not be used; defaults are in effect
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Embedded => f.write_str("embedded"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("defaults"),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or the embedded config.yaml.
    ///
    /// Unreadable, unparsable or invalid files are logged and replaced by
    /// the defaults.
    pub fn load(path: Option<&Path>) -> (Self, ConfigSource) {
        let result = match path {
            Some(path) => Self::from_file(path).map(|c| (c, ConfigSource::File(path.to_path_buf()))),
            None => Self::from_yaml_str(EMBEDDED_CONFIG).map(|c| (c, ConfigSource::Embedded)),
        };

        match result {
            Ok((config, source)) => {
                tracing::info!(
                    %source,
                    max_width = config.limits.max_width,
                    max_height = config.limits.max_height,
                    workers = config.limits.concurrency(),
                    "Loaded configuration"
                );
                (config, source)
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                (Self::default(), ConfigSource::Defaults)
            }
        }
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a defaulted struct
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.max_width == 0 || limits.max_height == 0 {
            return Err(ConfigError::Invalid(
                "max_width and max_height must be positive".to_string(),
            ));
        }
        if limits.max_instructions == 0 {
            return Err(ConfigError::Invalid(
                "max_instructions must be positive".to_string(),
            ));
        }
        if limits.max_input_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_input_bytes must be positive".to_string(),
            ));
        }
        if limits.max_concurrent_requests == Some(0) {
            return Err(ConfigError::Invalid(
                "max_concurrent_requests must be positive".to_string(),
            ));
        }
        if limits.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality {} is outside 1..=100",
                self.output.jpeg_quality
            )));
        }
        self.swapper()?;
        Ok(())
    }

    /// Engine configured from the `matching` section.
    pub fn swapper(&self) -> Result<ColorSwapper, ConfigError> {
        let m = &self.matching;
        let weights = ChannelWeights::new(m.weights.r, m.weights.g, m.weights.b)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let swapper = ColorSwapper::new()
            .weights(weights)
            .falloff(m.falloff.into())
            .core(m.core)
            .isolated_factor(m.isolated_factor);
        swapper
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(swapper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.limits.max_width, 4096);
        assert_eq!(config.limits.max_height, 4096);
        assert_eq!(config.limits.max_input_bytes, 10 * 1024 * 1024);
        assert_eq!(config.limits.max_concurrent_requests, None);
        assert_eq!(config.matching.falloff, FalloffCurve::Smoothstep);
        assert_eq!(config.output.jpeg_quality, 90);
        assert!(!config.output.optimize_png);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = AppConfig::from_yaml_str(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
limits:
  max_instructions: 4
matching:
  falloff: linear
"#,
        )
        .unwrap();

        assert_eq!(config.limits.max_instructions, 4);
        assert_eq!(config.limits.max_width, 4096);
        assert_eq!(config.matching.falloff, FalloffCurve::Linear);
        assert!((config.matching.core - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.limits.max_instructions = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.limits.max_concurrent_requests = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = AppConfig::default();
        config.output.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_matching() {
        let mut config = AppConfig::default();
        config.matching.weights.g = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.matching.core = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_concurrency_resolves() {
        let mut limits = LimitsConfig::default();
        assert!(limits.concurrency() >= 1);
        limits.max_concurrent_requests = Some(3);
        assert_eq!(limits.concurrency(), 3);
    }

    #[test]
    fn test_unknown_falloff_is_parse_error() {
        let result = AppConfig::from_yaml_str("matching:\n  falloff: cubic\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

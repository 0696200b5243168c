use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::services::swap_pipeline::Stage;

/// Every way a swap request can fail.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid instruction {index}: {reason}")]
    InvalidInstruction { index: usize, reason: String },

    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(#[from] LimitExceeded),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Worker pool is busy ({max_concurrent} requests in flight)")]
    Capacity { max_concurrent: usize },

    #[error("Request cancelled during {stage}")]
    Cancelled { stage: Stage },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Input is empty")]
    Empty,

    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0} (expected PNG or JPEG)")]
    UnsupportedFormat(String),

    #[error("Malformed image header: {0}")]
    Header(String),

    #[error("Malformed image data: {0}")]
    Malformed(String),
}

/// Named configuration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Width,
    Height,
    Instructions,
    InputBytes,
    FeatherRadius,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Limit::Width => "max_width",
            Limit::Height => "max_height",
            Limit::Instructions => "max_instructions",
            Limit::InputBytes => "max_input_bytes",
            Limit::FeatherRadius => "max_feather_radius",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{limit}: {actual} exceeds {allowed}")]
pub struct LimitExceeded {
    pub limit: Limit,
    pub actual: u64,
    pub allowed: u64,
}

impl LimitExceeded {
    /// `Ok` when `actual` is within `allowed`.
    pub fn check(limit: Limit, actual: u64, allowed: u64) -> Result<(), LimitExceeded> {
        if actual > allowed {
            Err(LimitExceeded {
                limit,
                actual,
                allowed,
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_instruction_message() {
        let error = SwapError::InvalidInstruction {
            index: 2,
            reason: "tolerance 150 is outside 0..=100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid instruction 2: tolerance 150 is outside 0..=100"
        );
    }

    #[test]
    fn test_limit_exceeded_message() {
        let error = SwapError::from(LimitExceeded {
            limit: Limit::Width,
            actual: 5000,
            allowed: 4096,
        });
        assert_eq!(
            error.to_string(),
            "Resource limit exceeded: max_width: 5000 exceeds 4096"
        );
    }

    #[test]
    fn test_limit_check() {
        assert!(LimitExceeded::check(Limit::Instructions, 3, 3).is_ok());
        assert_eq!(
            LimitExceeded::check(Limit::Instructions, 4, 3),
            Err(LimitExceeded {
                limit: Limit::Instructions,
                actual: 4,
                allowed: 3
            })
        );
    }

    #[test]
    fn test_capacity_message() {
        let error = SwapError::Capacity { max_concurrent: 4 };
        assert_eq!(
            error.to_string(),
            "Worker pool is busy (4 requests in flight)"
        );
    }

    #[test]
    fn test_cancelled_names_stage() {
        let error = SwapError::Cancelled {
            stage: Stage::Matching(1),
        };
        assert_eq!(error.to_string(), "Request cancelled during matching #1");
    }

    #[test]
    fn test_decode_error_wraps() {
        let error: SwapError = DecodeError::UnknownFormat.into();
        match error {
            SwapError::Decode(DecodeError::UnknownFormat) => {}
            _ => panic!("Expected Decode variant"),
        }
    }
}

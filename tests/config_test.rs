//! Config file loading and its effect on the pipeline.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;

use paintswap::error::{ConfigError, Limit, SwapError};
use paintswap::models::{AppConfig, ConfigSource, FalloffCurve, InstructionPayload};
use paintswap::services::{SwapPipeline, SwapPool, SwapRequest};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_embedded_without_path() {
    let (config, source) = AppConfig::load(None);
    assert_eq!(source, ConfigSource::Embedded);
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
limits:
  max_instructions: 1
  max_concurrent_requests: 2
  request_timeout_ms: 500
matching:
  falloff: linear
  core: 0.5
"#,
    );

    let (config, source) = AppConfig::load(Some(file.path()));
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(config.limits.max_instructions, 1);
    assert_eq!(config.limits.concurrency(), 2);
    assert_eq!(config.limits.request_timeout().as_millis(), 500);
    assert_eq!(config.matching.falloff, FalloffCurve::Linear);
    assert_eq!(config.output.jpeg_quality, 90);

    let pool = SwapPool::from_config(&config).unwrap();
    assert_eq!(pool.max_concurrent(), 2);
}

#[test]
fn test_unparsable_file_falls_back_to_defaults() {
    let file = write_config("limits: [this is not a mapping");
    let (config, source) = AppConfig::load(Some(file.path()));
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_invalid_values_fall_back_to_defaults() {
    let file = write_config("output:\n  jpeg_quality: 0\n");
    let (_, source) = AppConfig::load(Some(file.path()));
    assert_eq!(source, ConfigSource::Defaults);

    assert!(matches!(
        AppConfig::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");
    assert!(matches!(
        AppConfig::from_file(&path),
        Err(ConfigError::Read { .. })
    ));
    assert_eq!(AppConfig::load(Some(path.as_path())).1, ConfigSource::Defaults);
}

#[test]
fn test_file_limits_reach_the_pipeline() {
    let file = write_config("limits:\n  max_instructions: 1\n");
    let config = AppConfig::from_file(file.path()).unwrap();
    let pipeline = SwapPipeline::new(&config).unwrap();

    let request = SwapRequest::new(
        solid_png(2, 2, RED),
        vec![InstructionPayload::new(RED, BLUE); 2],
    );
    match pipeline.process(request) {
        Err(SwapError::ResourceLimit(e)) => assert_eq!(e.limit, Limit::Instructions),
        other => panic!("Expected ResourceLimit, got {other:?}"),
    }
}

#[test]
fn test_linear_falloff_changes_partial_weights() {
    // A pixel between the plateau and the threshold blends differently per curve
    let input = png_rgb(3, 3, |_, _| swap_engine::Color::rgb(255, 40, 40));
    let instruction = InstructionPayload::new(RED, BLUE).tolerance(15.0);

    let smooth = SwapPipeline::new(&AppConfig::default())
        .unwrap()
        .process(SwapRequest::new(input.clone(), vec![instruction.clone()]))
        .unwrap();

    let linear_config =
        AppConfig::from_yaml_str("matching:\n  falloff: linear\n  core: 0.0\n").unwrap();
    let linear = SwapPipeline::new(&linear_config)
        .unwrap()
        .process(SwapRequest::new(input, vec![instruction]))
        .unwrap();

    assert_ne!(smooth.bytes, linear.bytes);
}

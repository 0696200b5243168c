//! Assertion helpers for tests.

use pretty_assertions::assert_eq;

use paintswap::rendering::{self, OutputFormat};
use paintswap::services::Stage;
use swap_engine::{Color, Image};

/// Assert bytes carry the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert bytes carry the JPEG SOI marker
pub fn assert_jpeg(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0xFF, 0xD8]),
        "Expected JPEG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Decode output bytes, asserting the expected format
pub fn decode_as(bytes: &[u8], format: OutputFormat) -> Image {
    let decoded = rendering::decode(bytes).expect("output should decode");
    assert_eq!(decoded.format, format);
    decoded.image
}

/// Assert every pixel equals `color`
pub fn assert_all_pixels(image: &Image, color: Color) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            assert_eq!(image.pixel(x, y), color, "pixel ({x}, {y})");
        }
    }
}

/// Assert no matching, masking or transforming stage ran
pub fn assert_no_instruction_stages(stages: &[Stage]) {
    let ran: Vec<&Stage> = stages
        .iter()
        .filter(|s| {
            matches!(
                s,
                Stage::Matching(_) | Stage::Masking(_) | Stage::Transforming(_)
            )
        })
        .collect();
    assert!(ran.is_empty(), "Unexpected instruction stages: {ran:?}");
}

//! Test fixtures: in-memory images, colors and configurations.

use image::{ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

use paintswap::models::AppConfig;
use paintswap::services::SwapPipeline;
use swap_engine::Color;

pub const RED: Color = Color::rgb(255, 0, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const WHITE: Color = Color::rgb(255, 255, 255);
/// About 5% of the maximum distance from `RED` with the default weights
pub const NEAR_RED: Color = Color::rgb(228, 0, 0);

fn encode(image: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .expect("fixture image should encode");
    buf.into_inner()
}

/// RGB PNG where every pixel comes from `f(x, y)`.
pub fn png_rgb(width: u32, height: u32, f: impl Fn(u32, u32) -> Color) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| image::Rgb(f(x, y).rgb_bytes()));
    encode(image.into(), ImageFormat::Png)
}

/// RGBA PNG where every pixel comes from `f(x, y)`; missing alpha is opaque.
pub fn png_rgba(width: u32, height: u32, f: impl Fn(u32, u32) -> Color) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let c = f(x, y);
        image::Rgba([c.r, c.g, c.b, c.a.unwrap_or(255)])
    });
    encode(image.into(), ImageFormat::Png)
}

/// RGB JPEG where every pixel comes from `f(x, y)`.
pub fn jpeg_rgb(width: u32, height: u32, f: impl Fn(u32, u32) -> Color) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| image::Rgb(f(x, y).rgb_bytes()));
    encode(image.into(), ImageFormat::Jpeg)
}

pub fn solid_png(width: u32, height: u32, color: Color) -> Vec<u8> {
    png_rgb(width, height, |_, _| color)
}

/// 4x4 image: top two rows `RED`, bottom two rows `NEAR_RED`.
pub fn half_red_png() -> Vec<u8> {
    png_rgb(4, 4, |_, y| if y < 2 { RED } else { NEAR_RED })
}

/// Default configuration with a fixed pool size.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.limits.max_concurrent_requests = Some(4);
    config
}

pub fn test_pipeline() -> SwapPipeline {
    SwapPipeline::new(&test_config()).expect("default config should be valid")
}

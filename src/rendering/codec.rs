use image::{ImageFormat, ImageReader};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use swap_engine::{Channels, Image};

use crate::error::{DecodeError, SwapError};
use crate::models::OutputConfig;

/// Encoded image formats accepted and produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    fn from_image_format(format: ImageFormat) -> Result<Self, DecodeError> {
        match format {
            ImageFormat::Png => Ok(OutputFormat::Png),
            ImageFormat::Jpeg => Ok(OutputFormat::Jpeg),
            other => Err(DecodeError::UnsupportedFormat(format!("{other:?}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("png"),
            OutputFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(format!("unsupported output format {other:?} (png or jpeg)")),
        }
    }
}

/// Header information read without decoding pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// A fully decoded input image
#[derive(Debug, Clone)]
pub struct Decoded {
    pub format: OutputFormat,
    pub image: Image,
}

fn reader(bytes: &[u8]) -> Result<(ImageReader<Cursor<&[u8]>>, OutputFormat), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Header(e.to_string()))?;
    let format = reader.format().ok_or(DecodeError::UnknownFormat)?;
    let format = OutputFormat::from_image_format(format)?;
    Ok((reader, format))
}

/// Sniff the format and read dimensions from the header only.
pub fn probe(bytes: &[u8]) -> Result<ImageHeader, DecodeError> {
    let (reader, format) = reader(bytes)?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DecodeError::Header(e.to_string()))?;
    Ok(ImageHeader {
        format,
        width,
        height,
    })
}

/// Decode PNG or JPEG bytes into an 8-bit RGB or RGBA image.
///
/// Grayscale inputs are expanded to RGB(A) and 16-bit samples are reduced
/// to 8 bits.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let (reader, format) = reader(bytes)?;
    let dynamic = reader
        .decode()
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let (width, height, channels, data) = if dynamic.color().has_alpha() {
        let rgba = dynamic.into_rgba8();
        let (w, h) = rgba.dimensions();
        (w, h, Channels::Rgba, rgba.into_raw())
    } else {
        let rgb = dynamic.into_rgb8();
        let (w, h) = rgb.dimensions();
        (w, h, Channels::Rgb, rgb.into_raw())
    };

    let image = Image::new(width as usize, height as usize, channels, data)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    Ok(Decoded { format, image })
}

/// Encode `image` in `format` using the encoder settings in `output`.
pub fn encode(
    image: &Image,
    format: OutputFormat,
    output: &OutputConfig,
) -> Result<Vec<u8>, SwapError> {
    match format {
        OutputFormat::Png => {
            let png_bytes = encode_png(image, output.png_compression.into())?;
            if !output.optimize_png {
                return Ok(png_bytes);
            }
            // Falls back to the plain encoding if oxipng fails
            let optimized = oxipng::optimize_from_memory(
                &png_bytes,
                &oxipng::Options {
                    strip: oxipng::StripChunks::Safe,
                    optimize_alpha: false,
                    ..Default::default()
                },
            )
            .unwrap_or(png_bytes);
            Ok(optimized)
        }
        OutputFormat::Jpeg => encode_jpeg(image, output.jpeg_quality),
    }
}

fn dimensions_u32(image: &Image) -> Result<(u32, u32), SwapError> {
    let width = u32::try_from(image.width())
        .map_err(|_| SwapError::Encode(format!("width {} too large", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| SwapError::Encode(format!("height {} too large", image.height())))?;
    Ok((width, height))
}

fn encode_png(image: &Image, compression: png::Compression) -> Result<Vec<u8>, SwapError> {
    let (width, height) = dimensions_u32(image)?;
    let color_type = match image.channels() {
        Channels::Rgb => png::ColorType::Rgb,
        Channels::Rgba => png::ColorType::Rgba,
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression);
        let mut writer = encoder
            .write_header()
            .map_err(|e| SwapError::Encode(format!("PNG: {e}")))?;
        writer
            .write_image_data(image.data())
            .map_err(|e| SwapError::Encode(format!("PNG: {e}")))?;
    }
    Ok(buf.into_inner())
}

fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, SwapError> {
    if image.channels().has_alpha() {
        return Err(SwapError::Encode(
            "JPEG cannot store an alpha channel; request PNG output".to_string(),
        ));
    }
    let (width, height) = dimensions_u32(image)?;

    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(image.data(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| SwapError::Encode(format!("JPEG: {e}")))?;
    Ok(buf)
}

//! Interleaved 8-bit pixel buffer.

use crate::color::Color;
use crate::error::ImageError;

/// Channel layout of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    /// Red, green, blue
    Rgb,
    /// Red, green, blue, alpha
    Rgba,
}

impl Channels {
    /// Number of samples per pixel.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    /// Layout for a sample count, if supported.
    pub fn from_count(count: usize) -> Result<Self, ImageError> {
        match count {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            n => Err(ImageError::UnsupportedChannels(n)),
        }
    }

    /// Whether the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, Channels::Rgba)
    }
}

/// A decoded image: row-major, interleaved `u8` samples.
///
/// The buffer length always equals `width * height * channels`. Images are
/// immutable once constructed; every transform produces a new `Image`.
///
/// # Example
///
/// ```
/// use swap_engine::{Channels, Color, Image};
///
/// let image = Image::filled(2, 2, Channels::Rgb, Color::rgb(255, 0, 0)).unwrap();
/// assert_eq!(image.data().len(), 2 * 2 * 3);
/// assert_eq!(image.pixel(1, 1), Color::rgb(255, 0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: Channels,
    data: Vec<u8>,
}

impl Image {
    /// Wrap an existing sample buffer, validating its length.
    pub fn new(
        width: usize,
        height: usize,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels.count()))
            .ok_or(ImageError::BufferLength {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// An image where every pixel has the same color.
    ///
    /// Alpha defaults to 255 (opaque) for RGBA layouts when `color.a` is `None`.
    pub fn filled(
        width: usize,
        height: usize,
        channels: Channels,
        color: Color,
    ) -> Result<Self, ImageError> {
        let pixel = sample_bytes(color, channels);
        let data = pixel[..channels.count()].repeat(width * height);
        Self::new(width, height, channels, data)
    }

    /// Build an image from a row-major list of colors.
    pub fn from_colors(
        width: usize,
        height: usize,
        channels: Channels,
        colors: &[Color],
    ) -> Result<Self, ImageError> {
        let n = channels.count();
        let mut data = Vec::with_capacity(colors.len() * n);
        for &color in colors {
            data.extend_from_slice(&sample_bytes(color, channels)[..n]);
        }
        Self::new(width, height, channels, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return its sample buffer.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Iterate over pixels as sample slices of length `channels.count()`.
    #[inline]
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels.count())
    }

    /// Color of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        let n = self.channels.count();
        let i = (y * self.width + x) * n;
        let p = &self.data[i..i + n];
        Color {
            r: p[0],
            g: p[1],
            b: p[2],
            a: self.channels.has_alpha().then(|| p[3]),
        }
    }
}

fn sample_bytes(color: Color, channels: Channels) -> [u8; 4] {
    let alpha = if channels.has_alpha() {
        color.a.unwrap_or(255)
    } else {
        0
    };
    [color.r, color.g, color.b, alpha]
}

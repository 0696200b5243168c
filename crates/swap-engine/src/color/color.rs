//! 8-bit color type
//!
//! Colors arrive from request payloads either as hex strings or as integer
//! component lists. Both forms are parsed into [`Color`], whose `u8` fields
//! make out-of-range components unrepresentable past the boundary.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// An sRGB color with an optional alpha component.
///
/// `a` is `None` for plain RGB colors. A target color with `Some(alpha)` opts
/// the swap into blending the alpha channel of RGBA images; without it alpha
/// is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
    /// Explicit alpha (0..=255), `None` when the color does not target alpha
    pub a: Option<u8>,
}

impl Color {
    /// Create an RGB color without alpha.
    ///
    /// # Example
    /// ```
    /// use swap_engine::Color;
    /// let red = Color::rgb(255, 0, 0);
    /// assert_eq!(red.a, None);
    /// ```
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// Create a color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Build a color from untrusted integer components.
    ///
    /// Accepts `[r, g, b]` or `[r, g, b, a]`; every value must lie in 0..=255.
    ///
    /// # Example
    /// ```
    /// use swap_engine::Color;
    /// assert_eq!(Color::from_components(&[0, 128, 255]).unwrap(), Color::rgb(0, 128, 255));
    /// assert!(Color::from_components(&[0, 256, 0]).is_err());
    /// ```
    pub fn from_components(components: &[i64]) -> Result<Self, ParseColorError> {
        if components.len() != 3 && components.len() != 4 {
            return Err(ParseColorError::ComponentCount(components.len()));
        }

        let mut bytes = [0u8; 4];
        for (index, &value) in components.iter().enumerate() {
            bytes[index] = u8::try_from(value)
                .map_err(|_| ParseColorError::ComponentOutOfRange { index, value })?;
        }

        Ok(Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: (components.len() == 4).then_some(bytes[3]),
        })
    }

    /// The RGB components as a byte array, ignoring alpha.
    #[inline]
    pub fn rgb_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Hex representation, `#RRGGBB` or `#RRGGBBAA` when alpha is set.
    pub fn to_hex(self) -> String {
        match self.a {
            Some(a) => format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, a),
            None => format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Supports `#RRGGBB`, `#RGB` (shorthand) and `#RRGGBBAA`, each with or
    /// without the leading `#`. Parsing is case-insensitive and trims
    /// surrounding whitespace.
    ///
    /// ```
    /// use swap_engine::Color;
    ///
    /// let red: Color = "#FF0000".parse().unwrap();
    /// assert_eq!(red, Color::rgb(255, 0, 0));
    ///
    /// let clear: Color = "#00000000".parse().unwrap();
    /// assert_eq!(clear.a, Some(0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        let pair = |i: usize| u8::from_str_radix(&s[i..i + 2], 16);

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Ok(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing_6digit() {
        let white: Color = "#FFFFFF".parse().unwrap();
        assert_eq!(white, Color::rgb(255, 255, 255));

        let no_hash: Color = "00ff7f".parse().unwrap();
        assert_eq!(no_hash, Color::rgb(0, 255, 127));
    }

    #[test]
    fn test_hex_parsing_shorthand() {
        let color: Color = "#ABC".parse().unwrap();
        assert_eq!(color, Color::rgb(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn test_hex_parsing_alpha() {
        let color: Color = " #11223380 ".parse().unwrap();
        assert_eq!(color, Color::rgba(0x11, 0x22, 0x33, 0x80));
        assert_eq!(color.to_hex(), "#11223380");
    }

    #[test]
    fn test_hex_parsing_errors() {
        assert!(matches!(
            "#GGG".parse::<Color>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "#FFFF".parse::<Color>(),
            Err(ParseColorError::InvalidLength)
        ));
        assert!(matches!(
            "".parse::<Color>(),
            Err(ParseColorError::InvalidLength)
        ));
        // Multi-byte characters must not panic on slicing
        assert!(matches!(
            "#ÿÿÿ".parse::<Color>(),
            Err(ParseColorError::InvalidLength)
        ));
    }

    #[test]
    fn test_from_components() {
        assert_eq!(
            Color::from_components(&[1, 2, 3, 4]).unwrap(),
            Color::rgba(1, 2, 3, 4)
        );
        assert_eq!(
            Color::from_components(&[1, -2, 3]),
            Err(ParseColorError::ComponentOutOfRange {
                index: 1,
                value: -2
            })
        );
        assert_eq!(
            Color::from_components(&[1, 2]),
            Err(ParseColorError::ComponentCount(2))
        );
    }

    #[test]
    fn test_display_round_trip() {
        let color = Color::rgb(18, 52, 86);
        let parsed: Color = color.to_string().parse().unwrap();
        assert_eq!(parsed, color);
    }
}

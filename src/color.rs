//! Color quantization between 24-bit RGB888 and 16-bit RGB565
//!
//! Palettes are authored as 24-bit colors but persisted as RGB565. Each
//! channel is rescaled independently with rounding:
//!
//! - Red: 8 bits -> 5 bits
//! - Green: 8 bits -> 6 bits
//! - Blue: 8 bits -> 5 bits
//!
//! Expanding back to 8 bits uses the inverse scaling. The round trip is lossy
//! by at most one quantization step per channel, and applying it a second
//! time is the identity.
//!
//! Also provides `#RGB` / `#RRGGBB` hex parsing used by the JSON form of a
//! sprite sheet.

use thiserror::Error;

/// Bit depth of the red channel in RGB565
pub const RED_BITS: u32 = 5;
/// Bit depth of the green channel in RGB565
pub const GREEN_BITS: u32 = 6;
/// Bit depth of the blue channel in RGB565
pub const BLUE_BITS: u32 = 5;

/// A 24-bit color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` integer. Bits above 24 are ignored.
    pub const fn from_u32(value: u32) -> Self {
        Self { r: (value >> 16) as u8, g: (value >> 8) as u8, b: value as u8 }
    }

    /// Pack as `(r << 16) | (g << 8) | b`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Format as an uppercase `#RRGGBB` string.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A color at reduced depth: red and blue in `0..=31`, green in `0..=63`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb565 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb565 {
    /// Unpack a 16-bit `rrrrrggggggbbbbb` value.
    pub const fn from_u16(value: u16) -> Self {
        Self {
            r: ((value >> 11) & 0x1F) as u8,
            g: ((value >> 5) & 0x3F) as u8,
            b: (value & 0x1F) as u8,
        }
    }

    /// Pack as `(r << 11) | (g << 5) | b`.
    pub const fn to_u16(self) -> u16 {
        ((self.r as u16 & 0x1F) << 11) | ((self.g as u16 & 0x3F) << 5) | (self.b as u16 & 0x1F)
    }
}

/// Rescale a channel value from `src_bits` to `dst_bits` depth.
///
/// Computes `round(value / max_src * max_dst)` in integer arithmetic, rounding
/// halves up.
fn scale_channel(value: u8, src_bits: u32, dst_bits: u32) -> u8 {
    let max_src = (1u32 << src_bits) - 1;
    let max_dst = (1u32 << dst_bits) - 1;
    let value = (value as u32).min(max_src);
    ((value * max_dst * 2 + max_src) / (max_src * 2)) as u8
}

/// Quantize an 8-bit-per-channel color to RGB565 channel values.
///
/// # Examples
///
/// ```
/// use tilebin::color::{rgb_to_rgb565, Rgb};
///
/// let q = rgb_to_rgb565(Rgb::new(255, 128, 0));
/// assert_eq!((q.r, q.g, q.b), (31, 32, 0));
/// ```
pub fn rgb_to_rgb565(color: Rgb) -> Rgb565 {
    Rgb565 {
        r: scale_channel(color.r, 8, RED_BITS),
        g: scale_channel(color.g, 8, GREEN_BITS),
        b: scale_channel(color.b, 8, BLUE_BITS),
    }
}

/// Expand RGB565 channel values back to 8 bits per channel.
pub fn rgb565_to_rgb(color: Rgb565) -> Rgb {
    Rgb {
        r: scale_channel(color.r, RED_BITS, 8),
        g: scale_channel(color.g, GREEN_BITS, 8),
        b: scale_channel(color.b, BLUE_BITS, 8),
    }
}

/// Quantize a packed `0xRRGGBB` color to a packed RGB565 value.
pub fn int_rgb_to_rgb565(rgb: u32) -> u16 {
    rgb_to_rgb565(Rgb::from_u32(rgb)).to_u16()
}

/// Expand a packed RGB565 value to a packed `0xRRGGBB` color.
pub fn int_rgb565_to_rgb(rgb565: u16) -> u32 {
    rgb565_to_rgb(Rgb565::from_u16(rgb565)).to_u32()
}

/// The color a `0xRRGGBB` value becomes after being stored and loaded.
///
/// # Examples
///
/// ```
/// use tilebin::color::rgb565_mapped_rgb;
///
/// let once = rgb565_mapped_rgb(0x6496C8);
/// assert_eq!(rgb565_mapped_rgb(once), once);
/// ```
pub fn rgb565_mapped_rgb(rgb: u32) -> u32 {
    int_rgb565_to_rgb(int_rgb_to_rgb565(rgb))
}

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Parse a `#RGB` or `#RRGGBB` string into a packed `0xRRGGBB` value.
///
/// 3-digit colors have each digit doubled (`#F80` -> `#FF8800`).
///
/// # Examples
///
/// ```
/// use tilebin::color::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#FF0000").unwrap(), 0xFF0000);
/// assert_eq!(parse_hex_color("#0f0").unwrap(), 0x00FF00);
/// ```
pub fn parse_hex_color(s: &str) -> Result<u32, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    // Validate all characters are hex
    for c in hex.chars() {
        if !c.is_ascii_hexdigit() {
            return Err(ColorError::InvalidHex(c));
        }
    }

    let digits: Vec<u8> = hex.chars().map(parse_hex_digit).collect::<Result<_, _>>()?;
    let (r, g, b) = match digits.as_slice() {
        [r, g, b] => (r * 17, g * 17, b * 17),
        [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2),
        _ => return Err(ColorError::InvalidLength(hex.len())),
    };
    Ok(Rgb::new(r, g, b).to_u32())
}

/// Format a packed `0xRRGGBB` value as `#RRGGBB`.
pub fn format_hex_color(rgb: u32) -> String {
    Rgb::from_u32(rgb).to_hex()
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}

/// Serde adapter storing a 16-color palette as `#RRGGBB` strings.
pub(crate) mod hex_palette {
    use super::{format_hex_color, parse_hex_color};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(colors: &[u32; 16], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(colors.iter().map(|&c| format_hex_color(c)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u32; 16], D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        if strings.len() != 16 {
            return Err(D::Error::invalid_length(strings.len(), &"exactly 16 colors"));
        }
        let mut colors = [0u32; 16];
        for (slot, s) in colors.iter_mut().zip(&strings) {
            *slot = parse_hex_color(s).map_err(|e| D::Error::custom(format!("'{}': {}", s, e)))?;
        }
        Ok(colors)
    }
}

//! Palette type: sixteen 24-bit colors addressed by a 4-bit index.

use serde::{Deserialize, Serialize};

use crate::color::hex_palette;

/// Number of colors in every palette (one nibble of index space).
pub const PALETTE_SIZE: usize = 16;

/// An indexed-color palette.
///
/// The position of a palette inside [`SpriteSheet::palettes`](super::SpriteSheet)
/// is its on-disk palette index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Opaque identifier. `None` denotes the default palette.
    #[serde(default)]
    pub id: Option<String>,
    /// Colors as packed `0xRRGGBB` values, written as `#RRGGBB` in JSON.
    #[serde(with = "hex_palette")]
    pub colors: [u32; PALETTE_SIZE],
}

impl Palette {
    pub fn new(id: impl Into<String>, colors: [u32; PALETTE_SIZE]) -> Self {
        Self { id: Some(id.into()), colors }
    }

    /// The editor's built-in palette: a 16-step ramp from black to white.
    pub fn default_palette() -> Self {
        let mut colors = [0u32; PALETTE_SIZE];
        for (i, color) in colors.iter_mut().enumerate() {
            let v = (i as u32 * 17) & 0xFF;
            *color = (v << 16) | (v << 8) | v;
        }
        Self { id: None, colors }
    }

    /// Whether this is the default (id-less) palette
    pub fn is_default(&self) -> bool {
        self.id.is_none()
    }

    /// Look up a color by its 4-bit index.
    pub fn color(&self, index: u8) -> u32 {
        self.colors[(index & 0x0F) as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::default_palette()
    }
}

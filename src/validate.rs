//! Structural validation of sprite sheets before encoding
//!
//! The TBIN header stores every dimension as `value - 1` in a nibble and
//! every count in a single byte, so sheets that exceed those fields must be
//! rejected up front rather than silently truncated by the encoder.

use thiserror::Error;

use crate::models::{SpriteSheet, MAX_DIMENSION};

/// Largest number of palettes the one-byte header field can describe.
pub const MAX_PALETTES: usize = 255;

/// Highest palette position a tile header byte can select.
pub const MAX_TILE_PALETTE: usize = 15;

/// A sprite sheet that cannot be represented in TBIN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Grid or tile dimension outside 1..=16
    #[error("{field} must be between 1 and {}, got {value}", MAX_DIMENSION)]
    DimensionOutOfRange { field: &'static str, value: u8 },
    /// More palettes than the header can count
    #[error("too many palettes: {0} (maximum {})", MAX_PALETTES)]
    TooManyPalettes(usize),
    /// Palette color wider than 24 bits
    #[error("palette {palette} color {index} is not a 24-bit value: {value:#X}")]
    ColorOutOfRange { palette: usize, index: usize, value: u32 },
    /// Pixel value that does not fit a nibble
    #[error("pixel at row {row}, column {column} has index {value} (maximum 15)")]
    PixelIndexOutOfRange { row: usize, column: usize, value: u8 },
    /// Layer buffer longer than the pixel grid
    #[error("layer '{layer}' has {len} pixels but the grid holds {expected}")]
    LayerTooLarge { layer: String, len: usize, expected: usize },
    /// Color scheme entry for a tile that does not exist
    #[error("color scheme for tile {tile} is outside the {tile_count}-tile grid")]
    SchemeOutOfRange { tile: usize, tile_count: usize },
    /// Transparent index that does not fit a nibble
    #[error("color scheme for tile {tile} has transparent index {value} (maximum 15)")]
    TransparentIndexOutOfRange { tile: usize, value: u8 },
    /// Color scheme naming a palette id that is not in the sheet
    #[error("color scheme for tile {tile} references unknown palette '{palette}'")]
    UnknownPalette { tile: usize, palette: String },
    /// Color scheme naming a palette the 4-bit tile header cannot address
    #[error("color scheme for tile {tile} uses palette '{palette}' at position {position} (maximum {})", MAX_TILE_PALETTE)]
    PaletteIndexOutOfRange { tile: usize, palette: String, position: usize },
}

impl SpriteSheet {
    /// Check that the sheet can be encoded without losing information.
    ///
    /// Returns the first problem found.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilebin::models::SpriteSheet;
    /// use tilebin::validate::SheetError;
    ///
    /// let mut sheet = SpriteSheet::new(4, 4, 8, 8).unwrap();
    /// assert!(sheet.validate().is_ok());
    ///
    /// sheet.columns = 17;
    /// assert!(matches!(sheet.validate(), Err(SheetError::DimensionOutOfRange { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), SheetError> {
        self.check_dimensions()?;

        if self.palettes.len() > MAX_PALETTES {
            return Err(SheetError::TooManyPalettes(self.palettes.len()));
        }
        for (palette, p) in self.palettes.iter().enumerate() {
            if let Some(index) = p.colors.iter().position(|&c| c > 0xFF_FFFF) {
                return Err(SheetError::ColorOutOfRange { palette, index, value: p.colors[index] });
            }
        }

        // Only the first layer is persisted
        if let Some(layer) = self.layers.first() {
            let expected = self.pixel_count();
            if layer.pixels.len() > expected {
                return Err(SheetError::LayerTooLarge {
                    layer: layer.id.clone(),
                    len: layer.pixels.len(),
                    expected,
                });
            }
            let width = self.pixel_width();
            for (i, pixel) in layer.pixels.iter().enumerate() {
                if let Some(value) = *pixel {
                    if value > 0x0F {
                        return Err(SheetError::PixelIndexOutOfRange {
                            row: i / width,
                            column: i % width,
                            value,
                        });
                    }
                }
            }
        }

        let tile_count = self.tile_count();
        for (&tile, scheme) in &self.color_scheme {
            if tile >= tile_count {
                return Err(SheetError::SchemeOutOfRange { tile, tile_count });
            }
            if scheme.transparent_index > 0x0F {
                return Err(SheetError::TransparentIndexOutOfRange {
                    tile,
                    value: scheme.transparent_index,
                });
            }
            if let Some(ref id) = scheme.palette {
                match self.palette_position(Some(id)) {
                    None => return Err(SheetError::UnknownPalette { tile, palette: id.clone() }),
                    Some(position) if position > MAX_TILE_PALETTE => {
                        return Err(SheetError::PaletteIndexOutOfRange {
                            tile,
                            palette: id.clone(),
                            position,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}

//! Sprite sheet, pixel layer and per-tile color scheme types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::palette::Palette;
use crate::validate::SheetError;

/// Largest grid extent (in tiles) and tile extent (in pixels) per axis.
pub const MAX_DIMENSION: u8 = 16;
/// Palette used by tiles without a color-scheme override.
pub const DEFAULT_PALETTE_INDEX: u8 = 0;
/// Transparent index used by tiles without a color-scheme override.
pub const DEFAULT_TRANSPARENT_INDEX: u8 = 2;

/// A flat buffer of palette indices covering the whole pixel grid.
///
/// Pixels are stored row-major: the pixel at `(row, column)` lives at
/// `row * sheet.pixel_width() + column`. `None` means "transparent" and
/// resolves to the owning tile's transparent index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub pixels: Vec<Option<u8>>,
}

impl Layer {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), pixels: Vec::new() }
    }

    /// A layer of `len` untouched pixels.
    pub fn blank(id: impl Into<String>, len: usize) -> Self {
        Self { id: id.into(), pixels: vec![None; len] }
    }

    /// Pixel at a flat index; out-of-range reads are `None`.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.pixels.get(index).copied().flatten()
    }
}

/// Per-tile override of palette selection and transparent index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileColorScheme {
    /// Id of the palette this tile draws from. `None` selects palette 0.
    #[serde(default)]
    pub palette: Option<String>,
    /// Palette index treated as transparent for this tile
    #[serde(default = "default_transparent_index")]
    pub transparent_index: u8,
}

fn default_transparent_index() -> u8 {
    DEFAULT_TRANSPARENT_INDEX
}

impl Default for TileColorScheme {
    fn default() -> Self {
        Self { palette: None, transparent_index: DEFAULT_TRANSPARENT_INDEX }
    }
}

/// A tile's color scheme with the palette id resolved to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedScheme {
    pub palette_index: u8,
    pub transparent_index: u8,
}

impl ResolvedScheme {
    /// Palette 0, transparent index 2
    pub const DEFAULT: Self = Self {
        palette_index: DEFAULT_PALETTE_INDEX,
        transparent_index: DEFAULT_TRANSPARENT_INDEX,
    };

    /// The tile header byte: `(palette_index << 4) | transparent_index`.
    pub fn header_byte(self) -> u8 {
        ((self.palette_index & 0x0F) << 4) | (self.transparent_index & 0x0F)
    }

    pub fn from_header_byte(byte: u8) -> Self {
        Self { palette_index: byte >> 4, transparent_index: byte & 0x0F }
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

/// The authoring-time representation of a sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Grid width in tiles (1-16)
    pub columns: u8,
    /// Grid height in tiles (1-16)
    pub rows: u8,
    /// Tile width in pixels (1-16)
    pub tile_width: u8,
    /// Tile height in pixels (1-16)
    pub tile_height: u8,
    /// Palettes in on-disk index order
    pub palettes: Vec<Palette>,
    /// Pixel layers. Only the first one is persisted.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Per-tile overrides keyed by tile index (`y * columns + x`)
    #[serde(default)]
    pub color_scheme: BTreeMap<usize, TileColorScheme>,
}

impl SpriteSheet {
    /// Create an empty sheet with the default palette and one blank layer.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::DimensionOutOfRange`] if any dimension is outside `1..=16`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilebin::models::SpriteSheet;
    ///
    /// let sheet = SpriteSheet::new(8, 16, 8, 8).unwrap();
    /// assert_eq!(sheet.tile_count(), 128);
    /// assert!(SpriteSheet::new(17, 1, 8, 8).is_err());
    /// ```
    pub fn new(columns: u8, rows: u8, tile_width: u8, tile_height: u8) -> Result<Self, SheetError> {
        let mut sheet = Self {
            columns,
            rows,
            tile_width,
            tile_height,
            palettes: vec![Palette::default_palette()],
            layers: Vec::new(),
            color_scheme: BTreeMap::new(),
        };
        sheet.check_dimensions()?;
        sheet.layers.push(Layer::blank("layer-0", sheet.pixel_count()));
        Ok(sheet)
    }

    /// Width of the whole pixel grid
    pub fn pixel_width(&self) -> usize {
        self.columns as usize * self.tile_width as usize
    }

    /// Height of the whole pixel grid
    pub fn pixel_height(&self) -> usize {
        self.rows as usize * self.tile_height as usize
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_width() * self.pixel_height()
    }

    /// Number of tiles in the grid
    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Pixels per tile
    pub fn tile_pixel_count(&self) -> usize {
        self.tile_width as usize * self.tile_height as usize
    }

    /// Tile index of grid position `(x, y)`
    pub fn tile_index(&self, x: usize, y: usize) -> usize {
        y * self.columns as usize + x
    }

    /// Flat layer index of pixel `(row, column)`
    pub fn pixel_index(&self, row: usize, column: usize) -> usize {
        row * self.pixel_width() + column
    }

    /// The pixel at `(row, column)` in the first layer.
    pub fn pixel(&self, row: usize, column: usize) -> Option<u8> {
        if row >= self.pixel_height() || column >= self.pixel_width() {
            return None;
        }
        self.layers.first().and_then(|layer| layer.get(self.pixel_index(row, column)))
    }

    /// Set the pixel at `(row, column)` in the first layer, growing the buffer if needed.
    ///
    /// Writes outside the grid are ignored.
    pub fn set_pixel(&mut self, row: usize, column: usize, value: Option<u8>) {
        if row >= self.pixel_height() || column >= self.pixel_width() {
            return;
        }
        let index = self.pixel_index(row, column);
        let len = self.pixel_count();
        if self.layers.is_empty() {
            self.layers.push(Layer::new("layer-0"));
        }
        let layer = &mut self.layers[0];
        if layer.pixels.len() < len {
            layer.pixels.resize(len, None);
        }
        layer.pixels[index] = value;
    }

    /// Position of the palette with the given id. `None` resolves to palette 0.
    pub fn palette_position(&self, id: Option<&str>) -> Option<usize> {
        match id {
            None => Some(DEFAULT_PALETTE_INDEX as usize),
            Some(id) => self.palettes.iter().position(|p| p.id.as_deref() == Some(id)),
        }
    }

    /// Resolve the palette index and transparent index a tile uses.
    ///
    /// Tiles without an override use palette 0 and transparent index 2. An
    /// override naming an unknown palette, or one past position 15, falls
    /// back to palette 0.
    pub fn tile_scheme(&self, tile_index: usize) -> ResolvedScheme {
        let Some(scheme) = self.color_scheme.get(&tile_index) else {
            return ResolvedScheme::DEFAULT;
        };
        let palette_index = match self.palette_position(scheme.palette.as_deref()) {
            Some(position) if position <= 0x0F => position as u8,
            Some(position) => {
                log::warn!(
                    "tile {}: palette {:?} is at position {}, beyond what a tile can select; using palette {}",
                    tile_index,
                    scheme.palette,
                    position,
                    DEFAULT_PALETTE_INDEX
                );
                DEFAULT_PALETTE_INDEX
            }
            None => {
                log::warn!(
                    "tile {}: unknown palette {:?}, using palette {}",
                    tile_index,
                    scheme.palette,
                    DEFAULT_PALETTE_INDEX
                );
                DEFAULT_PALETTE_INDEX
            }
        };
        ResolvedScheme { palette_index, transparent_index: scheme.transparent_index & 0x0F }
    }

    /// Tile index containing pixel `(row, column)`
    pub fn tile_at_pixel(&self, row: usize, column: usize) -> usize {
        self.tile_index(column / self.tile_width.max(1) as usize, row / self.tile_height.max(1) as usize)
    }

    /// Palette index drawn at `(row, column)`, with missing pixels resolved
    /// to the tile's transparent index.
    pub fn resolved_index(&self, row: usize, column: usize) -> u8 {
        let scheme = self.tile_scheme(self.tile_at_pixel(row, column));
        self.pixel(row, column).map(|v| v & 0x0F).unwrap_or(scheme.transparent_index)
    }

    /// Whether `(row, column)` shows its tile's transparent index.
    pub fn is_transparent(&self, row: usize, column: usize) -> bool {
        let scheme = self.tile_scheme(self.tile_at_pixel(row, column));
        self.resolved_index(row, column) == scheme.transparent_index
    }

    /// Look up the 24-bit color drawn at `(row, column)`.
    ///
    /// Returns `None` outside the grid or when the tile's palette does not exist.
    pub fn pixel_rgb(&self, row: usize, column: usize) -> Option<u32> {
        if row >= self.pixel_height() || column >= self.pixel_width() {
            return None;
        }
        let scheme = self.tile_scheme(self.tile_at_pixel(row, column));
        let palette = self.palettes.get(scheme.palette_index as usize)?;
        Some(palette.color(self.resolved_index(row, column)))
    }

    pub(crate) fn check_dimensions(&self) -> Result<(), SheetError> {
        let fields = [
            ("columns", self.columns),
            ("rows", self.rows),
            ("tile_width", self.tile_width),
            ("tile_height", self.tile_height),
        ];
        for (field, value) in fields {
            if value < 1 || value > MAX_DIMENSION {
                return Err(SheetError::DimensionOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

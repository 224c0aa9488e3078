//! Tile packing with transparent-tile elision
//!
//! Walks the grid row-major (`y` outer, `x` inner) and renders every tile to
//! a fixed-size buffer: one header byte `(palette << 4) | transparent`
//! followed by pixel pairs packed high nibble first. Tiles where every pixel
//! equals the tile's transparent index are dropped. Each dropped tile shifts
//! the storage position of every later tile down by one, and a remap entry
//! records `(original, layout)` for each stored tile whose position moved.

use crate::models::{ResolvedScheme, SpriteSheet};

use super::header::tile_byte_len;

/// A stored tile whose layout position differs from its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapEntry {
    /// Tile index in the grid (`y * columns + x`)
    pub original: usize,
    /// Position in the tile table
    pub layout: usize,
}

impl RemapEntry {
    /// Wire form: `[original, layout]`, one byte each.
    pub fn to_bytes(self) -> [u8; 2] {
        [self.original as u8, self.layout as u8]
    }

    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self { original: bytes[0] as usize, layout: bytes[1] as usize }
    }
}

/// The non-empty tiles of a sheet in layout order, plus the remap table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedTiles {
    pub tiles: Vec<Vec<u8>>,
    pub remap: Vec<RemapEntry>,
    /// Number of tiles dropped as fully transparent
    pub elided: usize,
}

/// Pack the first layer of `sheet` into tile buffers.
///
/// # Examples
///
/// ```
/// use tilebin::models::SpriteSheet;
/// use tilebin::tbin::pack_tiles;
///
/// let mut sheet = SpriteSheet::new(3, 1, 2, 2).unwrap();
/// sheet.set_pixel(0, 0, Some(1)); // tile 0
/// sheet.set_pixel(0, 4, Some(1)); // tile 2
///
/// let packed = pack_tiles(&sheet);
/// assert_eq!(packed.tiles.len(), 2);
/// assert_eq!(packed.remap.len(), 1);
/// assert_eq!((packed.remap[0].original, packed.remap[0].layout), (2, 1));
/// ```
pub fn pack_tiles(sheet: &SpriteSheet) -> PackedTiles {
    let mut packed = PackedTiles::default();
    let mut tile_shift = 0usize;

    for y in 0..sheet.rows as usize {
        for x in 0..sheet.columns as usize {
            let tile_index = sheet.tile_index(x, y);
            let scheme = sheet.tile_scheme(tile_index);
            let (buffer, empty) = pack_tile(sheet, x, y, scheme);

            if empty {
                tile_shift += 1;
                log::trace!("tile {} ({}, {}) is empty, eliding", tile_index, x, y);
                continue;
            }

            let layout = tile_index - tile_shift;
            if layout != tile_index {
                packed.remap.push(RemapEntry { original: tile_index, layout });
            }
            packed.tiles.push(buffer);
        }
    }

    packed.elided = tile_shift;
    log::debug!(
        "packed {} tiles ({} elided, {} remap entries)",
        packed.tiles.len(),
        packed.elided,
        packed.remap.len()
    );
    packed
}

/// Render one tile. Returns the buffer and whether every pixel is transparent.
fn pack_tile(sheet: &SpriteSheet, x: usize, y: usize, scheme: ResolvedScheme) -> (Vec<u8>, bool) {
    let tile_width = sheet.tile_width as usize;
    let pixel_count = sheet.tile_pixel_count();
    let transparent = scheme.transparent_index;

    let mut buffer = vec![(transparent << 4) | transparent; tile_byte_len(sheet.tile_width, sheet.tile_height)];
    buffer[0] = scheme.header_byte();

    let layer = sheet.layers.first();
    let sheet_width = sheet.pixel_width();
    let origin_row = y * sheet.tile_height as usize;
    let origin_col = x * tile_width;

    // Pixel j of the tile, missing pixels and the odd-count pad read as transparent
    let read = |j: usize| -> u8 {
        if j >= pixel_count {
            return transparent;
        }
        let row = origin_row + j / tile_width;
        let col = origin_col + j % tile_width;
        layer.and_then(|l| l.get(row * sheet_width + col)).map(|v| v & 0x0F).unwrap_or(transparent)
    };

    let mut empty = true;
    for (k, byte) in buffer[1..].iter_mut().enumerate() {
        let high = read(2 * k);
        let low = read(2 * k + 1);
        if high != transparent || low != transparent {
            empty = false;
        }
        *byte = (high << 4) | low;
    }

    (buffer, empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Palette, TileColorScheme};

    #[test]
    fn test_empty_sheet_packs_nothing() {
        let sheet = SpriteSheet::new(4, 4, 4, 4).unwrap();
        let packed = pack_tiles(&sheet);
        assert!(packed.tiles.is_empty());
        assert!(packed.remap.is_empty());
        assert_eq!(packed.elided, 16);
    }

    #[test]
    fn test_sheet_without_layers_packs_nothing() {
        let mut sheet = SpriteSheet::new(2, 2, 2, 2).unwrap();
        sheet.layers.clear();
        assert!(pack_tiles(&sheet).tiles.is_empty());
    }

    #[test]
    fn test_tile_bytes() {
        let mut sheet = SpriteSheet::new(1, 1, 2, 2).unwrap();
        sheet.set_pixel(0, 0, Some(0xA));
        sheet.set_pixel(1, 1, Some(0x5));
        let packed = pack_tiles(&sheet);
        assert_eq!(packed.tiles, vec![vec![0x02, 0xA2, 0x25]]);
    }

    #[test]
    fn test_only_later_tiles_need_remap() {
        // Tiles 0 and 2 painted, tile 1 empty
        let mut sheet = SpriteSheet::new(3, 1, 2, 2).unwrap();
        sheet.set_pixel(0, 0, Some(1));
        sheet.set_pixel(1, 5, Some(1));
        let packed = pack_tiles(&sheet);
        assert_eq!(packed.tiles.len(), 2);
        assert_eq!(packed.remap, vec![RemapEntry { original: 2, layout: 1 }]);
        assert_eq!(packed.elided, 1);
    }

    #[test]
    fn test_every_tile_after_a_gap_is_remapped() {
        let mut sheet = SpriteSheet::new(4, 1, 1, 2).unwrap();
        sheet.set_pixel(0, 1, Some(0));
        sheet.set_pixel(0, 2, Some(0));
        sheet.set_pixel(0, 3, Some(0));
        let packed = pack_tiles(&sheet);
        assert_eq!(
            packed.remap,
            vec![
                RemapEntry { original: 1, layout: 0 },
                RemapEntry { original: 2, layout: 1 },
                RemapEntry { original: 3, layout: 2 },
            ]
        );
    }

    #[test]
    fn test_transparent_override_controls_elision() {
        let mut sheet = SpriteSheet::new(2, 1, 2, 1).unwrap();
        sheet.palettes.push(Palette::new("alt", [0; 16]));
        // Tile 0 is filled with index 0, which is only transparent for tile 1
        sheet.set_pixel(0, 0, Some(0));
        sheet.set_pixel(0, 1, Some(0));
        sheet.set_pixel(0, 2, Some(0));
        sheet.set_pixel(0, 3, Some(0));
        sheet.color_scheme.insert(1, TileColorScheme { palette: Some("alt".into()), transparent_index: 0 });

        let packed = pack_tiles(&sheet);
        assert_eq!(packed.tiles, vec![vec![0x02, 0x00]]);
        assert_eq!(packed.elided, 1);
    }

    #[test]
    fn test_header_byte_carries_scheme() {
        let mut sheet = SpriteSheet::new(1, 1, 2, 1).unwrap();
        sheet.palettes.push(Palette::new("alt", [0; 16]));
        sheet.color_scheme.insert(0, TileColorScheme { palette: Some("alt".into()), transparent_index: 7 });
        sheet.set_pixel(0, 0, Some(3));
        let packed = pack_tiles(&sheet);
        assert_eq!(packed.tiles, vec![vec![0x17, 0x37]]);
    }

    #[test]
    fn test_odd_pixel_count_pads_with_transparent() {
        let mut sheet = SpriteSheet::new(1, 1, 3, 1).unwrap();
        sheet.set_pixel(0, 0, Some(1));
        sheet.set_pixel(0, 1, Some(4));
        sheet.set_pixel(0, 2, Some(9));
        let packed = pack_tiles(&sheet);
        assert_eq!(packed.tiles, vec![vec![0x02, 0x14, 0x92]]);
    }

    #[test]
    fn test_remap_entry_bytes() {
        let entry = RemapEntry { original: 255, layout: 17 };
        assert_eq!(entry.to_bytes(), [255, 17]);
        assert_eq!(RemapEntry::from_bytes([255, 17]), entry);
    }
}

//! TBIN encoder

use crate::color::int_rgb_to_rgb565;
use crate::models::SpriteSheet;
use crate::validate::SheetError;

use super::header::{Header, PALETTE_ENTRY_LEN, REMAP_ENTRY_LEN};
use super::packer::pack_tiles;

/// Encode a sprite sheet to TBIN bytes.
///
/// Never fails. Values that do not fit their fields are masked rather than
/// rejected, so callers holding untrusted sheets should use [`try_encode`].
///
/// # Examples
///
/// ```
/// use tilebin::models::SpriteSheet;
/// use tilebin::tbin::encode;
///
/// let sheet = SpriteSheet::new(2, 2, 8, 8).unwrap();
/// let bytes = encode(&sheet);
/// // Header plus one palette, no tiles
/// assert_eq!(bytes.len(), 10 + 32);
/// assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xF0, 0x0D]);
/// ```
pub fn encode(sheet: &SpriteSheet) -> Vec<u8> {
    let packed = pack_tiles(sheet);

    let header = Header {
        columns: sheet.columns,
        rows: sheet.rows,
        tile_width: sheet.tile_width,
        tile_height: sheet.tile_height,
        palette_count: sheet.palettes.len() as u8,
        remap_count: packed.remap.len() as u8,
        tile_count: packed.tiles.len() as u8,
    };
    let total = header.encoded_len(packed.tiles.len());
    log::debug!(
        "encoding {}x{} grid of {}x{} tiles: {} palettes, {} remap entries, {} tiles, {} bytes",
        sheet.columns,
        sheet.rows,
        sheet.tile_width,
        sheet.tile_height,
        header.palette_count,
        header.remap_count,
        packed.tiles.len(),
        total
    );

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&header.to_bytes());

    for palette in sheet.palettes.iter().take(header.palette_count as usize) {
        let start = out.len();
        for &color in &palette.colors {
            out.extend_from_slice(&int_rgb_to_rgb565(color).to_be_bytes());
        }
        debug_assert_eq!(out.len() - start, PALETTE_ENTRY_LEN);
    }

    for entry in packed.remap.iter().take(header.remap_count as usize) {
        out.extend_from_slice(&entry.to_bytes());
    }
    debug_assert_eq!(out.len(), header.tiles_offset());
    debug_assert_eq!(packed.remap.len() * REMAP_ENTRY_LEN, header.tiles_offset() - header.remap_offset());

    for tile in &packed.tiles {
        out.extend_from_slice(tile);
    }

    debug_assert_eq!(out.len(), total);
    out
}

/// Validate a sprite sheet, then encode it.
///
/// # Errors
///
/// Returns the first [`SheetError`] found by [`SpriteSheet::validate`].
pub fn try_encode(sheet: &SpriteSheet) -> Result<Vec<u8>, SheetError> {
    sheet.validate()?;
    Ok(encode(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Palette;

    #[test]
    fn test_minimal_file() {
        let sheet = SpriteSheet::new(1, 1, 2, 2).unwrap();
        let bytes = encode(&sheet);
        assert_eq!(&bytes[..10], &[0xCA, 0xFE, 0xF0, 0x0D, 0, 0x00, 0x11, 1, 0, 0]);
        assert_eq!(bytes.len(), 42);
    }

    #[test]
    fn test_palette_written_big_endian() {
        let mut sheet = SpriteSheet::new(1, 1, 2, 2).unwrap();
        let mut colors = [0u32; 16];
        colors[0] = 0xFF0000;
        colors[1] = 0x0000FF;
        sheet.palettes = vec![Palette::new("p", colors)];
        let bytes = encode(&sheet);
        assert_eq!(&bytes[10..14], &[0xF8, 0x00, 0x00, 0x1F]);
    }

    #[test]
    fn test_zero_palettes_still_encodes() {
        let mut sheet = SpriteSheet::new(1, 1, 2, 2).unwrap();
        sheet.palettes.clear();
        sheet.set_pixel(0, 0, Some(1));
        let bytes = encode(&sheet);
        assert_eq!(bytes[7], 0);
        assert_eq!(bytes.len(), 10 + 3);
    }

    #[test]
    fn test_layout_order() {
        let mut sheet = SpriteSheet::new(3, 1, 2, 1).unwrap();
        sheet.set_pixel(0, 0, Some(1));
        sheet.set_pixel(0, 4, Some(9));
        let bytes = encode(&sheet);
        // header, 1 palette, 1 remap entry, 2 tiles of 2 bytes
        assert_eq!(bytes.len(), 10 + 32 + 2 + 4);
        assert_eq!(&bytes[8..10], &[1, 2]);
        assert_eq!(&bytes[42..44], &[2, 1]);
        assert_eq!(&bytes[44..], &[0x02, 0x12, 0x02, 0x92]);
    }

    #[test]
    fn test_try_encode_rejects_invalid() {
        let mut sheet = SpriteSheet::new(1, 1, 2, 2).unwrap();
        sheet.rows = 17;
        assert!(matches!(try_encode(&sheet), Err(SheetError::DimensionOutOfRange { field: "rows", .. })));
    }
}

//! TBIN decoder

use std::collections::{BTreeMap, HashMap};

use crate::color::int_rgb565_to_rgb;
use crate::ids::IdSource;
use crate::models::{
    Layer, Palette, ResolvedScheme, SpriteSheet, TileColorScheme, DEFAULT_TRANSPARENT_INDEX,
    PALETTE_SIZE,
};

use super::error::DecodeError;
use super::header::{Header, LAYER_COUNT, PALETTE_ENTRY_LEN, REMAP_ENTRY_LEN};
use super::packer::RemapEntry;

/// Id given to the single decoded layer
pub const DECODED_LAYER_ID: &str = "layer-0";

/// Decode TBIN bytes into a sprite sheet.
///
/// Every decoded palette gets a fresh id from `ids`. Tiles that were elided
/// come back filled with the default transparent index. A stored tile whose
/// header byte differs from palette 0 / transparent index 2 gets a
/// color-scheme entry pointing at the decoded palette.
///
/// # Errors
///
/// Fails without a partial result on a bad signature, an unknown version, a
/// buffer shorter than its header declares, or tile positions outside the grid.
///
/// # Examples
///
/// ```
/// use tilebin::ids::SequentialIds;
/// use tilebin::models::SpriteSheet;
/// use tilebin::tbin::{decode, encode};
///
/// let mut sheet = SpriteSheet::new(2, 1, 2, 2).unwrap();
/// sheet.set_pixel(0, 3, Some(9));
///
/// let decoded = decode(&encode(&sheet), &mut SequentialIds::default()).unwrap();
/// assert_eq!(decoded.pixel(0, 3), Some(9));
/// assert_eq!(decoded.palettes[0].id.as_deref(), Some("palette-0"));
/// ```
pub fn decode<I: IdSource + ?Sized>(bytes: &[u8], ids: &mut I) -> Result<SpriteSheet, DecodeError> {
    let header = Header::parse(bytes)?;
    let stored_tiles = header.stored_tiles(bytes.len());
    let tile_len = header.tile_byte_len();

    let palette_region = region(bytes, "palette table", header.palettes_offset(), header.remap_offset())?;
    let remap_region = region(bytes, "remap table", header.remap_offset(), header.tiles_offset())?;
    let end = header.encoded_len(stored_tiles);
    let tile_region = region(bytes, "tile table", header.tiles_offset(), end)?;
    if bytes.len() > end {
        log::debug!("ignoring {} trailing bytes", bytes.len() - end);
    }
    log::debug!(
        "decoding {}x{} grid of {}x{} tiles: {} palettes, {} remap entries, {} stored tiles",
        header.columns,
        header.rows,
        header.tile_width,
        header.tile_height,
        header.palette_count,
        header.remap_count,
        stored_tiles
    );

    let palettes: Vec<Palette> = palette_region
        .chunks_exact(PALETTE_ENTRY_LEN)
        .map(|chunk| {
            let mut colors = [0u32; PALETTE_SIZE];
            for (color, pair) in colors.iter_mut().zip(chunk.chunks_exact(2)) {
                *color = int_rgb565_to_rgb(u16::from_be_bytes([pair[0], pair[1]]));
            }
            Palette { id: Some(ids.next_id()), colors }
        })
        .collect();

    let grid_tiles = header.grid_tiles();
    let mut layout_to_original = HashMap::with_capacity(header.remap_count as usize);
    for (entry, pair) in remap_region.chunks_exact(REMAP_ENTRY_LEN).enumerate() {
        let remap = RemapEntry::from_bytes([pair[0], pair[1]]);
        if remap.original >= grid_tiles || remap.layout >= stored_tiles {
            return Err(DecodeError::InvalidRemap { entry, original: remap.original, layout: remap.layout });
        }
        layout_to_original.insert(remap.layout, remap.original);
    }

    let mut sheet = SpriteSheet {
        columns: header.columns,
        rows: header.rows,
        tile_width: header.tile_width,
        tile_height: header.tile_height,
        palettes,
        layers: Vec::with_capacity(LAYER_COUNT),
        color_scheme: BTreeMap::new(),
    };

    let sheet_width = sheet.pixel_width();
    let tile_width = header.tile_width as usize;
    let pixel_count = sheet.tile_pixel_count();
    let mut pixels = vec![Some(DEFAULT_TRANSPARENT_INDEX); sheet.pixel_count()];

    for (slot, tile) in tile_region.chunks_exact(tile_len).enumerate() {
        let index = layout_to_original.get(&slot).copied().unwrap_or(slot);
        if index >= grid_tiles {
            return Err(DecodeError::TileOutOfRange { slot, tile: index, tile_count: grid_tiles });
        }
        let row = index / header.columns as usize;
        let column = index % header.columns as usize;
        let origin_row = row * header.tile_height as usize;
        let origin_col = column * tile_width;
        log::trace!("stored tile {} -> tile {} ({}, {})", slot, index, column, row);

        let scheme = ResolvedScheme::from_header_byte(tile[0]);
        if !scheme.is_default() {
            sheet.color_scheme.insert(
                index,
                TileColorScheme {
                    palette: sheet.palettes.get(scheme.palette_index as usize).and_then(|p| p.id.clone()),
                    transparent_index: scheme.transparent_index,
                },
            );
        }

        for (k, &byte) in tile[1..].iter().enumerate() {
            for (j, value) in [(2 * k, byte >> 4), (2 * k + 1, byte & 0x0F)] {
                // The pad nibble of an odd-sized tile has no pixel
                if j >= pixel_count {
                    continue;
                }
                let y = origin_row + j / tile_width;
                let x = origin_col + j % tile_width;
                pixels[y * sheet_width + x] = Some(value);
            }
        }
    }

    sheet.layers.push(Layer { id: DECODED_LAYER_ID.to_string(), pixels });
    debug_assert_eq!(sheet.layers.len(), LAYER_COUNT);
    Ok(sheet)
}

/// Borrow `bytes[start..end]`, failing if the buffer is too short.
fn region<'a>(bytes: &'a [u8], section: &'static str, start: usize, end: usize) -> Result<&'a [u8], DecodeError> {
    bytes.get(start..end).ok_or(DecodeError::Truncated { section, needed: end, available: bytes.len() })
}

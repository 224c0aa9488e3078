//! The fixed 10-byte TBIN header
//!
//! ```plain
//! offset  size  field
//!      0     4  magic CA FE F0 0D
//!      4     1  version (0)
//!      5     1  (columns - 1) << 4 | (rows - 1)
//!      6     1  (tile_width - 1) << 4 | (tile_height - 1)
//!      7     1  palette count
//!      8     1  remap entry count
//!      9     1  stored tile count
//! ```

use super::error::DecodeError;

/// File signature
pub const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xF0, 0x0D];
/// The only format version this crate reads and writes
pub const VERSION: u8 = 0;
/// Size of the header in bytes
pub const HEADER_LEN: usize = 10;
/// Bytes per palette: 16 big-endian RGB565 colors
pub const PALETTE_ENTRY_LEN: usize = 32;
/// Bytes per remap entry: original tile index, layout index
pub const REMAP_ENTRY_LEN: usize = 2;
/// Pixel layers stored per file. Version 0 has no layer-count field.
pub const LAYER_COUNT: usize = 1;

/// Bytes one tile occupies in the tile table: a header byte plus two pixels per byte.
pub fn tile_byte_len(tile_width: u8, tile_height: u8) -> usize {
    1 + (tile_width as usize * tile_height as usize).div_ceil(2)
}

/// Decoded header fields, with dimensions already expanded to `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub columns: u8,
    pub rows: u8,
    pub tile_width: u8,
    pub tile_height: u8,
    pub palette_count: u8,
    pub remap_count: u8,
    /// Raw stored tile count. A full 256-tile grid is written as 0, see
    /// [`Header::stored_tiles`].
    pub tile_count: u8,
}

impl Header {
    /// Read and check the header at the start of `bytes`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidMagic`] if the signature is missing or wrong
    /// - [`DecodeError::UnsupportedVersion`] if the version byte is not 0
    /// - [`DecodeError::Truncated`] if the buffer ends inside the header
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            return Err(DecodeError::InvalidMagic);
        }
        if bytes.len() <= 4 {
            return Err(DecodeError::Truncated {
                section: "header",
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }
        if bytes[4] != VERSION {
            return Err(DecodeError::UnsupportedVersion(bytes[4]));
        }
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::Truncated {
                section: "header",
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }

        Ok(Self {
            columns: (bytes[5] >> 4) + 1,
            rows: (bytes[5] & 0x0F) + 1,
            tile_width: (bytes[6] >> 4) + 1,
            tile_height: (bytes[6] & 0x0F) + 1,
            palette_count: bytes[7],
            remap_count: bytes[8],
            tile_count: bytes[9],
        })
    }

    /// Serialize the header. Dimensions are stored as `value - 1` in 4 bits.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let nibbles = |high: u8, low: u8| ((high.wrapping_sub(1) & 0x0F) << 4) | (low.wrapping_sub(1) & 0x0F);
        [
            MAGIC[0],
            MAGIC[1],
            MAGIC[2],
            MAGIC[3],
            VERSION,
            nibbles(self.columns, self.rows),
            nibbles(self.tile_width, self.tile_height),
            self.palette_count,
            self.remap_count,
            self.tile_count,
        ]
    }

    /// Tiles in the grid
    pub fn grid_tiles(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Bytes per stored tile
    pub fn tile_byte_len(&self) -> usize {
        tile_byte_len(self.tile_width, self.tile_height)
    }

    /// Offset of the palette table
    pub fn palettes_offset(&self) -> usize {
        HEADER_LEN
    }

    /// Offset of the remap table
    pub fn remap_offset(&self) -> usize {
        self.palettes_offset() + self.palette_count as usize * PALETTE_ENTRY_LEN
    }

    /// Offset of the tile table
    pub fn tiles_offset(&self) -> usize {
        self.remap_offset() + self.remap_count as usize * REMAP_ENTRY_LEN
    }

    /// Number of stored tiles in a buffer of `total_len` bytes.
    ///
    /// The count byte cannot hold 256, so a full 16x16 grid with no elided
    /// tile is written as 0. An empty sheet has no tile bytes at all, which
    /// tells the two apart. Bytes past the 256 tiles are trailing data.
    pub fn stored_tiles(&self, total_len: usize) -> usize {
        let full = self.grid_tiles();
        if self.tile_count == 0
            && full == 256
            && total_len.saturating_sub(self.tiles_offset()) >= full * self.tile_byte_len()
        {
            full
        } else {
            self.tile_count as usize
        }
    }

    /// Total file size implied by the header
    pub fn encoded_len(&self, stored_tiles: usize) -> usize {
        self.tiles_offset() + stored_tiles * self.tile_byte_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Header {
        Header {
            columns: 8,
            rows: 16,
            tile_width: 8,
            tile_height: 8,
            palette_count: 2,
            remap_count: 3,
            tile_count: 5,
        }
    }

    #[test]
    fn test_header_bytes() {
        let bytes = header().to_bytes();
        assert_eq!(bytes, [0xCA, 0xFE, 0xF0, 0x0D, 0x00, 0x7F, 0x77, 2, 3, 5]);
        assert_eq!(Header::parse(&bytes), Ok(header()));
    }

    #[test]
    fn test_offsets() {
        let h = header();
        assert_eq!(h.palettes_offset(), 10);
        assert_eq!(h.remap_offset(), 74);
        assert_eq!(h.tiles_offset(), 80);
        assert_eq!(h.tile_byte_len(), 33);
        assert_eq!(h.encoded_len(5), 80 + 5 * 33);
    }

    #[test]
    fn test_tile_byte_len_rounds_up() {
        assert_eq!(tile_byte_len(1, 1), 2);
        assert_eq!(tile_byte_len(3, 3), 6);
        assert_eq!(tile_byte_len(16, 16), 129);
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        assert_eq!(Header::parse(&[]), Err(DecodeError::InvalidMagic));
        assert_eq!(Header::parse(&[0xCA, 0xFE]), Err(DecodeError::InvalidMagic));
        assert_eq!(
            Header::parse(&[0xCA, 0xFE, 0xF0, 0x0E, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::InvalidMagic)
        );
    }

    #[test]
    fn test_parse_rejects_version() {
        assert_eq!(
            Header::parse(&[0xCA, 0xFE, 0xF0, 0x0D, 1, 0, 0, 0, 0, 0]),
            Err(DecodeError::UnsupportedVersion(1))
        );
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(
            Header::parse(&[0xCA, 0xFE, 0xF0, 0x0D, 0, 0]),
            Err(DecodeError::Truncated { section: "header", needed: 10, available: 6 })
        ));
    }

    #[test]
    fn test_stored_tiles_full_grid() {
        let h = Header {
            columns: 16,
            rows: 16,
            tile_width: 2,
            tile_height: 1,
            palette_count: 0,
            remap_count: 0,
            tile_count: 0,
        };
        assert_eq!(h.stored_tiles(HEADER_LEN), 0);
        assert_eq!(h.stored_tiles(HEADER_LEN + 256 * 2), 256);
        assert_eq!(h.stored_tiles(HEADER_LEN + 256 * 2 + 1), 256);
        // too short for a full grid: an empty sheet followed by junk
        assert_eq!(h.stored_tiles(HEADER_LEN + 256 * 2 - 1), 0);
    }
}

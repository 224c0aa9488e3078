//! Error types for TBIN decoding

use thiserror::Error;

/// Why a byte buffer could not be decoded as TBIN.
///
/// Every variant is fatal: decoding never returns a partial sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The first four bytes are not `CA FE F0 0D`
    #[error("invalid magic signature, expected CA FE F0 0D")]
    InvalidMagic,
    /// The version byte is not 0
    #[error("unsupported format version {0}, expected 0")]
    UnsupportedVersion(u8),
    /// The buffer ends before a region the header declares
    #[error("truncated {section}: need {needed} bytes, buffer has {available}")]
    Truncated { section: &'static str, needed: usize, available: usize },
    /// A remap entry points outside the grid or the stored tiles
    #[error("remap entry {entry} maps layout slot {layout} to tile {original}, outside the file")]
    InvalidRemap { entry: usize, original: usize, layout: usize },
    /// A stored tile resolves to a position outside the grid
    #[error("stored tile {slot} resolves to tile {tile} but the grid has {tile_count} tiles")]
    TileOutOfRange { slot: usize, tile: usize, tile_count: usize },
}

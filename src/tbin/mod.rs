//! TBIN binary sprite-sheet format
//!
//! A TBIN file is laid out as, all integers big-endian:
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 10 | [`Header`] |
//! | 10 | 32 x palettes | 16 RGB565 colors per palette |
//! | ... | 2 x remaps | `[original tile, layout index]` per [`RemapEntry`] |
//! | ... | tile bytes x tiles | header byte `(palette << 4) \| transparent`, then packed 4-bit pixel pairs |
//!
//! Fully transparent tiles are not stored. Encoding and decoding are pure
//! functions; nothing is cached between calls.

mod decode;
mod encode;
mod error;
mod header;
mod packer;

pub use decode::{decode, DECODED_LAYER_ID};
pub use encode::{encode, try_encode};
pub use error::DecodeError;
pub use header::{
    tile_byte_len, Header, HEADER_LEN, LAYER_COUNT, MAGIC, PALETTE_ENTRY_LEN, REMAP_ENTRY_LEN,
    VERSION,
};
pub use packer::{pack_tiles, PackedTiles, RemapEntry};

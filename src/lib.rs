//! tilebin - Library for the TBIN indexed-color sprite sheet format
//!
//! This library provides functionality to:
//! - Quantize 24-bit colors to RGB565 and back
//! - Validate sprite sheets (grid of up to 16x16 tiles, 16-color palettes)
//! - Pack tiles with transparent-tile elision and a remap table
//! - Encode sheets to TBIN bytes and decode them back
//! - Render decoded sheets to PNG

pub mod cli;
pub mod color;
pub mod config;
pub mod ids;
pub mod models;
pub mod output;
pub mod tbin;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

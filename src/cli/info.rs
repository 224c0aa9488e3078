//! Info command implementations (header inspection, color quantization)

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::color::{format_hex_color, int_rgb565_to_rgb, int_rgb_to_rgb565, parse_hex_color, Rgb};
use crate::tbin::Header;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Summary of a TBIN file, as printed by `tbin info`
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub columns: u8,
    pub rows: u8,
    pub tile_width: u8,
    pub tile_height: u8,
    pub palettes: u8,
    pub remap_entries: u8,
    pub stored_tiles: usize,
    pub elided_tiles: usize,
    pub tile_bytes: usize,
    pub expected_size: usize,
    pub file_size: usize,
}

impl InfoReport {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::tbin::DecodeError> {
        let header = Header::parse(bytes)?;
        let stored_tiles = header.stored_tiles(bytes.len());
        Ok(Self {
            columns: header.columns,
            rows: header.rows,
            tile_width: header.tile_width,
            tile_height: header.tile_height,
            palettes: header.palette_count,
            remap_entries: header.remap_count,
            stored_tiles,
            elided_tiles: header.grid_tiles().saturating_sub(stored_tiles),
            tile_bytes: header.tile_byte_len(),
            expected_size: header.encoded_len(stored_tiles),
            file_size: bytes.len(),
        })
    }
}

/// Execute the info command
pub fn run_info(input: &Path, json: bool) -> ExitCode {
    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let report = match InfoReport::from_bytes(&bytes) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("File: {}", input.display());
    println!("  Grid:     {}x{} tiles", report.columns, report.rows);
    println!("  Tile:     {}x{} pixels ({} bytes)", report.tile_width, report.tile_height, report.tile_bytes);
    println!("  Palettes: {}", report.palettes);
    println!("  Tiles:    {} stored, {} elided", report.stored_tiles, report.elided_tiles);
    println!("  Remap:    {} entries", report.remap_entries);
    println!("  Size:     {} bytes (expected {})", report.file_size, report.expected_size);
    if report.file_size < report.expected_size {
        eprintln!("Warning: file is shorter than its header declares");
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the quantize command
pub fn run_quantize(colors: &[String]) -> ExitCode {
    let mut failed = false;
    for input in colors {
        match parse_hex_color(input) {
            Ok(rgb) => {
                let packed = int_rgb_to_rgb565(rgb);
                let back = int_rgb565_to_rgb(packed);
                let (a, b) = (Rgb::from_u32(rgb), Rgb::from_u32(back));
                println!(
                    "{} -> 0x{:04X} -> {} (error {:+} {:+} {:+})",
                    format_hex_color(rgb),
                    packed,
                    format_hex_color(back),
                    b.r as i16 - a.r as i16,
                    b.g as i16 - a.g as i16,
                    b.b as i16 - a.b as i16
                );
            }
            Err(e) => {
                eprintln!("Error: '{}': {}", input, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

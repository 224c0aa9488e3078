//! WASM tests using wasm_bindgen_test
//!
//! Run with: wasm-pack test --headless --chrome --features wasm
//! Or for node: see tests in src/wasm.rs (run with cargo test --features wasm)

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

// Configure tests to run in browser environment
wasm_bindgen_test_configure!(run_in_browser);

use tilebin::wasm::{decode_sheet, encode_sheet, render_to_rgba};

/// A 2x1 grid of 2x2 tiles with one white pixel in tile 0; tile 1 is empty.
fn sample_sheet() -> String {
    let colors: Vec<String> = (0..16).map(|i| format!("\"#{0:02X}{0:02X}{0:02X}\"", i * 17)).collect();
    format!(
        r#"{{"columns": 2, "rows": 1, "tile_width": 2, "tile_height": 2,
            "palettes": [{{"colors": [{}]}}],
            "layers": [{{"id": "layer-0", "pixels": [15, null, null, null, null, null, null, null]}}]}}"#,
        colors.join(", ")
    )
}

#[wasm_bindgen_test]
fn test_encode_sheet_header() {
    let bytes = encode_sheet(&sample_sheet()).unwrap();
    assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xF0, 0x0D]);
    assert_eq!(bytes[4], 0, "version");
    assert_eq!(bytes[9], 1, "one stored tile");
}

#[wasm_bindgen_test]
fn test_encode_sheet_rejects_invalid() {
    assert!(encode_sheet("not json").is_err());
    let wide = sample_sheet().replace("\"columns\": 2", "\"columns\": 17");
    assert!(encode_sheet(&wide).is_err());
}

#[wasm_bindgen_test]
fn test_decode_sheet_round_trip() {
    let bytes = encode_sheet(&sample_sheet()).unwrap();
    let json = decode_sheet(&bytes).unwrap();
    assert!(json.contains("\"palette-0\""));
    assert!(json.contains("\"columns\":2"));
}

#[wasm_bindgen_test]
fn test_decode_sheet_bad_magic() {
    assert!(decode_sheet(&[0u8; 16]).is_err());
}

#[wasm_bindgen_test]
fn test_render_to_rgba() {
    let bytes = encode_sheet(&sample_sheet()).unwrap();
    let result = render_to_rgba(&bytes).unwrap();
    assert_eq!(result.width(), 4);
    assert_eq!(result.height(), 2);

    let pixels = result.pixels();
    assert_eq!(pixels.len(), 4 * 2 * 4);
    assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
    // elided tile decodes to the transparent index
    assert_eq!(pixels[4 * 3 + 3], 0);
}

//! WASM API module for browser/JS interop
//!
//! Provides WebAssembly bindings for converting sprite sheets to and from TBIN.

use wasm_bindgen::prelude::*;

use crate::ids::SequentialIds;
use crate::models::SpriteSheet;
use crate::output::render_sheet;
use crate::tbin::{decode, try_encode};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Result of rendering a TBIN file to RGBA pixels.
#[wasm_bindgen]
pub struct RenderResult {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl RenderResult {
    /// Width of the rendered image in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rendered image in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data (4 bytes per pixel)
    #[wasm_bindgen(getter)]
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

fn encode_json(json: &str) -> Result<Vec<u8>, String> {
    let sheet: SpriteSheet = serde_json::from_str(json).map_err(|e| format!("invalid sprite sheet: {}", e))?;
    try_encode(&sheet).map_err(|e| e.to_string())
}

fn decode_bytes(bytes: &[u8]) -> Result<SpriteSheet, String> {
    decode(bytes, &mut SequentialIds::default()).map_err(|e| e.to_string())
}

fn decode_json(bytes: &[u8]) -> Result<String, String> {
    let sheet = decode_bytes(bytes)?;
    serde_json::to_string(&sheet).map_err(|e| e.to_string())
}

fn render_rgba(bytes: &[u8]) -> Result<RenderResult, String> {
    let image = render_sheet(&decode_bytes(bytes)?, true);
    Ok(RenderResult { width: image.width(), height: image.height(), pixels: image.into_raw() })
}

/// Encode a JSON sprite sheet to TBIN bytes.
///
/// The sheet is validated first; validation failures are thrown as strings.
#[wasm_bindgen]
pub fn encode_sheet(json: &str) -> Result<Vec<u8>, JsValue> {
    encode_json(json).map_err(|e| JsValue::from_str(&e))
}

/// Decode TBIN bytes to a JSON sprite sheet.
#[wasm_bindgen]
pub fn decode_sheet(bytes: &[u8]) -> Result<String, JsValue> {
    decode_json(bytes).map_err(|e| JsValue::from_str(&e))
}

/// Decode TBIN bytes and paint them to RGBA pixels.
///
/// Transparent indices are given alpha 0.
#[wasm_bindgen]
pub fn render_to_rgba(bytes: &[u8]) -> Result<RenderResult, JsValue> {
    render_rgba(bytes).map_err(|e| JsValue::from_str(&e))
}

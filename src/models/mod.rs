//! Data models for TBIN sprite sheets (palettes, layers, color schemes)

mod palette;
mod sheet;

// Re-export all public types
pub use palette::{Palette, PALETTE_SIZE};
pub use sheet::{
    Layer, ResolvedScheme, SpriteSheet, TileColorScheme, DEFAULT_PALETTE_INDEX,
    DEFAULT_TRANSPARENT_INDEX, MAX_DIMENSION,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_json_roundtrip() {
        let mut sheet = SpriteSheet::new(2, 1, 2, 2).unwrap();
        sheet.palettes.push(Palette::new("fire", [0xFF4400; PALETTE_SIZE]));
        sheet.set_pixel(0, 0, Some(4));
        sheet.color_scheme.insert(
            1,
            TileColorScheme { palette: Some("fire".to_string()), transparent_index: 0 },
        );

        let json = serde_json::to_string(&sheet).unwrap();
        let parsed: SpriteSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(sheet, parsed);
    }

    #[test]
    fn test_sheet_json_defaults() {
        let colors: Vec<String> = (0..16).map(|i| format!("#{:02X}0000", i * 16)).collect();
        let json = format!(
            r#"{{"columns": 1, "rows": 1, "tile_width": 2, "tile_height": 1,
                "palettes": [{{"colors": {}}}],
                "color_scheme": {{"0": {{"palette": null}}}}}}"#,
            serde_json::to_string(&colors).unwrap()
        );
        let sheet: SpriteSheet = serde_json::from_str(&json).unwrap();
        assert!(sheet.layers.is_empty());
        assert_eq!(sheet.color_scheme[&0].transparent_index, DEFAULT_TRANSPARENT_INDEX);
        assert_eq!(sheet.palettes[0].colors[1], 0x100000);
    }
}

//! Configuration schema types for `tbin.toml`
//!
//! Defines the structure and validation rules for tilebin configuration.

use serde::{Deserialize, Serialize};

/// Largest accepted render scale factor
pub const MAX_RENDER_SCALE: u32 = 64;

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Validate sheets before encoding
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Prefix for generated palette ids (`{prefix}-0`, `{prefix}-1`, ...)
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { id_prefix: default_id_prefix() }
    }
}

/// PNG rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Nearest-neighbor scale factor
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Draw each tile's transparent index with alpha 0
    #[serde(default = "default_true")]
    pub transparent: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: default_scale(), transparent: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_id_prefix() -> String {
    "palette".to_string()
}

fn default_scale() -> u32 {
    1
}

/// Root `tbin.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TbinConfig {
    #[serde(default)]
    pub encode: EncodeConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// A validation error in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tbin.toml: '{}' {}", self.field, self.message)
    }
}

impl TbinConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.render.scale == 0 || self.render.scale > MAX_RENDER_SCALE {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_RENDER_SCALE),
            });
        }

        if self.decode.id_prefix.is_empty() {
            errors.push(ConfigValidationError {
                field: "decode.id_prefix".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: TbinConfig = toml::from_str("").unwrap();
        assert_eq!(config, TbinConfig::default());
        assert!(config.encode.validate);
        assert_eq!(config.decode.id_prefix, "palette");
        assert_eq!(config.render.scale, 1);
        assert!(config.render.transparent);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[encode]
validate = false

[decode]
id_prefix = "pal"

[render]
scale = 4
transparent = false
"#;
        let config: TbinConfig = toml::from_str(toml).unwrap();
        assert!(!config.encode.validate);
        assert_eq!(config.decode.id_prefix, "pal");
        assert_eq!(config.render.scale, 4);
        assert!(!config.render.transparent);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_scale_and_prefix() {
        let mut config = TbinConfig::default();
        config.render.scale = 0;
        config.decode.id_prefix.clear();
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "render.scale");
        assert_eq!(errors[1].to_string(), "tbin.toml: 'decode.id_prefix' must be a non-empty string");

        config = TbinConfig::default();
        config.render.scale = 65;
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_unknown_section_is_ignored() {
        let config: TbinConfig = toml::from_str("[project]\nname = \"x\"\n").unwrap();
        assert_eq!(config, TbinConfig::default());
    }
}

//! Configuration loading and discovery for `tbin.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TbinConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "tbin.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tbin.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Skip validation before encoding
    pub no_validate: Option<bool>,
    /// Override palette id prefix
    pub id_prefix: Option<String>,
    /// Override render scale
    pub scale: Option<u32>,
    /// Render transparent indices opaque
    pub opaque: Option<bool>,
}

/// Find tbin.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for tbin.toml
/// 2. Check XDG_CONFIG_HOME/tilebin/tbin.toml (or ~/.config/tilebin/tbin.toml)
pub fn find_config() -> Option<PathBuf> {
    // First try walking up from current directory
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    // Fall back to XDG config
    find_xdg_config()
}

/// Find tbin.toml in XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("tilebin").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find tbin.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Reached root, no config found
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tbin.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("assets/tbin.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<TbinConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(TbinConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<TbinConfig, ConfigError> {
    log::info!("Loading {}", path.display());
    let contents = fs::read_to_string(path)?;
    let config: TbinConfig = toml::from_str(&contents)?;
    check_config(&config)?;
    Ok(config)
}

fn check_config(config: &TbinConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is validated again, so flags obey the same rules as the file.
pub fn merge_cli_overrides(config: &mut TbinConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(true) = overrides.no_validate {
        config.encode.validate = false;
    }

    if let Some(ref prefix) = overrides.id_prefix {
        config.decode.id_prefix = prefix.clone();
    }

    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }

    if let Some(true) = overrides.opaque {
        config.render.transparent = false;
    }

    check_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[render]\nscale = 2")
            .expect("should write config content");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        File::create(&config_path).expect("should create config file");

        let subdir = temp.path().join("sheets").join("tiles");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(
                br#"
[decode]
id_prefix = "swatch"

[render]
scale = 3
"#,
            )
            .expect("should write config content");

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.decode.id_prefix, "swatch");
        assert_eq!(config.render.scale, 3);
        assert!(config.encode.validate);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "this is not valid toml {{{").expect("should write invalid config");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[render]\nscale = 0\n").expect("should write invalid config");

        let result = load_config(Some(&config_path));
        match result {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec!["tbin.toml: 'render.scale' must be between 1 and 64"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = TbinConfig::default();
        let overrides = CliOverrides {
            no_validate: Some(true),
            id_prefix: Some("pal".to_string()),
            scale: Some(8),
            opaque: Some(true),
        };
        merge_cli_overrides(&mut config, &overrides).unwrap();
        assert!(!config.encode.validate);
        assert_eq!(config.decode.id_prefix, "pal");
        assert_eq!(config.render.scale, 8);
        assert!(!config.render.transparent);
    }

    #[test]
    fn test_merge_cli_overrides_empty_keeps_config() {
        let mut config = TbinConfig::default();
        config.render.scale = 5;
        merge_cli_overrides(&mut config, &CliOverrides::default()).unwrap();
        assert_eq!(config.render.scale, 5);
        assert!(config.encode.validate);
    }

    #[test]
    fn test_merge_cli_overrides_revalidates() {
        let mut config = TbinConfig::default();
        let overrides = CliOverrides { id_prefix: Some(String::new()), ..Default::default() };
        match merge_cli_overrides(&mut config, &overrides) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("decode.id_prefix"), "{:?}", errors);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

//! Decode command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::TbinConfig;
use crate::ids::SequentialIds;
use crate::models::SpriteSheet;
use crate::output::{generate_output_path, write_bytes};
use crate::tbin::decode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the decode command
pub fn run_decode(input: &Path, output: Option<&Path>, config: &TbinConfig) -> ExitCode {
    let sheet = match read_tbin(input, &config.decode.id_prefix) {
        Ok(sheet) => sheet,
        Err(code) => return code,
    };

    let json = match serde_json::to_string_pretty(&sheet) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: Cannot serialize sprite sheet: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if output == Some(Path::new("-")) {
        println!("{}", json);
        return ExitCode::from(EXIT_SUCCESS);
    }

    let out_path = generate_output_path(input, output, "json");
    if let Err(e) = write_bytes(&out_path, json.as_bytes()) {
        eprintln!("Error: {}: {}", out_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    eprintln!("Wrote: {}", out_path.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Read and decode a TBIN file, printing errors the CLI way.
pub(crate) fn read_tbin(input: &Path, id_prefix: &str) -> Result<SpriteSheet, ExitCode> {
    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    decode(&bytes, &mut SequentialIds::new(id_prefix)).map_err(|e| {
        eprintln!("Error: {}: {}", input.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tbin::encode;

    #[test]
    fn test_run_decode_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut sheet = SpriteSheet::new(2, 1, 2, 2).unwrap();
        sheet.set_pixel(1, 3, Some(6));
        let input = dir.path().join("sheet.tbin");
        std::fs::write(&input, encode(&sheet)).unwrap();

        let mut config = TbinConfig::default();
        config.decode.id_prefix = "pal".to_string();
        assert_eq!(run_decode(&input, None, &config), ExitCode::from(EXIT_SUCCESS));

        let json = std::fs::read_to_string(dir.path().join("sheet.json")).unwrap();
        let decoded: SpriteSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.pixel(1, 3), Some(6));
        assert_eq!(decoded.palettes[0].id.as_deref(), Some("pal-0"));
    }

    #[test]
    fn test_read_tbin_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("junk.tbin");
        std::fs::write(&input, b"PNG not tbin").unwrap();
        assert_eq!(read_tbin(&input, "p").unwrap_err(), ExitCode::from(EXIT_ERROR));
    }

    #[test]
    fn test_read_tbin_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tbin(&dir.path().join("missing.tbin"), "p").unwrap_err();
        assert_eq!(err, ExitCode::from(EXIT_INVALID_ARGS));
    }
}

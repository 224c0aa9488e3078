//! Encode command implementation

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::TbinConfig;
use crate::models::SpriteSheet;
use crate::output::{generate_output_path, write_bytes};
use crate::tbin::{encode, try_encode};

use super::{find_sheet_files, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the encode command
pub fn run_encode(
    inputs: &[PathBuf],
    output: Option<&Path>,
    dir: Option<&Path>,
    config: &TbinConfig,
) -> ExitCode {
    let mut files = inputs.to_vec();
    if let Some(dir) = dir {
        if !dir.is_dir() {
            eprintln!("Error: '{}' is not a directory", dir.display());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        files.extend(find_sheet_files(dir));
    }

    if files.is_empty() {
        eprintln!("Error: No input files");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    // A plain file output only makes sense for one input
    if let Some(out) = output {
        let is_dir = out.as_os_str().to_string_lossy().ends_with('/') || out.is_dir();
        if files.len() > 1 && !is_dir {
            eprintln!(
                "Error: '{}' is a file but {} inputs were given; use a directory ending in '/'",
                out.display(),
                files.len()
            );
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    let validate = config.encode.validate;
    let results: Vec<Result<PathBuf, String>> = files
        .par_iter()
        .map(|input| {
            let out_path = generate_output_path(input, output, "tbin");
            encode_file(input, &out_path, validate).map(|_| out_path)
        })
        .collect();

    let mut failed = false;
    for result in results {
        match result {
            Ok(path) => eprintln!("Wrote: {}", path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
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

/// Encode one JSON sheet file to a TBIN file.
fn encode_file(input: &Path, output: &Path, validate: bool) -> Result<(), String> {
    let sheet = load_sheet(input)?;
    let bytes = if validate {
        try_encode(&sheet).map_err(|e| format!("{}: {}", input.display(), e))?
    } else {
        encode(&sheet)
    };
    write_bytes(output, &bytes).map_err(|e| format!("{}: {}", output.display(), e))
}

/// Read a JSON sprite sheet
pub(crate) fn load_sheet(path: &Path) -> Result<SpriteSheet, String> {
    log::info!("Loading {}", path.display());
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot open input file '{}': {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("{}: invalid sprite sheet: {}", path.display(), e))
}

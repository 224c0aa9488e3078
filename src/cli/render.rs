//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::TbinConfig;
use crate::output::{generate_output_path, render_sheet, save_png, scale_image};

use super::decode::read_tbin;
use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the render command
pub fn run_render(input: &Path, output: Option<&Path>, config: &TbinConfig) -> ExitCode {
    let sheet = match read_tbin(input, &config.decode.id_prefix) {
        Ok(sheet) => sheet,
        Err(code) => return code,
    };

    let image = scale_image(render_sheet(&sheet, config.render.transparent), config.render.scale);
    let out_path = generate_output_path(input, output, "png");

    if let Err(e) = save_png(&image, &out_path) {
        eprintln!("Error: Failed to save '{}': {}", out_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    eprintln!("Saved: {} ({}x{})", out_path.display(), image.width(), image.height());
    ExitCode::from(EXIT_SUCCESS)
}

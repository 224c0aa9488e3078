//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod decode;
mod encode;
mod info;
mod render;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, TbinConfig};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Find all JSON sprite sheets in a directory (recursively).
pub fn find_sheet_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(paths) = glob(&format!("{}/**/*.json", dir.display())) {
        files.extend(paths.filter_map(Result::ok));
    }
    files.sort();
    files
}

/// TBIN - convert indexed-color sprite sheets to and from the TBIN binary format
#[derive(Parser)]
#[command(name = "tbin")]
#[command(about = "TBIN - convert indexed-color sprite sheets to and from the TBIN binary format")]
#[command(version)]
pub struct Cli {
    /// Path to a tbin.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log codec details to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode JSON sprite sheets to TBIN
    Encode {
        /// Input JSON sprite sheet files
        inputs: Vec<PathBuf>,

        /// Output file (single input) or directory (ends with /).
        /// If omitted: {input}.tbin next to each input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also encode every .json file under this directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Skip validation and mask out-of-range values instead
        #[arg(long)]
        no_validate: bool,
    },

    /// Decode a TBIN file to a JSON sprite sheet
    Decode {
        /// Input TBIN file
        input: PathBuf,

        /// Output JSON file, or "-" for stdout. If omitted: {input}.json
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prefix for generated palette ids
        #[arg(long)]
        id_prefix: Option<String>,
    },

    /// Show the header of a TBIN file
    Info {
        /// Input TBIN file
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a TBIN file to PNG
    Render {
        /// Input TBIN file
        input: PathBuf,

        /// Output PNG file or directory (ends with /). If omitted: {input}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-64)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,

        /// Draw transparent indices with their palette color
        #[arg(long)]
        opaque: bool,
    },

    /// Show how colors survive RGB565 storage
    Quantize {
        /// Colors as #RGB or #RRGGBB
        #[arg(required = true)]
        colors: Vec<String>,
    },
}

/// Initialize env_logger; `--verbose` raises the default level to debug.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Load tbin.toml (explicit or discovered) and apply CLI overrides.
fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<TbinConfig, ExitCode> {
    let result = load_config(path).and_then(|mut config| {
        merge_cli_overrides(&mut config, overrides)?;
        Ok(config)
    });
    result.map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Encode { inputs, output, dir, no_validate } => {
            let overrides = CliOverrides { no_validate: Some(no_validate), ..Default::default() };
            match resolve_config(config_path, &overrides) {
                Ok(config) => encode::run_encode(&inputs, output.as_deref(), dir.as_deref(), &config),
                Err(code) => code,
            }
        }
        Commands::Decode { input, output, id_prefix } => {
            let overrides = CliOverrides { id_prefix, ..Default::default() };
            match resolve_config(config_path, &overrides) {
                Ok(config) => decode::run_decode(&input, output.as_deref(), &config),
                Err(code) => code,
            }
        }
        Commands::Info { input, json } => info::run_info(&input, json),
        Commands::Render { input, output, scale, opaque } => {
            let overrides = CliOverrides { scale, opaque: Some(opaque), ..Default::default() };
            match resolve_config(config_path, &overrides) {
                Ok(config) => render::run_render(&input, output.as_deref(), &config),
                Err(code) => code,
            }
        }
        Commands::Quantize { colors } => info::run_quantize(&colors),
    }
}

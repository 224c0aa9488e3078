//! tbin - Command-line tool for encoding and decoding TBIN sprite sheets

use std::process::ExitCode;

use tilebin::cli;

fn main() -> ExitCode {
    cli::run()
}

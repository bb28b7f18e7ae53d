//! Crispscale - command-line tool for edge-preserving integer upscaling

use std::process::ExitCode;

use crispscale::cli;

fn main() -> ExitCode {
    cli::run()
}

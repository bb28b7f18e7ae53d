//! Command-line interface implementation
//!
//! The `crisp` binary is a thin driver around the library pipeline:
//! decode the input image, resolve parameters (defaults, then preset,
//! then explicit flags), run the pipeline, encode the result. Errors go
//! to stderr with stable exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{load_preset, ConfigError};
use crate::output::{derive_output_path, save_image};
use crate::upscale::{upscale, UpscaleConfig};

/// Exit codes per Crispscale spec
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Crispscale - upscale raster images while keeping edges crisp
#[derive(Parser)]
#[command(name = "crisp")]
#[command(about = "Crispscale - integer image upscaling with edge-preserving selective smoothing")]
#[command(version)]
pub struct Cli {
    /// Input image (PNG or JPEG)
    pub input: PathBuf,

    /// Output file; format follows the extension.
    /// If omitted: {input_stem}_upscaled.png
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Integer upscale factor (1-16)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub scale: Option<u32>,

    /// Mask detail level (0.1-1.0): gradients at or below this classify as uniform
    #[arg(short, long)]
    pub detail: Option<f32>,

    /// Smoothing threshold as a percentage (0-100)
    #[arg(short = 'm', long)]
    pub smoothing: Option<f32>,

    /// TOML preset supplying defaults for the pipeline parameters
    #[arg(long)]
    pub preset: Option<PathBuf>,
}

/// Resolve the effective config: defaults, then preset, then flags.
fn resolve_config(cli: &Cli) -> Result<UpscaleConfig, ConfigError> {
    let mut config = match &cli.preset {
        Some(path) => load_preset(path)?,
        None => UpscaleConfig::default(),
    };

    if let Some(scale) = cli.scale {
        config.scale_factor = scale;
    }
    if let Some(detail) = cli.detail {
        config.detail_level = detail;
    }
    if let Some(percent) = cli.smoothing {
        // The UI-facing value is 0-100; the core wants a fraction.
        config.smoothing_threshold = percent / 100.0;
    }

    config.validate()?;
    Ok(config)
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let source = match image::open(&cli.input) {
        Ok(decoded) => decoded.to_rgb8(),
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", cli.input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let result = match upscale(&source, &config) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output_path = cli.output.clone().unwrap_or_else(|| derive_output_path(&cli.input));
    if let Err(e) = save_image(&result, &output_path) {
        eprintln!("Error: Cannot write '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Wrote {} ({}x{})", output_path.display(), result.width(), result.height());
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_with(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("crisp").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = cli_with(&["in.png"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config, UpscaleConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = cli_with(&["in.png", "--scale", "3", "--detail", "0.4", "--smoothing", "50"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.scale_factor, 3);
        assert!((config.detail_level - 0.4).abs() < 0.001);
        assert!((config.smoothing_threshold - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_smoothing_percentage_is_divided() {
        let cli = cli_with(&["in.png", "--smoothing", "85"]);
        let config = resolve_config(&cli).unwrap();
        assert!((config.smoothing_threshold - 0.85).abs() < 0.001);
    }

    #[test]
    fn test_flags_override_preset() {
        let mut preset = tempfile::NamedTempFile::new().unwrap();
        preset.write_all(b"scale_factor = 2\ndetail_level = 0.9\n").unwrap();
        let preset_path = preset.path().to_string_lossy().into_owned();

        let cli = cli_with(&["in.png", "--preset", &preset_path, "--scale", "5"]);
        let config = resolve_config(&cli).unwrap();

        // Flag wins over preset, preset wins over default
        assert_eq!(config.scale_factor, 5);
        assert!((config.detail_level - 0.9).abs() < 0.001);
        assert!((config.smoothing_threshold - 0.85).abs() < 0.001);
    }

    #[test]
    fn test_out_of_domain_flag_rejected() {
        let cli = cli_with(&["in.png", "--detail", "0.01"]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_out_of_domain_smoothing_percentage_rejected() {
        let cli = cli_with(&["in.png", "--smoothing", "150"]);
        assert!(resolve_config(&cli).is_err());
    }
}

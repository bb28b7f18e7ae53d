//! Preset loading for pipeline parameters
//!
//! A preset is a TOML file carrying an [`UpscaleConfig`]:
//!
//! ```toml
//! scale_factor = 8
//! detail_level = 0.1
//! smoothing_threshold = 0.85
//! ```
//!
//! Missing keys fall back to the built-in defaults. Explicit CLI flags
//! override preset values, which override the defaults.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::upscale::{UpscaleConfig, UpscaleError};

/// Parameter resolution error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read preset: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse preset: {0}")]
    Parse(#[from] toml::de::Error),
    /// A parameter outside its documented domain
    #[error("Invalid configuration: {0}")]
    Validation(#[from] UpscaleError),
}

/// Load and validate a preset file.
pub fn load_preset(path: &Path) -> Result<UpscaleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: UpscaleConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_preset(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_preset() {
        let file = write_preset(
            "scale_factor = 4\ndetail_level = 0.3\nsmoothing_threshold = 0.5\n",
        );
        let config = load_preset(file.path()).unwrap();
        assert_eq!(config.scale_factor, 4);
        assert!((config.detail_level - 0.3).abs() < 0.001);
        assert!((config.smoothing_threshold - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_partial_preset_uses_defaults() {
        let file = write_preset("scale_factor = 2\n");
        let config = load_preset(file.path()).unwrap();
        assert_eq!(config.scale_factor, 2);
        assert!((config.detail_level - 0.1).abs() < 0.001);
        assert!((config.smoothing_threshold - 0.85).abs() < 0.001);
    }

    #[test]
    fn test_empty_preset_is_all_defaults() {
        let file = write_preset("");
        let config = load_preset(file.path()).unwrap();
        assert_eq!(config, UpscaleConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let file = write_preset("scale_factor = [nope");
        let err = load_preset(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_out_of_domain_preset_is_a_validation_error() {
        let file = write_preset("scale_factor = 99\n");
        let err = load_preset(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_preset(Path::new("/nonexistent/preset.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

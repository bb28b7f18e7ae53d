//! Error types for the upscaling pipeline

use thiserror::Error;

/// Error raised by a pipeline stage.
///
/// Every stage checks its inputs synchronously before touching any
/// buffer. An invocation either returns a complete output buffer or the
/// first error; nothing retries and nothing is silently defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpscaleError {
    /// A parameter is outside its documented domain
    #[error("Invalid parameter `{name}`: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A zero-sized or dimension-mismatched input buffer
    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),
}

//! Error types for Versicle app services
//!
//! Application-level errors that wrap audio-core errors and add
//! app-specific variants.

use thiserror::Error;
use versicle::error::VersicleError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Audio(#[from] VersicleError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Audio(VersicleError::Io(e))
    }
}

/// Result type alias for Versicle app services
pub type Result<T> = std::result::Result<T, AppError>;

//! Error types for the Versicle audio core
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for the Versicle audio core
#[derive(Error, Debug)]
pub enum VersicleError {
    #[error("Malformed audio: {0}")]
    MalformedAudio(String),

    #[error("Audio output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the Versicle audio core
pub type Result<T> = std::result::Result<T, VersicleError>;

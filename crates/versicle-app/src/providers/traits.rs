//! Provider traits
//!
//! The generation orchestrator talks to the AI service through these two
//! seams, so implementations can be swapped (and mocked in tests).

use crate::error::Result;

/// A text-generation capability.
pub trait TextGenerator: Send + Sync {
    /// Display name for the provider (e.g., "Gemini")
    fn name(&self) -> &'static str;

    /// Generate text for a free-text prompt.
    ///
    /// Any transport or service error surfaces as
    /// [`crate::error::AppError::Generation`].
    fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// A speech-synthesis capability.
pub trait SpeechSynthesizer: Send + Sync {
    /// Display name for the provider
    fn name(&self) -> &'static str;

    /// Synthesize speech for the given text.
    ///
    /// Returns raw 16-bit little-endian mono PCM at 24 kHz. Fails with
    /// [`crate::error::AppError::Generation`] when the service returns no
    /// audio payload.
    fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

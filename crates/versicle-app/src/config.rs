//! Configuration constants for Versicle app services

/// Application metadata
pub mod app {
    /// Application name (used for the config directory, etc.)
    pub const NAME: &str = "versicle";
}

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("Versicle/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Read timeout in seconds. Speech synthesis can take a while for a
    /// minute-long clip, so this is generous.
    pub const READ_TIMEOUT_SECS: u64 = 120;
}

/// Generative-AI provider configuration
pub mod providers {
    /// Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Model used for text generation
    pub const TEXT_MODEL: &str = "gemini-2.5-flash";

    /// Model used for speech synthesis
    pub const SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

    /// Prebuilt voice used for synthesized speech
    pub const SPEECH_VOICE: &str = "Zephyr";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
}

/// Share surface configuration
pub mod share {
    /// Base URL for the pre-filled messaging link fallback
    pub const MESSAGE_LINK_BASE: &str = "https://wa.me/";

    /// Fixed payment identifier offered for copying to the clipboard
    pub const PAYMENT_KEY: &str = "support@versicle.app";
}

/// User-facing messages
///
/// Generation failures surface as one generic message per operation; the
/// underlying cause only goes to the log.
pub mod messages {
    pub const REVELATION_ERROR: &str = "Could not generate today's message. Please try again.";
    pub const PRAYER_ERROR: &str = "Could not generate the prayer. Please try again.";
}

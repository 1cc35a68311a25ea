//! Configuration constants for the Versicle audio core

/// Audio format configuration
///
/// The speech service delivers raw 16-bit little-endian mono PCM at 24 kHz.
/// These constants describe that fixed wire format.
pub mod audio {
    /// Sample rate of synthesized speech (Hz)
    pub const SAMPLE_RATE: u32 = 24_000;

    /// Channel count of synthesized speech
    pub const CHANNELS: u16 = 1;

    /// Bits per PCM sample
    pub const BITS_PER_SAMPLE: u16 = 16;
}

/// Playback transport configuration
pub mod transport {
    /// Progress sampler interval in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 100;

    /// Maximum sink volume (0.0..=MAX_VOLUME)
    pub const MAX_VOLUME: f32 = 2.0;
}

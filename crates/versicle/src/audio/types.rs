//! Shared audio types
//!
//! Pure data types used across the audio subsystem.

use std::fmt;
use std::time::Duration;

/// A decoded, immutable audio clip.
///
/// Samples are normalized floats in [-1.0, 1.0], channel-interleaved in
/// frame order. Built once from raw PCM bytes and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    /// Create a buffer from decoded samples.
    ///
    /// `samples.len()` must be a multiple of `channels`; callers are expected
    /// to go through [`crate::audio::pcm::decode_pcm16`], which guarantees it.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Whether the buffer holds no audio
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Clip duration derived from frame count and sample rate
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }
}

/// Current transport state of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Idle => write!(f, "Idle"),
            TransportState::Playing => write!(f, "Playing"),
            TransportState::Paused => write!(f, "Paused"),
            TransportState::Ended => write!(f, "Ended"),
        }
    }
}

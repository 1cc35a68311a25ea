//! Versicle — Audio Core
//!
//! PCM decoding, WAV encoding, and clip playback transport.
//!
//! ## Quick start
//!
//! ```no_run
//! use versicle::audio::{decode_pcm16, OutputDevice, RodioSink, Transport};
//! ```

pub mod audio;
pub mod config;
pub mod error;

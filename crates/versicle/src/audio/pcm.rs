//! PCM decoding
//!
//! Converts raw 16-bit little-endian PCM byte streams into normalized
//! [`SampleBuffer`]s. The caller declares sample rate and channel count;
//! the bytes carry no format metadata and are not inspected for any.

use crate::error::{Result, VersicleError};

use super::types::SampleBuffer;

/// Decode raw 16-bit little-endian PCM bytes into a [`SampleBuffer`].
///
/// The byte length must be a multiple of `2 * channels` (two bytes per
/// sample per channel); anything else is a caller error. Samples are
/// normalized as `s / 32768.0`, so the output range is [-1.0, ~0.99997]
/// with no special-casing of the -32768 edge value.
///
/// No resampling or channel remixing happens here; `sample_rate` and
/// `channels` are passed through as declared.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<SampleBuffer> {
    if channels == 0 {
        return Err(VersicleError::MalformedAudio(
            "channel count must be at least 1".to_string(),
        ));
    }

    let frame_bytes = 2 * channels as usize;
    if bytes.len() % frame_bytes != 0 {
        return Err(VersicleError::MalformedAudio(format!(
            "PCM byte length {} is not a multiple of {} ({} channels, 2 bytes per sample)",
            bytes.len(),
            frame_bytes,
            channels
        )));
    }

    let mut samples = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let value = i16::from_le_bytes([pair[0], pair[1]]);
        samples.push(value as f32 / 32768.0);
    }

    Ok(SampleBuffer::new(samples, sample_rate, channels))
}

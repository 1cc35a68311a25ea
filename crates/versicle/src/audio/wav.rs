//! WAV encoding
//!
//! Wraps raw PCM bytes with the canonical 44-byte RIFF/WAVE header so a
//! clip can be exported as a standalone file. The PCM payload is carried
//! through unmodified.

use std::io::Write;

use crate::error::Result;

/// Length of the canonical WAV header in bytes
pub const WAV_HEADER_LEN: usize = 44;

/// Build a standalone WAV file from raw PCM bytes.
///
/// Header layout (all multi-byte fields little-endian):
/// `"RIFF"`, fileSize = 36 + dataSize (u32), `"WAVE"`, `"fmt "`,
/// subchunk1Size = 16 (u32), audioFormat = 1 / PCM (u16), numChannels (u16),
/// sampleRate (u32), byteRate (u32), blockAlign (u16), bitsPerSample (u16),
/// `"data"`, dataSize (u32), then the PCM bytes.
pub fn encode_wav(pcm: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = pcm.len() as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");
    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());
    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    buf.extend_from_slice(pcm);
    buf
}

/// Encode PCM bytes as WAV and write the result to `writer`.
pub fn write_wav<W: Write>(
    writer: &mut W,
    pcm: &[u8],
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
) -> Result<()> {
    let encoded = encode_wav(pcm, sample_rate, channels, bits_per_sample);
    writer.write_all(&encoded)?;
    writer.flush()?;
    Ok(())
}

//! Audio output sinks
//!
//! `AudioSink` is the seam between the playback transport and the physical
//! output device. The production implementation (`RodioSink`) drives a
//! rodio sink connected to the process-wide output mixer; tests substitute
//! their own implementations.

use std::sync::Arc;
use std::time::Duration;

use rodio::source::Source;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::transport::MAX_VOLUME;
use crate::error::{Result, VersicleError};

use super::types::SampleBuffer;

/// Output backend for a playback transport.
///
/// Implementations own at most one active source at a time; `start` replaces
/// any source that is still playing.
pub trait AudioSink {
    /// Start a new source at `offset` into the buffer, replacing any
    /// active source.
    fn start(&mut self, buffer: Arc<SampleBuffer>, offset: Duration) -> Result<()>;

    /// Stop and release the active source, if any.
    fn stop(&mut self);

    /// Whether the most recently started source has played to completion.
    ///
    /// Returns false while a source is still producing audio and false when
    /// no source was ever started.
    fn finished(&self) -> bool;

    /// Set output volume (clamped to 0.0..=2.0).
    fn set_volume(&mut self, volume: f32);
}

/// A rodio source reading from a shared [`SampleBuffer`] starting at a
/// frame offset.
pub struct BufferSource {
    buffer: Arc<SampleBuffer>,
    pos: usize,
}

impl BufferSource {
    /// Create a source positioned `offset` into the clip.
    ///
    /// Offsets past the end of the buffer yield an immediately-finished
    /// source rather than an error.
    pub fn new(buffer: Arc<SampleBuffer>, offset: Duration) -> Self {
        let frame = (offset.as_secs_f64() * buffer.sample_rate() as f64) as usize;
        let pos = (frame * buffer.channels() as usize).min(buffer.samples().len());
        Self { buffer, pos }
    }

    /// Samples remaining to be played
    pub fn remaining(&self) -> usize {
        self.buffer.samples().len() - self.pos
    }
}

impl Iterator for BufferSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.buffer.samples().get(self.pos).copied()?;
        self.pos += 1;
        Some(sample)
    }
}

impl Source for BufferSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.buffer.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        let rate = self.buffer.sample_rate();
        if rate == 0 {
            return Some(Duration::ZERO);
        }
        let frames = self.remaining() / self.buffer.channels().max(1) as usize;
        Some(Duration::from_secs_f64(frames as f64 / rate as f64))
    }
}

/// The process-wide audio output device.
///
/// Owns the rodio output stream; all sinks connect to its mixer. Must be
/// kept alive for as long as any sink created from it.
pub struct OutputDevice {
    stream: OutputStream,
}

impl OutputDevice {
    /// Open the default audio output device.
    pub fn open() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| VersicleError::Output(format!("Failed to open audio output: {}", e)))?;
        stream.log_on_drop(false);
        Ok(Self { stream })
    }

    /// Create a new sink connected to this device's mixer.
    pub fn create_sink(&self) -> RodioSink {
        RodioSink {
            sink: Sink::connect_new(self.stream.mixer()),
            started: false,
        }
    }
}

/// Production sink backed by rodio.
pub struct RodioSink {
    sink: Sink,
    started: bool,
}

impl AudioSink for RodioSink {
    fn start(&mut self, buffer: Arc<SampleBuffer>, offset: Duration) -> Result<()> {
        self.sink.stop();
        self.sink.append(BufferSource::new(buffer, offset));
        self.sink.play();
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.sink.stop();
        self.started = false;
    }

    fn finished(&self) -> bool {
        self.started && self.sink.empty()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, MAX_VOLUME));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_buffer(frames: usize) -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer::new(vec![0.0; frames], 24_000, 1))
    }

    /// Open the default output device, or None when the host has no audio
    /// (CI machines). Tests that need hardware skip silently.
    fn try_device() -> Option<OutputDevice> {
        OutputDevice::open().ok()
    }

    #[test]
    fn buffer_source_reads_all_samples() {
        let buf = Arc::new(SampleBuffer::new(vec![0.1, 0.2, 0.3], 24_000, 1));
        let collected: Vec<f32> = BufferSource::new(buf, Duration::ZERO).collect();
        assert_eq!(collected, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn buffer_source_offset_skips_frames() {
        // 24 kHz mono: 10ms = 240 frames
        let buf = short_buffer(480);
        let source = BufferSource::new(buf, Duration::from_millis(10));
        assert_eq!(source.remaining(), 240);
    }

    #[test]
    fn buffer_source_offset_past_end_is_empty() {
        let buf = short_buffer(100);
        let mut source = BufferSource::new(buf, Duration::from_secs(10));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn buffer_source_stereo_offset_stays_frame_aligned() {
        let buf = Arc::new(SampleBuffer::new(vec![0.0; 960], 24_000, 2));
        // 10ms = 240 frames = 480 samples
        let source = BufferSource::new(buf, Duration::from_millis(10));
        assert_eq!(source.remaining(), 480);
    }

    #[test]
    fn buffer_source_reports_format() {
        let buf = short_buffer(240);
        let source = BufferSource::new(buf, Duration::ZERO);
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), 24_000);
        assert_eq!(source.total_duration(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn rodio_sink_finished_lifecycle() {
        let Some(device) = try_device() else { return };
        let mut sink = device.create_sink();

        // Never started: not finished
        assert!(!sink.finished());

        // 50ms of silence
        sink.start(short_buffer(1200), Duration::ZERO).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        assert!(sink.finished());

        // Stopped sinks report not-finished again
        sink.start(short_buffer(24_000), Duration::ZERO).unwrap();
        sink.stop();
        assert!(!sink.finished());
    }
}

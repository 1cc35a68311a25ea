//! Playback clock and transport
//!
//! One `Transport` per clip. Tracks elapsed time against the real-time
//! clock rather than trusting the output backend, so progress stays
//! monotonic even while the device buffer drains. The owner drives the
//! progress sampler by calling [`Transport::tick`] on its poll interval
//! (about every 100 ms).

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::Result;

use super::sink::{AudioSink, RodioSink};
use super::types::{SampleBuffer, TransportState};

/// Per-clip playback state machine over Idle, Playing, Paused, and Ended.
///
/// Exactly one active source exists at a time; `play()` while already
/// playing is a no-op rather than stacking sources.
pub struct Transport<S: AudioSink> {
    sink: S,
    buffer: Option<Arc<SampleBuffer>>,
    state: TransportState,
    /// Elapsed playback position; authoritative while not Playing
    elapsed: Duration,
    /// Real-world instant playback would have started from position zero
    /// (`now - elapsed` at the moment of `play()`). None unless Playing.
    started_at: Option<Instant>,
    total: Duration,
}

/// Transport backed by the production rodio sink
pub type ClipTransport = Transport<RodioSink>;

impl<S: AudioSink> Transport<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buffer: None,
            state: TransportState::Idle,
            elapsed: Duration::ZERO,
            started_at: None,
            total: Duration::ZERO,
        }
    }

    /// Load a new clip, stopping any active source and resetting the
    /// transport to Idle at position zero.
    pub fn load(&mut self, buffer: SampleBuffer) {
        self.sink.stop();
        self.total = buffer.duration();
        self.buffer = Some(Arc::new(buffer));
        self.elapsed = Duration::ZERO;
        self.started_at = None;
        self.state = TransportState::Idle;
    }

    /// Drop the loaded clip, stopping any active source.
    ///
    /// The transport returns to Idle with no buffer; `play()` becomes a
    /// no-op until a new clip is loaded.
    pub fn unload(&mut self) {
        self.sink.stop();
        self.buffer = None;
        self.total = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.started_at = None;
        self.state = TransportState::Idle;
    }

    /// Start (or resume) playback from the current elapsed position.
    ///
    /// No-op when already Playing or when no clip is loaded.
    pub fn play(&mut self) -> Result<()> {
        if self.state == TransportState::Playing {
            return Ok(());
        }
        let Some(buffer) = self.buffer.clone() else {
            warn!("play() with no clip loaded");
            return Ok(());
        };

        self.sink.start(buffer, self.elapsed)?;
        self.started_at = Some(
            Instant::now()
                .checked_sub(self.elapsed)
                .unwrap_or_else(Instant::now),
        );
        self.state = TransportState::Playing;
        debug!("transport playing from {:?}", self.elapsed);
        Ok(())
    }

    /// Pause playback, retaining the elapsed position.
    ///
    /// No-op unless Playing. The active source is released; `play()`
    /// creates a fresh one at the retained offset.
    pub fn pause(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }
        if let Some(started) = self.started_at {
            self.elapsed = started.elapsed().min(self.total);
        }
        self.sink.stop();
        self.started_at = None;
        self.state = TransportState::Paused;
        debug!("transport paused at {:?}", self.elapsed);
    }

    /// Progress sampler: recompute elapsed time and detect natural end.
    ///
    /// While Playing, `elapsed = min(now - started_at, total)`. When the
    /// source signals completion the transport moves to Ended; if the
    /// elapsed real time reached the clip duration the position resets to
    /// zero so replay starts from the beginning.
    pub fn tick(&mut self) {
        if self.state != TransportState::Playing {
            return;
        }
        let Some(started) = self.started_at else {
            return;
        };

        let real = started.elapsed();
        self.elapsed = real.min(self.total);

        if self.sink.finished() {
            self.sink.stop();
            self.started_at = None;
            self.state = TransportState::Ended;
            if real >= self.total {
                self.elapsed = Duration::ZERO;
            }
            debug!("transport ended, position {:?}", self.elapsed);
        }
    }

    /// Set output volume (clamped by the sink to 0.0..=2.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Elapsed playback position, within `0..=total_duration`
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Duration of the loaded clip (zero when none is loaded)
    pub fn total_duration(&self) -> Duration {
        self.total
    }

    /// Whether a clip is loaded and playable
    pub fn has_clip(&self) -> bool {
        self.buffer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Sink that simulates real-time playback without an audio device:
    /// a started source "finishes" once its remaining duration has passed
    /// on the wall clock.
    struct MockSink {
        finish_at: Option<Instant>,
        /// Offsets passed to start(), in order
        starts: Vec<Duration>,
        stops: usize,
        volume: f32,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                finish_at: None,
                starts: Vec::new(),
                stops: 0,
                volume: 1.0,
            }
        }
    }

    impl AudioSink for MockSink {
        fn start(&mut self, buffer: Arc<SampleBuffer>, offset: Duration) -> Result<()> {
            let remaining = buffer.duration().saturating_sub(offset);
            self.finish_at = Some(Instant::now() + remaining);
            self.starts.push(offset);
            Ok(())
        }

        fn stop(&mut self) {
            self.finish_at = None;
            self.stops += 1;
        }

        fn finished(&self) -> bool {
            self.finish_at.is_some_and(|at| Instant::now() >= at)
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
    }

    /// 24 kHz mono buffer lasting `ms` milliseconds
    fn clip(ms: u64) -> SampleBuffer {
        SampleBuffer::new(vec![0.0; (24 * ms) as usize], 24_000, 1)
    }

    fn transport_with_clip(ms: u64) -> Transport<MockSink> {
        let mut t = Transport::new(MockSink::new());
        t.load(clip(ms));
        t
    }

    #[test]
    fn starts_idle_with_zero_position() {
        let t = transport_with_clip(200);
        assert_eq!(t.state(), TransportState::Idle);
        assert_eq!(t.elapsed(), Duration::ZERO);
        assert_eq!(t.total_duration(), Duration::from_millis(200));
    }

    #[test]
    fn play_without_clip_is_noop() {
        let mut t = Transport::new(MockSink::new());
        t.play().unwrap();
        assert_eq!(t.state(), TransportState::Idle);
        assert!(t.sink.starts.is_empty());
    }

    #[test]
    fn play_while_playing_does_not_stack_sources() {
        let mut t = transport_with_clip(500);
        t.play().unwrap();
        t.play().unwrap();
        t.play().unwrap();
        assert_eq!(t.sink.starts.len(), 1);
        assert_eq!(t.state(), TransportState::Playing);
    }

    #[test]
    fn natural_end_resets_position() {
        let mut t = transport_with_clip(100);
        t.play().unwrap();

        thread::sleep(Duration::from_millis(150));
        t.tick();

        assert_eq!(t.state(), TransportState::Ended);
        assert_eq!(t.elapsed(), Duration::ZERO);
    }

    #[test]
    fn replay_after_end_starts_from_beginning() {
        let mut t = transport_with_clip(80);
        t.play().unwrap();
        thread::sleep(Duration::from_millis(120));
        t.tick();
        assert_eq!(t.state(), TransportState::Ended);

        t.play().unwrap();
        assert_eq!(t.state(), TransportState::Playing);
        assert_eq!(*t.sink.starts.last().unwrap(), Duration::ZERO);
    }

    #[test]
    fn pause_retains_position_and_releases_source() {
        let mut t = transport_with_clip(500);
        t.play().unwrap();
        thread::sleep(Duration::from_millis(80));
        t.tick();
        t.pause();

        assert_eq!(t.state(), TransportState::Paused);
        assert_eq!(t.sink.stops, 1 + 1); // load() + pause()
        let held = t.elapsed();
        assert!(held >= Duration::from_millis(80));
        assert!(held < Duration::from_millis(500));

        // Position does not drift while paused
        thread::sleep(Duration::from_millis(50));
        t.tick();
        assert_eq!(t.elapsed(), held);
    }

    #[test]
    fn resume_starts_source_at_paused_offset() {
        let mut t = transport_with_clip(500);
        t.play().unwrap();
        thread::sleep(Duration::from_millis(60));
        t.tick();
        t.pause();
        let held = t.elapsed();

        t.play().unwrap();
        assert_eq!(t.state(), TransportState::Playing);
        assert_eq!(t.sink.starts.len(), 2);
        assert_eq!(t.sink.starts[1], held);
        assert!(held > Duration::ZERO);
    }

    #[test]
    fn pause_when_not_playing_is_noop() {
        let mut t = transport_with_clip(200);
        t.pause();
        assert_eq!(t.state(), TransportState::Idle);

        t.play().unwrap();
        thread::sleep(Duration::from_millis(250));
        t.tick();
        t.pause();
        assert_eq!(t.state(), TransportState::Ended);
    }

    #[test]
    fn elapsed_clamped_to_total() {
        let mut t = transport_with_clip(100);
        t.play().unwrap();
        thread::sleep(Duration::from_millis(160));
        // Simulate a sink that has not signaled completion yet: elapsed
        // still may not exceed the clip duration.
        t.sink.finish_at = Some(Instant::now() + Duration::from_secs(60));
        t.tick();
        assert_eq!(t.elapsed(), Duration::from_millis(100));
        assert_eq!(t.state(), TransportState::Playing);
    }

    #[test]
    fn load_replaces_clip_and_resets() {
        let mut t = transport_with_clip(400);
        t.play().unwrap();
        thread::sleep(Duration::from_millis(40));
        t.tick();

        t.load(clip(150));
        assert_eq!(t.state(), TransportState::Idle);
        assert_eq!(t.elapsed(), Duration::ZERO);
        assert_eq!(t.total_duration(), Duration::from_millis(150));
        // The old source was stopped
        assert!(t.sink.finish_at.is_none());
    }

    #[test]
    fn unload_leaves_transport_inert() {
        let mut t = transport_with_clip(300);
        t.play().unwrap();
        t.unload();

        assert_eq!(t.state(), TransportState::Idle);
        assert!(!t.has_clip());
        assert_eq!(t.total_duration(), Duration::ZERO);

        // play() with no clip stays a no-op
        t.play().unwrap();
        assert_eq!(t.state(), TransportState::Idle);
    }

    #[test]
    fn volume_forwarded_to_sink() {
        let mut t = transport_with_clip(100);
        t.set_volume(0.5);
        assert_eq!(t.sink.volume, 0.5);
    }
}

//! Application controller
//!
//! Owns the audio output, both clip transports, today's record, and the
//! generation workers. Processes commands from the frontend through a
//! single crossbeam channel; all state mutation happens on the controller
//! thread between suspension points.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};

use versicle::audio::{
    decode_pcm16, AudioSink, ClipTransport, OutputDevice, Transport,
};
use versicle::config::audio::{CHANNELS, SAMPLE_RATE};
use versicle::config::transport::TICK_INTERVAL_MS;

use crate::config::messages;
use crate::data::records::RecordStore;
use crate::data::types::{Clip, DailyRecord};
use crate::generate::{GenerationPhase, Orchestrator};
use crate::providers::{SpeechSynthesizer, TextGenerator};
use crate::share;

use super::state::{AppCommand, AppSnapshot, ClipStatus, RecordSummary};

/// Which generation request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flight {
    Revelation,
    Prayer,
}

pub struct AppController {
    cmd_rx: Receiver<AppCommand>,
    cmd_tx: Sender<AppCommand>,
    shared_state: Arc<Mutex<AppSnapshot>>,
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,

    /// Path of the records file; workers load and persist through it
    records_path: Option<PathBuf>,

    record: Option<DailyRecord>,
    revelation: Option<ClipTransport>,
    prayer: Option<ClipTransport>,
    /// Output device must outlive the sinks connected to its mixer
    _device: Option<OutputDevice>,

    /// Monotonically increasing counter to discard stale worker results
    generation: u64,
    in_flight: Option<Flight>,
    phase: GenerationPhase,
    phase_rx: Receiver<GenerationPhase>,
    phase_tx: Sender<GenerationPhase>,

    revelation_error: Option<String>,
    prayer_error: Option<String>,
}

impl AppController {
    pub fn new(
        cmd_rx: Receiver<AppCommand>,
        cmd_tx: Sender<AppCommand>,
        shared_state: Arc<Mutex<AppSnapshot>>,
        text: Arc<dyn TextGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let (phase_tx, phase_rx) = crossbeam_channel::unbounded();
        Self {
            cmd_rx,
            cmd_tx,
            shared_state,
            text,
            speech,
            records_path: None,
            record: None,
            revelation: None,
            prayer: None,
            _device: None,
            generation: 0,
            in_flight: None,
            phase: GenerationPhase::Idle,
            phase_rx,
            phase_tx,
            revelation_error: None,
            prayer_error: None,
        }
    }

    /// Override the records file path (used by tests)
    pub fn with_records_path(mut self, path: PathBuf) -> Self {
        self.records_path = Some(path);
        self
    }

    fn records_path(&self) -> crate::error::Result<PathBuf> {
        match &self.records_path {
            Some(path) => Ok(path.clone()),
            None => RecordStore::default_path(),
        }
    }

    /// Run the controller event loop (blocking, call from a dedicated thread)
    pub fn run(&mut self) {
        // Audio output: a failure leaves the player controls inert rather
        // than aborting the app.
        match OutputDevice::open() {
            Ok(device) => {
                self.revelation = Some(Transport::new(device.create_sink()));
                self.prayer = Some(Transport::new(device.create_sink()));
                self._device = Some(device);
            }
            Err(e) => {
                warn!("audio output unavailable: {}", e);
            }
        }

        // Load today's cached record, if any
        match self
            .records_path()
            .and_then(|path| RecordStore::load_from(&path))
        {
            Ok(store) => {
                if let Some(record) = store.today().cloned() {
                    info!("loaded cached record for {}", record.date_key);
                    self.load_clip(Clip::Revelation, record.revelation_audio.clone());
                    if let Some(audio) = record.prayer_audio.clone() {
                        self.load_clip(Clip::Prayer, audio);
                    }
                    self.record = Some(record);
                }
            }
            Err(e) => warn!("could not load records: {}", e),
        }
        self.refresh_snapshot();

        loop {
            match self
                .cmd_rx
                .recv_timeout(Duration::from_millis(TICK_INTERVAL_MS))
            {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            }

            // Progress sampler: recompute elapsed time, detect natural end
            if let Some(t) = self.revelation.as_mut() {
                t.tick();
            }
            if let Some(t) = self.prayer.as_mut() {
                t.tick();
            }
            self.drain_phases();
            self.refresh_snapshot();
        }
    }

    /// Handle a single command. Returns true if the loop should exit.
    fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Shutdown => return true,

            AppCommand::Generate { name, theme } => {
                self.start_revelation(name, theme);
            }
            AppCommand::GeneratePrayer => {
                self.start_prayer();
            }
            AppCommand::InternalGenerated { generation, result } => {
                self.finish_revelation(generation, result);
            }
            AppCommand::InternalPrayer { generation, result } => {
                self.finish_prayer(generation, result);
            }

            AppCommand::Play(clip) => {
                self.play_clip(clip);
            }
            AppCommand::Pause(clip) => {
                if let Some(t) = self.transport_mut(clip) {
                    t.pause();
                }
            }
            AppCommand::SetVolume(volume) => {
                if let Some(t) = self.revelation.as_mut() {
                    t.set_volume(volume);
                }
                if let Some(t) = self.prayer.as_mut() {
                    t.set_volume(volume);
                }
            }

            AppCommand::ExportWav { clip, path } => {
                self.export_clip(clip, &path);
            }
            AppCommand::Share(clip) => {
                self.share_clip(clip);
            }
            AppCommand::CopyPaymentKey => {
                if let Err(e) = share::copy_payment_key() {
                    warn!("clipboard write failed: {}", e);
                }
            }
        }
        self.drain_phases();
        self.refresh_snapshot();
        false
    }

    // =========================================================================
    // Generation
    // =========================================================================

    fn start_revelation(&mut self, name: String, theme: String) {
        if self.in_flight.is_some() {
            warn!("generation already in flight, request ignored");
            return;
        }
        let path = match self.records_path() {
            Ok(path) => path,
            Err(e) => {
                error!("no records path: {}", e);
                self.revelation_error = Some(messages::REVELATION_ERROR.to_string());
                return;
            }
        };

        self.generation += 1;
        self.in_flight = Some(Flight::Revelation);
        self.revelation_error = None;

        let generation = self.generation;
        let tx = self.cmd_tx.clone();
        let text = self.text.clone();
        let speech = self.speech.clone();
        let phase_tx = self.phase_tx.clone();

        let spawned = thread::Builder::new()
            .name("generate-revelation".into())
            .spawn(move || {
                let result = RecordStore::load_from(&path)
                    .and_then(|mut store| {
                        Orchestrator::new(text, speech)
                            .with_phase_observer(phase_tx)
                            .generate_revelation(&mut store, &name, &theme)
                    })
                    .map_err(|e| e.to_string());
                let _ = tx.send(AppCommand::InternalGenerated { generation, result });
            });
        if let Err(e) = spawned {
            error!("failed to spawn generation worker: {}", e);
            self.in_flight = None;
            self.revelation_error = Some(messages::REVELATION_ERROR.to_string());
        }
    }

    fn finish_revelation(&mut self, generation: u64, result: Result<DailyRecord, String>) {
        if generation != self.generation {
            debug!("discarding stale revelation result");
            return;
        }
        self.in_flight = None;
        match result {
            Ok(record) => {
                self.load_clip(Clip::Revelation, record.revelation_audio.clone());
                // A regenerated day starts over: any old prayer clip is gone
                if let Some(t) = self.prayer.as_mut() {
                    t.unload();
                }
                self.record = Some(record);
            }
            Err(e) => {
                error!("revelation generation failed: {}", e);
                self.revelation_error = Some(messages::REVELATION_ERROR.to_string());
            }
        }
    }

    fn start_prayer(&mut self) {
        if self.in_flight.is_some() {
            warn!("generation already in flight, request ignored");
            return;
        }
        let Some(record) = self.record.clone() else {
            warn!("prayer requested with no revelation for today");
            self.prayer_error = Some(messages::PRAYER_ERROR.to_string());
            return;
        };

        self.generation += 1;
        self.in_flight = Some(Flight::Prayer);
        self.prayer_error = None;

        let generation = self.generation;
        let tx = self.cmd_tx.clone();
        let text = self.text.clone();
        let speech = self.speech.clone();
        let phase_tx = self.phase_tx.clone();

        let spawned = thread::Builder::new()
            .name("generate-prayer".into())
            .spawn(move || {
                let result = Orchestrator::new(text, speech)
                    .with_phase_observer(phase_tx)
                    .generate_prayer(&record)
                    .map_err(|e| e.to_string());
                let _ = tx.send(AppCommand::InternalPrayer { generation, result });
            });
        if let Err(e) = spawned {
            error!("failed to spawn generation worker: {}", e);
            self.in_flight = None;
            self.prayer_error = Some(messages::PRAYER_ERROR.to_string());
        }
    }

    fn finish_prayer(&mut self, generation: u64, result: Result<(String, Vec<u8>), String>) {
        if generation != self.generation {
            debug!("discarding stale prayer result");
            return;
        }
        self.in_flight = None;
        match result {
            Ok((text, audio)) => {
                if let Some(record) = self.record.as_mut() {
                    record.attach_prayer(text, audio.clone());
                }
                self.load_clip(Clip::Prayer, audio);
            }
            Err(e) => {
                error!("prayer generation failed: {}", e);
                self.prayer_error = Some(messages::PRAYER_ERROR.to_string());
            }
        }
    }

    // =========================================================================
    // Playback
    // =========================================================================

    fn transport_mut(&mut self, clip: Clip) -> Option<&mut ClipTransport> {
        match clip {
            Clip::Revelation => self.revelation.as_mut(),
            Clip::Prayer => self.prayer.as_mut(),
        }
    }

    /// Decode a clip's PCM and load it into its transport.
    ///
    /// A decode failure is logged and leaves the clip unloaded; the player
    /// controls for it stay inert.
    fn load_clip(&mut self, clip: Clip, pcm: Vec<u8>) {
        let buffer = match decode_pcm16(&pcm, SAMPLE_RATE, CHANNELS) {
            Ok(buffer) => buffer,
            Err(e) => {
                error!("could not decode {} audio: {}", clip, e);
                return;
            }
        };
        if let Some(t) = self.transport_mut(clip) {
            t.load(buffer);
        }
    }

    fn play_clip(&mut self, clip: Clip) {
        let (target, other) = match clip {
            Clip::Revelation => (&mut self.revelation, &mut self.prayer),
            Clip::Prayer => (&mut self.prayer, &mut self.revelation),
        };
        let Some(target) = target.as_mut() else {
            debug!("play {} with no audio output", clip);
            return;
        };
        if let Err(e) = start_exclusive(target, other.as_mut()) {
            error!("playback failed for {}: {}", clip, e);
        }
    }

    // =========================================================================
    // Export / share
    // =========================================================================

    fn export_clip(&mut self, clip: Clip, path: &std::path::Path) {
        let Some(pcm) = self.record.as_ref().and_then(|r| r.audio(clip)) else {
            warn!("export {} with no audio", clip);
            return;
        };
        match share::export_wav(pcm, path) {
            Ok(()) => info!("exported {} to {:?}", clip, path),
            Err(e) => error!("export failed: {}", e),
        }
    }

    fn share_clip(&mut self, clip: Clip) {
        let Some(record) = self.record.as_ref() else {
            warn!("share {} with no record", clip);
            return;
        };
        let Some(text) = record.text(clip) else {
            warn!("share {} with no text", clip);
            return;
        };
        let text = text.to_string();

        // Export the WAV for the handoff; a failed export falls back to the
        // text-only share path.
        let wav_path = record.audio(clip).and_then(|pcm| {
            let path = std::env::temp_dir().join(format!("versicle-{}.wav", clip));
            match share::export_wav(pcm, &path) {
                Ok(()) => Some(path),
                Err(e) => {
                    warn!("could not export {} for sharing: {}", clip, e);
                    None
                }
            }
        });
        share::share(&text, wav_path.as_deref());
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    fn drain_phases(&mut self) {
        while let Ok(phase) = self.phase_rx.try_recv() {
            self.phase = phase;
        }
    }

    fn clip_status(transport: &Option<ClipTransport>) -> ClipStatus {
        match transport {
            Some(t) => ClipStatus {
                loaded: t.has_clip(),
                state: t.state(),
                elapsed: t.elapsed(),
                total: t.total_duration(),
            },
            None => ClipStatus::default(),
        }
    }

    fn refresh_snapshot(&mut self) {
        let mut state = self.shared_state.lock().unwrap_or_else(|e| e.into_inner());
        state.phase = self.phase;
        state.is_generating = self.in_flight.is_some();
        state.record = self.record.as_ref().map(RecordSummary::from);
        state.revelation = Self::clip_status(&self.revelation);
        state.prayer = Self::clip_status(&self.prayer);
        state.revelation_error = self.revelation_error.clone();
        state.prayer_error = self.prayer_error.clone();
        state.status_text = if self.in_flight.is_some() {
            self.phase.to_string().into()
        } else {
            "Ready".into()
        };
    }
}

/// Start `target`, pausing `other` first so only one clip is audible at a
/// time. The transports themselves stay independent; exclusivity is a
/// controller policy.
fn start_exclusive<S: AudioSink>(
    target: &mut Transport<S>,
    other: Option<&mut Transport<S>>,
) -> versicle::error::Result<()> {
    if let Some(other) = other {
        other.pause();
    }
    target.play()
}

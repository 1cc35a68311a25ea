//! Generation orchestrator
//!
//! Sequences the two dependent AI calls (text, then speech for that text)
//! and persists the combined result keyed by today's date. The two steps
//! never run in parallel; the speech input is the text output.

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, error, info};

use crate::data::records::RecordStore;
use crate::data::types::DailyRecord;
use crate::error::Result;
use crate::providers::{SpeechSynthesizer, TextGenerator};

use super::prompt::{prayer_prompt, revelation_prompt};
use super::themes::resolve_theme;

/// Phase of a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    GeneratingText,
    GeneratingAudio,
    Ready,
    Failed,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationPhase::Idle => write!(f, "Idle"),
            GenerationPhase::GeneratingText => write!(f, "Generating text"),
            GenerationPhase::GeneratingAudio => write!(f, "Generating audio"),
            GenerationPhase::Ready => write!(f, "Ready"),
            GenerationPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Two-step text-then-audio generation pipeline.
///
/// Retry-idempotent: after a failure, calling again re-runs both steps
/// from scratch; there is no partial resume, and a text result without
/// audio is discarded rather than persisted.
pub struct Orchestrator {
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    phase: GenerationPhase,
    /// Optional phase observer (the controller mirrors this into the UI)
    phase_tx: Option<Sender<GenerationPhase>>,
}

impl Orchestrator {
    pub fn new(text: Arc<dyn TextGenerator>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            text,
            speech,
            phase: GenerationPhase::Idle,
            phase_tx: None,
        }
    }

    /// Attach a channel that receives every phase transition
    pub fn with_phase_observer(mut self, tx: Sender<GenerationPhase>) -> Self {
        self.phase_tx = Some(tx);
        self
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    fn transition(&mut self, to: GenerationPhase) {
        debug!("generation phase {} -> {}", self.phase, to);
        self.phase = to;
        if let Some(tx) = &self.phase_tx {
            let _ = tx.send(to);
        }
    }

    /// Generate today's personalized message and persist it.
    ///
    /// The sentinel theme is resolved to a concrete catalog theme before
    /// the prompt is built. On success the assembled record is stored
    /// under today's date key (overwriting a same-day record) and the
    /// orchestrator is Ready. Any failure leaves the store untouched.
    pub fn generate_revelation(
        &mut self,
        store: &mut RecordStore,
        name: &str,
        theme: &str,
    ) -> Result<DailyRecord> {
        let theme = resolve_theme(theme);
        info!("generating revelation for theme {:?}", theme);

        match self.run_revelation(store, name, &theme) {
            Ok(record) => {
                self.transition(GenerationPhase::Ready);
                Ok(record)
            }
            Err(e) => {
                error!("revelation generation failed: {}", e);
                self.transition(GenerationPhase::Failed);
                Err(e)
            }
        }
    }

    fn run_revelation(
        &mut self,
        store: &mut RecordStore,
        name: &str,
        theme: &str,
    ) -> Result<DailyRecord> {
        self.transition(GenerationPhase::GeneratingText);
        let text = self.text.generate_text(&revelation_prompt(name, theme))?;

        self.transition(GenerationPhase::GeneratingAudio);
        let audio = self.speech.synthesize(&text)?;

        let record = DailyRecord {
            date_key: RecordStore::today_key(),
            person_name: name.to_string(),
            theme: theme.to_string(),
            revelation_text: text,
            revelation_audio: audio,
            prayer_text: None,
            prayer_audio: None,
        };
        store.put(record.clone());
        store.save()?;
        Ok(record)
    }

    /// Generate a prayer continuing an existing record's message.
    ///
    /// Requires a Ready revelation (the record). Returns the prayer text
    /// and audio for the caller to attach in memory; this flow does not
    /// persist.
    pub fn generate_prayer(&mut self, record: &DailyRecord) -> Result<(String, Vec<u8>)> {
        info!("generating prayer for {}", record.date_key);

        match self.run_prayer(record) {
            Ok(result) => {
                self.transition(GenerationPhase::Ready);
                Ok(result)
            }
            Err(e) => {
                error!("prayer generation failed: {}", e);
                self.transition(GenerationPhase::Failed);
                Err(e)
            }
        }
    }

    fn run_prayer(&mut self, record: &DailyRecord) -> Result<(String, Vec<u8>)> {
        self.transition(GenerationPhase::GeneratingText);
        let prompt = prayer_prompt(&record.person_name, &record.theme);
        let text = self.text.generate_text(&prompt)?;

        self.transition(GenerationPhase::GeneratingAudio);
        let audio = self.speech.synthesize(&text)?;

        Ok((text, audio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::generate::themes::SURPRISE_THEME;
    use std::env::temp_dir;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> (RecordStore, PathBuf) {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = temp_dir().join(format!("versicle_orch_{}.json", id));
        let _ = std::fs::remove_file(&path);
        (RecordStore::load_from(&path).unwrap(), path)
    }

    /// Text provider that records prompts and can be told to fail
    struct MockText {
        fail: bool,
        prompts: Mutex<Vec<String>>,
    }

    impl MockText {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl TextGenerator for MockText {
        fn name(&self) -> &'static str {
            "mock-text"
        }

        fn generate_text(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(AppError::Generation("text service down".into()))
            } else {
                Ok("Be of good courage today.".to_string())
            }
        }
    }

    /// Speech provider with a call counter and a failure switch
    struct MockSpeech {
        fail: bool,
        calls: AtomicU32,
    }

    impl MockSpeech {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                calls: AtomicU32::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SpeechSynthesizer for MockSpeech {
        fn name(&self) -> &'static str {
            "mock-speech"
        }

        fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::Generation("no audio payload".into()))
            } else {
                Ok(vec![0u8; 480])
            }
        }
    }

    fn record() -> DailyRecord {
        DailyRecord {
            date_key: "2026-08-07".to_string(),
            person_name: "Ana".to_string(),
            theme: "Hope".to_string(),
            revelation_text: "Existing message.".to_string(),
            revelation_audio: vec![0u8; 4],
            prayer_text: None,
            prayer_audio: None,
        }
    }

    #[test]
    fn success_persists_record_and_reaches_ready() {
        let (mut store, path) = temp_store();
        let mut orch = Orchestrator::new(MockText::ok(), MockSpeech::ok());

        let rec = orch
            .generate_revelation(&mut store, "Ana", "Hope")
            .unwrap();
        assert_eq!(orch.phase(), GenerationPhase::Ready);
        assert_eq!(rec.theme, "Hope");
        assert_eq!(rec.date_key, RecordStore::today_key());

        // Persisted: a fresh load sees it
        let reloaded = RecordStore::load_from(&path).unwrap();
        assert!(reloaded.today().is_some());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn speech_failure_persists_nothing() {
        let (mut store, path) = temp_store();
        let text = MockText::ok();
        let mut orch = Orchestrator::new(text.clone(), MockSpeech::failing());

        let result = orch.generate_revelation(&mut store, "Ana", "Hope");
        assert!(result.is_err());
        assert_eq!(orch.phase(), GenerationPhase::Failed);
        assert_eq!(text.calls(), 1); // text step did run

        // No partial write
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn text_failure_never_calls_speech() {
        let (mut store, _path) = temp_store();
        let speech = MockSpeech::ok();
        let mut orch = Orchestrator::new(MockText::failing(), speech.clone());

        let result = orch.generate_revelation(&mut store, "Ana", "Hope");
        assert!(result.is_err());
        assert_eq!(orch.phase(), GenerationPhase::Failed);
        assert_eq!(speech.calls(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn retry_after_failure_reruns_both_steps() {
        let (mut store, path) = temp_store();
        let text = MockText::ok();
        let speech_down = MockSpeech::failing();
        let mut orch = Orchestrator::new(text.clone(), speech_down);

        assert!(orch.generate_revelation(&mut store, "Ana", "Hope").is_err());
        assert_eq!(orch.phase(), GenerationPhase::Failed);

        // Service recovers; a new orchestrator run starts from scratch
        let speech_up = MockSpeech::ok();
        let mut orch = Orchestrator::new(text.clone(), speech_up.clone());
        assert!(orch.generate_revelation(&mut store, "Ana", "Hope").is_ok());
        assert_eq!(orch.phase(), GenerationPhase::Ready);
        assert_eq!(text.calls(), 2);
        assert_eq!(speech_up.calls(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn sentinel_never_reaches_the_prompt() {
        let (mut store, path) = temp_store();
        let text = MockText::ok();
        let mut orch = Orchestrator::new(text.clone(), MockSpeech::ok());

        let rec = orch
            .generate_revelation(&mut store, "Ana", SURPRISE_THEME)
            .unwrap();

        let prompts = text.prompts.lock().unwrap();
        assert!(!prompts[0].contains(SURPRISE_THEME));
        assert!(prompts[0].contains(&rec.theme));
        assert_ne!(rec.theme, SURPRISE_THEME);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn phase_observer_sees_the_full_sequence() {
        let (mut store, path) = temp_store();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut orch = Orchestrator::new(MockText::ok(), MockSpeech::ok()).with_phase_observer(tx);

        orch.generate_revelation(&mut store, "Ana", "Hope").unwrap();

        let phases: Vec<GenerationPhase> = rx.try_iter().collect();
        assert_eq!(
            phases,
            vec![
                GenerationPhase::GeneratingText,
                GenerationPhase::GeneratingAudio,
                GenerationPhase::Ready,
            ]
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn prayer_uses_record_theme_and_does_not_persist() {
        let (mut store, path) = temp_store();
        let text = MockText::ok();
        let mut orch = Orchestrator::new(text.clone(), MockSpeech::ok());

        let rec = record();
        let (prayer_text, prayer_audio) = orch.generate_prayer(&rec).unwrap();
        assert!(!prayer_text.is_empty());
        assert!(!prayer_audio.is_empty());
        assert_eq!(orch.phase(), GenerationPhase::Ready);

        let prompts = text.prompts.lock().unwrap();
        assert!(prompts[0].contains("Ana"));
        assert!(prompts[0].contains("Hope"));

        // This flow does not touch the store
        assert!(store.is_empty());
        assert!(!path.exists());
        let _ = store.save();
    }

    #[test]
    fn prayer_failure_reports_failed_phase() {
        let mut orch = Orchestrator::new(MockText::failing(), MockSpeech::ok());
        assert!(orch.generate_prayer(&record()).is_err());
        assert_eq!(orch.phase(), GenerationPhase::Failed);
    }
}

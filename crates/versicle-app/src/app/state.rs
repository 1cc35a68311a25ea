//! Shared application state and commands
//!
//! `AppCommand` is the command type sent by the frontend to the
//! controller. `AppSnapshot` is the shared state the frontend polls.

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use versicle::audio::TransportState;

use crate::data::types::{Clip, DailyRecord};
use crate::generate::GenerationPhase;

/// Commands sent by the frontend
pub enum AppCommand {
    /// Generate today's revelation
    Generate { name: String, theme: String },
    /// Generate a prayer continuing today's revelation
    GeneratePrayer,

    // Playback
    Play(Clip),
    Pause(Clip),
    SetVolume(f32),

    // Export / share
    ExportWav { clip: Clip, path: PathBuf },
    Share(Clip),
    CopyPaymentKey,

    // Shutdown the app
    Shutdown,

    // Internal: revelation generated on a worker thread (not sent by frontends)
    InternalGenerated {
        generation: u64,
        result: Result<DailyRecord, String>,
    },
    // Internal: prayer generated on a worker thread
    InternalPrayer {
        generation: u64,
        result: Result<(String, Vec<u8>), String>,
    },
}

/// Playback status of one clip
#[derive(Clone, Debug, Default)]
pub struct ClipStatus {
    /// Whether a decoded buffer is loaded (controls inert otherwise)
    pub loaded: bool,
    pub state: TransportState,
    pub elapsed: Duration,
    pub total: Duration,
}

/// Text-only view of today's record for the frontend
#[derive(Clone, Debug)]
pub struct RecordSummary {
    pub date_key: String,
    pub person_name: String,
    pub theme: String,
    pub revelation_text: String,
    pub prayer_text: Option<String>,
}

impl From<&DailyRecord> for RecordSummary {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date_key: record.date_key.clone(),
            person_name: record.person_name.clone(),
            theme: record.theme.clone(),
            revelation_text: record.revelation_text.clone(),
            prayer_text: record.prayer_text.clone(),
        }
    }
}

/// Snapshot of app state — shared between controller and frontend
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    /// Phase of the in-flight (or last) generation request
    pub phase: GenerationPhase,
    /// True while a generation request is in flight; the initiating
    /// control stays disabled
    pub is_generating: bool,
    pub record: Option<RecordSummary>,
    pub revelation: ClipStatus,
    pub prayer: ClipStatus,
    /// Generic user-facing error for the last revelation request
    pub revelation_error: Option<String>,
    /// Generic user-facing error for the last prayer request
    pub prayer_error: Option<String>,
    pub status_text: Cow<'static, str>,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self {
            phase: GenerationPhase::Idle,
            is_generating: false,
            record: None,
            revelation: ClipStatus::default(),
            prayer: ClipStatus::default(),
            revelation_error: None,
            prayer_error: None,
            status_text: Cow::Borrowed("Ready"),
        }
    }
}

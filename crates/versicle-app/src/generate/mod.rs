//! Generation pipeline
//!
//! Theme catalog, prompt building, and the two-step text-then-audio
//! orchestrator.

pub mod orchestrator;
pub mod prompt;
pub mod themes;

pub use orchestrator::{GenerationPhase, Orchestrator};
pub use themes::{resolve_theme, SURPRISE_THEME, THEME_CATALOG, VISIBLE_THEMES};

//! Generative-AI providers
//!
//! Text generation and speech synthesis capabilities behind trait seams,
//! with the Gemini API as the production implementation.

pub mod gemini;
pub mod traits;

pub use gemini::GeminiClient;
pub use traits::{SpeechSynthesizer, TextGenerator};

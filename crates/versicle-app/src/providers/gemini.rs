//! Gemini API provider
//!
//! Implements `TextGenerator` and `SpeechSynthesizer` against the Gemini
//! `generateContent` endpoint. Speech synthesis uses the TTS model with an
//! audio response modality; the payload arrives base64-encoded as raw
//! 16-bit little-endian mono PCM at 24 kHz.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::providers::{
    API_KEY_ENV, GEMINI_BASE_URL, SPEECH_MODEL, SPEECH_VOICE, TEXT_MODEL,
};
use crate::error::{AppError, Result};
use crate::network::HttpClient;

use super::traits::{SpeechSynthesizer, TextGenerator};

// =============================================================================
// Request types (serde)
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<ReqContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct ReqContent {
    parts: Vec<ReqPart>,
}

#[derive(Debug, Serialize)]
struct ReqPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
    #[serde(rename = "speechConfig")]
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
struct SpeechConfig {
    #[serde(rename = "voiceConfig")]
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
struct VoiceConfig {
    #[serde(rename = "prebuiltVoiceConfig")]
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
struct PrebuiltVoiceConfig {
    #[serde(rename = "voiceName")]
    voice_name: String,
}

impl GenerateRequest {
    fn text(prompt: &str) -> Self {
        Self {
            contents: vec![ReqContent {
                parts: vec![ReqPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        }
    }

    fn speech(text: &str, voice: &str) -> Self {
        Self {
            contents: vec![ReqContent {
                parts: vec![ReqPart {
                    text: text.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                },
            }),
        }
    }
}

// =============================================================================
// Response types (serde)
// =============================================================================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<RespContent>,
}

#[derive(Debug, Deserialize)]
struct RespContent {
    #[serde(default)]
    parts: Vec<RespPart>,
}

#[derive(Debug, Deserialize)]
struct RespPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(rename = "inlineData", default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[allow(dead_code)] // carried for Debug output; format is fixed by the model
    #[serde(rename = "mimeType", default)]
    mime_type: String,
    data: String,
}

/// Extract the first text part from a response
fn first_text(resp: &GenerateResponse) -> Option<&str> {
    resp.candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.text.as_deref())
}

/// Extract and decode the first inline audio payload from a response
fn first_audio(resp: &GenerateResponse) -> Result<Vec<u8>> {
    let inline = resp
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref())
        .ok_or_else(|| AppError::Generation("speech response carried no audio payload".into()))?;

    BASE64
        .decode(&inline.data)
        .map_err(|e| AppError::Generation(format!("invalid audio payload encoding: {}", e)))
}

// =============================================================================
// Client
// =============================================================================

/// Gemini API client implementing both provider capabilities
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Create a client with the API key from the environment
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| AppError::Config(format!("{} is not set", API_KEY_ENV)))?;
        if key.trim().is_empty() {
            return Err(AppError::Config(format!("{} is empty", API_KEY_ENV)));
        }
        Self::new(key)
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.http
            .post_json(&self.endpoint(model), request)
            .map_err(|e| AppError::Generation(format!("{} request failed: {}", model, e)))
    }
}

impl TextGenerator for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn generate_text(&self, prompt: &str) -> Result<String> {
        let resp = self.generate(TEXT_MODEL, &GenerateRequest::text(prompt))?;
        let text = first_text(&resp)
            .ok_or_else(|| AppError::Generation("text response carried no text".into()))?;
        Ok(text.to_string())
    }
}

impl SpeechSynthesizer for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let resp = self.generate(SPEECH_MODEL, &GenerateRequest::speech(text, SPEECH_VOICE))?;
        first_audio(&resp)
    }
}

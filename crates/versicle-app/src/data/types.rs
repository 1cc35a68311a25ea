//! Common data types for persistence
//!
//! The per-day record and its serde helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serde helper: `Vec<u8>` as a base64 string.
///
/// Raw PCM runs to ~2.8 MB per minute of audio; base64 keeps the JSON file
/// compact and readable next to a numeric-array encoding.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Serde helper: `Option<Vec<u8>>` as an optional base64 string
pub mod base64_bytes_opt {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&BASE64.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded {
            Some(s) => BASE64
                .decode(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Which of a record's two clips is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    Revelation,
    Prayer,
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clip::Revelation => write!(f, "revelation"),
            Clip::Prayer => write!(f, "prayer"),
        }
    }
}

/// One day's generated result.
///
/// Identity is `date_key` (the local calendar date); one record exists per
/// day and a same-day regeneration overwrites it. The prayer fields are
/// filled in memory after a prayer generation; persisting them is not part
/// of that flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    /// Local calendar date (`%Y-%m-%d`), the record's unique identity
    pub date_key: String,
    /// Name the message was personalized for
    pub person_name: String,
    /// Concrete theme the message was generated with (never the sentinel)
    pub theme: String,
    /// Generated message text
    pub revelation_text: String,
    /// Raw 16-bit LE mono PCM at 24 kHz
    #[serde(with = "base64_bytes")]
    pub revelation_audio: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prayer_text: Option<String>,
    #[serde(
        default,
        with = "base64_bytes_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub prayer_audio: Option<Vec<u8>>,
}

impl DailyRecord {
    /// Text of the given clip, if present
    pub fn text(&self, clip: Clip) -> Option<&str> {
        match clip {
            Clip::Revelation => Some(&self.revelation_text),
            Clip::Prayer => self.prayer_text.as_deref(),
        }
    }

    /// Raw PCM bytes of the given clip, if present
    pub fn audio(&self, clip: Clip) -> Option<&[u8]> {
        match clip {
            Clip::Revelation => Some(&self.revelation_audio),
            Clip::Prayer => self.prayer_audio.as_deref(),
        }
    }

    /// Attach a generated prayer to this record (in memory)
    pub fn attach_prayer(&mut self, text: String, audio: Vec<u8>) {
        self.prayer_text = Some(text);
        self.prayer_audio = Some(audio);
    }
}

//! Share surface
//!
//! WAV export, the share handoff with its text-only fallback, and the
//! clipboard write for the payment key. Share failures are logged and
//! never surfaced to the user.

use std::fs::File;
use std::path::Path;

use log::{info, warn};
use url::Url;

use versicle::audio::write_wav;
use versicle::config::audio::{BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE};

use crate::config::share::{MESSAGE_LINK_BASE, PAYMENT_KEY};
use crate::error::{AppError, Result};

/// Wrap a clip's raw PCM with the WAV header and write it to `path`.
pub fn export_wav(pcm: &[u8], path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    write_wav(&mut file, pcm, SAMPLE_RATE, CHANNELS, BITS_PER_SAMPLE)?;
    Ok(())
}

/// Build the pre-filled messaging link with URL-encoded text
pub fn message_link(text: &str) -> Result<String> {
    let url = Url::parse_with_params(MESSAGE_LINK_BASE, &[("text", text)])
        .map_err(|e| AppError::Config(format!("invalid share link: {}", e)))?;
    Ok(url.to_string())
}

/// Share a clip's text with its exported WAV file.
///
/// The WAV handoff to the system handler is attempted first; when it is
/// unavailable or fails, only the text path runs. The pre-filled
/// messaging link always opens with the URL-encoded text. Failures on
/// either path are logged, never surfaced.
pub fn share(text: &str, wav: Option<&Path>) {
    if let Some(path) = wav {
        match open::that(path) {
            Ok(()) => info!("handed {:?} to the system handler", path),
            Err(e) => warn!("file share unavailable, falling back to text: {}", e),
        }
    }

    match message_link(text) {
        Ok(link) => {
            if let Err(e) = open::that(&link) {
                warn!("could not open share link: {}", e);
            }
        }
        Err(e) => warn!("could not build share link: {}", e),
    }
}

/// Copy the fixed payment identifier to the system clipboard
pub fn copy_payment_key() -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| AppError::Config(format!("clipboard unavailable: {}", e)))?;
    clipboard
        .set_text(PAYMENT_KEY)
        .map_err(|e| AppError::Config(format!("clipboard write failed: {}", e)))?;
    Ok(())
}

//! Flattened transcript export. Renders the whole session as plain
//! text, one line per message, and writes it to the export directory
//! named after the account and the moment of export.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::SessionError;
use crate::identity::Identity;
use crate::tutor::Transcript;

/// Render every message as `[timestamp] role: content`. Messages that
/// were never stamped, like the seeded preamble, get a `-` in the
/// timestamp slot.
pub fn render(transcript: &Transcript) -> String {
    let mut out = String::new();
    for msg in transcript.iter() {
        let timestamp = msg
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "[{}] {}: {}\n",
            timestamp,
            msg.role.as_str(),
            msg.content
        ));
    }
    out
}

/// Write the rendered transcript to its final location and return
/// where it landed.
pub fn export_transcript(
    export_path: &str,
    identity: &Identity,
    transcript: &Transcript,
) -> Result<PathBuf, SessionError> {
    fs::create_dir_all(export_path).map_err(|e| SessionError::Persistence(e.to_string()))?;

    let filename = format!("{}-{}.log", identity.id, Utc::now().format("%Y%m%dT%H%M%SZ"));
    let location = PathBuf::from(export_path).join(filename);
    fs::write(&location, render(transcript))
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

    Ok(location)
}

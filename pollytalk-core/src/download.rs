//! Saving synthesized audio to disk

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::SpeechError;
use crate::voice::tts::types::AudioPayload;

/// `audio_<locale>_<timestamp>.mp3`, where the timestamp is an ISO-8601 UTC
/// instant with `:` and `.` replaced by `-` so it is safe on every
/// filesystem.
pub fn download_filename(locale_id: &str, now: DateTime<Utc>) -> String {
    let timestamp = now.format("%Y-%m-%dT%H-%M-%S-%3fZ");
    format!("audio_{locale_id}_{timestamp}.mp3")
}

/// Write the payload bytes unchanged to `dir/filename`.
pub async fn save_audio(
    payload: &AudioPayload,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, SpeechError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| SpeechError::Save {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(filename);
    tokio::fs::write(&path, &payload.mp3_data)
        .await
        .map_err(|source| SpeechError::Save {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), bytes = payload.len(), "saved audio");
    Ok(path)
}

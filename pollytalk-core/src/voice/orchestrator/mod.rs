//! Turns a [`SynthesisRequest`] into audible or downloadable output.
//!
//! Every call runs to completion or failure before returning. In word-by-word
//! mode each token is synthesized and fully played before the next synthesis
//! starts, so the output device never has two buffers in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use super::audio::AudioSink;
use super::tts::provider::TextToSpeech;
use super::tts::types::{AudioPayload, SynthesisRequest};
use crate::download::{download_filename, save_audio};
use crate::error::{SpeechError, SynthesisError, ValidationError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackMode {
    /// The whole text as one utterance
    #[default]
    Whole,
    /// One synthesis and playback per whitespace-delimited token
    WordByWord,
}

impl PlaybackMode {
    pub fn from_flag(word_by_word: bool) -> Self {
        if word_by_word {
            Self::WordByWord
        } else {
            Self::Whole
        }
    }
}

pub struct SpeechOrchestrator {
    tts: Arc<dyn TextToSpeech>,
    sink: Box<dyn AudioSink>,
    last: Option<AudioPayload>,
}

impl SpeechOrchestrator {
    pub fn new(tts: Arc<dyn TextToSpeech>, sink: Box<dyn AudioSink>) -> Self {
        Self {
            tts,
            sink,
            last: None,
        }
    }

    /// Most recent successfully synthesized payload, if any.
    pub fn last_payload(&self) -> Option<&AudioPayload> {
        self.last.as_ref()
    }

    /// One call to the synthesis endpoint. Never retried.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioPayload, SpeechError> {
        let params = request.params();
        debug!(
            provider = self.tts.name(),
            voice_id = params.voice_id,
            language_code = params.language_code,
            "synthesizing"
        );

        let mp3_data = self.tts.synthesize(&params).await?;
        if mp3_data.is_empty() {
            return Err(SynthesisError::NoAudioStream.into());
        }

        Ok(AudioPayload {
            mp3_data,
            locale_id: request.locale_id.clone(),
        })
    }

    /// Resolves once playback of `payload` has finished.
    pub async fn play(&self, payload: &AudioPayload, speed: f32) -> Result<(), SpeechError> {
        self.sink
            .play(payload, speed)
            .await
            .map_err(SpeechError::Playback)
    }

    pub async fn speak(
        &mut self,
        request: &SynthesisRequest,
        mode: PlaybackMode,
    ) -> Result<(), SpeechError> {
        validate(request)?;
        self.sink.ensure_available().map_err(SpeechError::Playback)?;
        info!(
            locale = %request.locale_id,
            voice = %request.voice,
            speed = request.speed,
            %mode,
            "speak"
        );

        match mode {
            PlaybackMode::Whole => self.synthesize_and_play(request).await,
            PlaybackMode::WordByWord => {
                let words = split_words(&request.text);
                let total = words.len();
                for (index, word) in words.into_iter().enumerate() {
                    debug!(index, total, word, "word-by-word step");
                    self.synthesize_and_play(&request.with_text(word)).await?;
                }
                Ok(())
            }
        }
    }

    async fn synthesize_and_play(&mut self, request: &SynthesisRequest) -> Result<(), SpeechError> {
        let payload = self.synthesize(request).await?;
        self.play(&payload, request.speed).await?;
        self.last = Some(payload);
        Ok(())
    }

    /// Synthesize the whole text and save it under `dir` as
    /// `audio_<locale>_<timestamp>.mp3`.
    pub async fn download(
        &mut self,
        request: &SynthesisRequest,
        dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, SpeechError> {
        validate(request)?;
        info!(locale = %request.locale_id, voice = %request.voice, "download");

        let payload = self.synthesize(request).await?;
        let filename = download_filename(&request.locale_id, now);
        let path = save_audio(&payload, dir, &filename).await?;
        self.last = Some(payload);
        Ok(path)
    }

    /// Save the last synthesized payload without another endpoint call.
    pub async fn save_last(&self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, SpeechError> {
        let Some(payload) = &self.last else {
            warn!("save requested before anything was synthesized");
            return Err(ValidationError::NoAudioYet.into());
        };

        let filename = download_filename(&payload.locale_id, now);
        save_audio(payload, dir, &filename).await
    }
}

fn validate(request: &SynthesisRequest) -> Result<(), ValidationError> {
    if request.text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(())
}

/// Whitespace-delimited tokens, with no empty entries.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

#[cfg(test)]
mod tests;

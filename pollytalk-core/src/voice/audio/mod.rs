//! Audio output for synthesized speech

#[cfg(feature = "playback")]
pub mod decode;
#[cfg(feature = "playback")]
pub mod playback;

use anyhow::Result;
use async_trait::async_trait;

use super::tts::types::AudioPayload;

/// Something that can play an encoded payload to completion.
///
/// Output streams are tied to the thread that opened them, so the futures
/// here are not `Send`; everything runs on a single-threaded runtime.
#[async_trait(?Send)]
pub trait AudioSink {
    /// Resolves only once the whole payload has been played at `speed`.
    async fn play(&self, payload: &AudioPayload, speed: f32) -> Result<()>;

    /// Fails when nothing could ever be played, so callers can stop before
    /// paying for a synthesis.
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Sink for builds without an audio backend. Every play attempt fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSink;

#[async_trait(?Send)]
impl AudioSink for UnavailableSink {
    async fn play(&self, _payload: &AudioPayload, _speed: f32) -> Result<()> {
        self.ensure_available()
    }

    fn ensure_available(&self) -> Result<()> {
        anyhow::bail!("audio playback is not available in this build (enable the `playback` feature)")
    }
}

/// Default output for this build.
pub fn default_sink() -> Result<Box<dyn AudioSink>> {
    #[cfg(feature = "playback")]
    {
        Ok(Box::new(playback::AudioPlayer::new()?))
    }
    #[cfg(not(feature = "playback"))]
    {
        tracing::warn!("built without the playback feature, speech cannot be played");
        Ok(Box::new(UnavailableSink))
    }
}

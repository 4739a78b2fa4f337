use async_trait::async_trait;

use super::types::SynthesisParams;
use crate::error::SynthesisError;

/// Trait for text-to-speech providers
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Synthesize text to encoded audio bytes. An empty result means the
    /// endpoint returned no audio stream.
    async fn synthesize(&self, params: &SynthesisParams) -> Result<Vec<u8>, SynthesisError>;
}

//! AWS Polly text-to-speech implementation

use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_polly::config::Region;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, TextType, VoiceId};
use aws_sdk_polly::Client;
use tracing::debug;

use super::provider::TextToSpeech;
use super::types::SynthesisParams;
use crate::error::SynthesisError;
use crate::settings::config::PollySettings;

/// AWS Polly text-to-speech provider
pub struct AwsPolly {
    client: Client,
}

impl AwsPolly {
    /// Create a new AWS Polly client from the default credential chain
    pub async fn new(config: &PollySettings) -> Self {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        aws_config_loader = aws_config_loader.region(Region::new(config.region.clone()));

        let aws_config = aws_config_loader.load().await;
        Self {
            client: Client::new(&aws_config),
        }
    }
}

#[async_trait]
impl TextToSpeech for AwsPolly {
    fn name(&self) -> &'static str {
        "aws_polly"
    }

    async fn synthesize(&self, params: &SynthesisParams) -> Result<Vec<u8>, SynthesisError> {
        debug!(
            voice_id = params.voice_id,
            language_code = params.language_code,
            chars = params.text.chars().count(),
            "calling SynthesizeSpeech"
        );

        let response = self
            .client
            .synthesize_speech()
            .engine(Engine::from(params.engine))
            .language_code(LanguageCode::from(params.language_code))
            .output_format(OutputFormat::from(params.output_format))
            .sample_rate(params.sample_rate)
            .text(&params.text)
            .text_type(TextType::from(params.text_type))
            .voice_id(VoiceId::from(params.voice_id))
            .send()
            .await
            .map_err(|e| SynthesisError::Request(anyhow!("{}", DisplayErrorContext(&e))))?;

        let bytes = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| SynthesisError::Stream(anyhow!(e)))?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }
}

use serde::{Deserialize, Serialize};

use crate::voice::resolver::{self, VoiceGender};

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

/// Encoded mp3 audio returned from synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub mp3_data: Vec<u8>,
    pub locale_id: String,
}

impl AudioPayload {
    pub fn len(&self) -> usize {
        self.mp3_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mp3_data.is_empty()
    }
}

/// One user action worth of input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub locale_id: String,
    pub voice: VoiceGender,
    pub speed: f32,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        locale_id: impl Into<String>,
        voice: VoiceGender,
        speed: f32,
    ) -> Self {
        Self {
            text: text.into(),
            locale_id: locale_id.into(),
            voice,
            speed: clamp_speed(speed),
        }
    }

    pub fn prefer_female_voice(&self) -> bool {
        self.voice == VoiceGender::Female
    }

    /// Same settings, different text. Used for word-by-word playback.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Endpoint parameters for this request. Voice and language come from
    /// the resolver, everything else is fixed.
    pub fn params(&self) -> SynthesisParams {
        SynthesisParams {
            engine: "standard",
            language_code: resolver::resolve_language_code(&self.locale_id),
            output_format: "mp3",
            sample_rate: "24000",
            text: self.text.clone(),
            text_type: "text",
            voice_id: resolver::resolve_voice(&self.locale_id, self.voice),
        }
    }
}

/// Non-finite speeds become 1.0.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        1.0
    }
}

/// Exactly what is sent to the synthesis endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisParams {
    pub engine: &'static str,
    pub language_code: &'static str,
    pub output_format: &'static str,
    pub sample_rate: &'static str,
    pub text: String,
    pub text_type: &'static str,
    pub voice_id: &'static str,
}

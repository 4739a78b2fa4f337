use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::voice::orchestrator::PlaybackMode;
use crate::voice::resolver::{VoiceGender, DEFAULT_LOCALE};
use crate::voice::tts::types::clamp_speed;

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_speed() -> f32 {
    1.0
}

/// Where and how to reach Polly. Credentials always come from the AWS
/// credential chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for PollySettings {
    fn default() -> Self {
        Self {
            profile: None,
            region: default_region(),
        }
    }
}

/// Persisted form state plus endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub voice: VoiceGender,

    #[serde(default = "default_speed")]
    pub speed: f32,

    #[serde(default)]
    pub word_by_word: bool,

    /// Directory for downloaded audio. Defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub polly: PollySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            voice: VoiceGender::default(),
            speed: default_speed(),
            word_by_word: false,
            output_dir: None,
            polly: PollySettings::default(),
        }
    }
}

impl Settings {
    pub fn playback_mode(&self) -> PlaybackMode {
        PlaybackMode::from_flag(self.word_by_word)
    }

    pub fn speed(&self) -> f32 {
        clamp_speed(self.speed)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

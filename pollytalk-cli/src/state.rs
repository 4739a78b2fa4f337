use pollytalk_core::settings::Settings;
use pollytalk_core::voice::resolver::{self, VoiceGender};
use pollytalk_core::voice::tts::types::clamp_speed;
use pollytalk_core::{PlaybackMode, SynthesisRequest};
use std::path::PathBuf;

/// Everything the form holds between actions
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub text: String,
    pub locale: String,
    pub voice: VoiceGender,
    pub speed: f32,
    pub word_by_word: bool,
    pub output_dir: PathBuf,
}

impl State {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut state = Self {
            text: String::new(),
            locale: settings.locale.clone(),
            voice: settings.voice,
            speed: settings.speed(),
            word_by_word: settings.word_by_word,
            output_dir: settings.output_dir(),
        };
        state.voice = resolver::effective_gender(&state.locale, state.voice);
        state
    }

    /// Switching to a single-voice locale resets the voice to female.
    pub fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_string();
        self.voice = resolver::effective_gender(&self.locale, self.voice);
    }

    /// Returns false when the locale only has one voice and the toggle is
    /// locked.
    pub fn set_voice(&mut self, voice: VoiceGender) -> bool {
        if resolver::has_single_voice(&self.locale) {
            self.voice = VoiceGender::Female;
            return voice == VoiceGender::Female;
        }
        self.voice = voice;
        true
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    pub fn mode(&self) -> PlaybackMode {
        PlaybackMode::from_flag(self.word_by_word)
    }

    pub fn request(&self) -> SynthesisRequest {
        SynthesisRequest::new(self.text.clone(), self.locale.clone(), self.voice, self.speed)
    }

    /// Copy the form values back into settings for persisting.
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.locale = self.locale.clone();
        settings.voice = self.voice;
        settings.speed = self.speed;
        settings.word_by_word = self.word_by_word;
        settings.output_dir = Some(self.output_dir.clone());
    }

    pub fn summary(&self) -> String {
        let single = if resolver::has_single_voice(&self.locale) {
            " (single voice)"
        } else {
            ""
        };
        format!(
            "locale={} voice={}{} speed={:.1}x word-by-word={} output={}",
            self.locale,
            self.voice,
            single,
            self.speed,
            if self.word_by_word { "on" } else { "off" },
            self.output_dir.display()
        )
    }
}

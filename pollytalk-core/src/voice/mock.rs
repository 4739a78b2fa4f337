use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::audio::AudioSink;
use super::tts::provider::TextToSpeech;
use super::tts::types::{AudioPayload, SynthesisParams};
use crate::error::SynthesisError;

/// Everything the mocks observed, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Synthesize { text: String, voice_id: String },
    PlayStarted { bytes: Vec<u8>, speed: f32 },
    PlayFinished,
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Echo the text back as the audio bytes
    #[default]
    Echo,
    /// Succeed but return an empty audio stream
    NoAudio,
    /// Fail the call outright
    Fail,
    /// Fail only for this exact text
    FailOn(String),
}

pub struct MockTts {
    pub behavior: MockBehavior,
    pub log: EventLog,
}

impl MockTts {
    pub fn new(behavior: MockBehavior, log: EventLog) -> Self {
        Self { behavior, log }
    }
}

#[async_trait]
impl TextToSpeech for MockTts {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(&self, params: &SynthesisParams) -> Result<Vec<u8>, SynthesisError> {
        self.log.lock().unwrap().push(Event::Synthesize {
            text: params.text.clone(),
            voice_id: params.voice_id.to_string(),
        });
        tokio::task::yield_now().await;

        match &self.behavior {
            MockBehavior::Echo => Ok(params.text.as_bytes().to_vec()),
            MockBehavior::NoAudio => Ok(Vec::new()),
            MockBehavior::Fail => Err(SynthesisError::Request(anyhow::anyhow!("access denied"))),
            MockBehavior::FailOn(text) if *text == params.text => {
                Err(SynthesisError::Request(anyhow::anyhow!("throttled")))
            }
            MockBehavior::FailOn(_) => Ok(params.text.as_bytes().to_vec()),
        }
    }
}

pub struct MockSink {
    pub log: EventLog,
}

#[async_trait(?Send)]
impl AudioSink for MockSink {
    async fn play(&self, payload: &AudioPayload, speed: f32) -> Result<()> {
        self.log.lock().unwrap().push(Event::PlayStarted {
            bytes: payload.mp3_data.clone(),
            speed,
        });
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        self.log.lock().unwrap().push(Event::PlayFinished);
        Ok(())
    }
}

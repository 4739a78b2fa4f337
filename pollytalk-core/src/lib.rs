pub mod download;
pub mod error;
pub mod notice;
pub mod settings;
pub mod upload;
pub mod voice;

// Public library API - the CLI only reaches for these, everything else is
// public as well for anyone embedding the orchestrator elsewhere.
pub use error::{SpeechError, SynthesisError, UnsupportedFormat, ValidationError};
pub use notice::{Action, Notice};
pub use settings::{Settings, SettingsManager};
pub use voice::orchestrator::{PlaybackMode, SpeechOrchestrator};
pub use voice::resolver::VoiceGender;
pub use voice::tts::types::{AudioPayload, SynthesisRequest};

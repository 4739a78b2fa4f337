use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no text to synthesize")]
    EmptyText,

    #[error("nothing has been synthesized yet")]
    NoAudioYet,
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("no audio stream returned")]
    NoAudioStream,

    #[error("synthesis request failed: {0:#}")]
    Request(anyhow::Error),

    #[error("failed to read audio stream: {0:#}")]
    Stream(anyhow::Error),
}

/// Document formats that are recognised but never parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedFormat {
    #[error("PDF files are not supported")]
    Pdf,

    #[error("Word documents are not supported")]
    Word,

    #[error("unsupported file format: {name}")]
    Other { name: String },
}

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error("failed to read {path:?}")]
    UploadIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("playback failed: {0:#}")]
    Playback(anyhow::Error),

    #[error("failed to save audio to {path:?}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpeechError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

//! User-facing notifications for failed actions.
//!
//! Keys match the string table used by the UI layer; only English strings
//! are bundled here.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::error::{SpeechError, UnsupportedFormat, ValidationError};

/// The user action that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Speak,
    Download,
    SaveLast,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum NoticeKey {
    Error,
    NoTextError,
    PleaseEnterText,
    NoAudioYet,
    SpeechError,
    DownloadError,
    PdfNotSupported,
    WordNotSupported,
    UnsupportedFormat,
    UploadError,
}

impl NoticeKey {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn english(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::NoTextError => "No text",
            Self::PleaseEnterText => "Please enter some text to read.",
            Self::NoAudioYet => "Nothing has been generated yet. Read some text first.",
            Self::SpeechError => "Speech synthesis failed. Please try again.",
            Self::DownloadError => "Could not generate the audio file. Please try again.",
            Self::PdfNotSupported => "PDF files are not supported. Please upload a .txt or .md file.",
            Self::WordNotSupported => {
                "Word documents are not supported. Please upload a .txt or .md file."
            }
            Self::UnsupportedFormat => "Unsupported file format. Please upload a .txt or .md file.",
            Self::UploadError => "The file could not be read.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: NoticeKey,
    pub description: NoticeKey,
    pub destructive: bool,
}

impl Notice {
    /// Map a failed action to the notification shown to the user.
    pub fn for_failure(action: Action, error: &SpeechError) -> Self {
        let (title, description) = match error {
            SpeechError::Validation(ValidationError::EmptyText) => {
                (NoticeKey::NoTextError, NoticeKey::PleaseEnterText)
            }
            SpeechError::Validation(ValidationError::NoAudioYet) => {
                (NoticeKey::Error, NoticeKey::NoAudioYet)
            }
            SpeechError::UnsupportedFormat(UnsupportedFormat::Pdf) => {
                (NoticeKey::Error, NoticeKey::PdfNotSupported)
            }
            SpeechError::UnsupportedFormat(UnsupportedFormat::Word) => {
                (NoticeKey::Error, NoticeKey::WordNotSupported)
            }
            SpeechError::UnsupportedFormat(UnsupportedFormat::Other { .. }) => {
                (NoticeKey::Error, NoticeKey::UnsupportedFormat)
            }
            SpeechError::UploadIo { .. } => (NoticeKey::Error, NoticeKey::UploadError),
            SpeechError::Synthesis(_) | SpeechError::Playback(_) | SpeechError::Save { .. } => {
                match action {
                    Action::Speak => (NoticeKey::Error, NoticeKey::SpeechError),
                    Action::Download | Action::SaveLast => {
                        (NoticeKey::Error, NoticeKey::DownloadError)
                    }
                    Action::Upload => (NoticeKey::Error, NoticeKey::UploadError),
                }
            }
        };

        Self {
            title,
            description,
            destructive: true,
        }
    }

    pub fn title_text(&self) -> &'static str {
        self.title.english()
    }

    pub fn description_text(&self) -> &'static str {
        self.description.english()
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title_text(), self.description_text())
    }
}

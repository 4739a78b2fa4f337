//! User actions shared by one-shot subcommands and the interactive form.
//! Failures are logged, shown as a notice, and leave the caller's state alone.

use chrono::Utc;
use pollytalk_core::settings::Settings;
use pollytalk_core::upload;
use pollytalk_core::voice::audio::{self, AudioSink, UnavailableSink};
use pollytalk_core::voice::tts::aws_polly::AwsPolly;
use pollytalk_core::{
    Action, Notice, PlaybackMode, SpeechError, SpeechOrchestrator, SynthesisRequest,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

use crate::formatter::Formatter;

pub async fn build_orchestrator(settings: &Settings, with_playback: bool) -> SpeechOrchestrator {
    let tts = Arc::new(AwsPolly::new(&settings.polly).await);

    let sink: Box<dyn AudioSink> = if with_playback {
        match audio::default_sink() {
            Ok(sink) => sink,
            Err(e) => {
                warn!(error = ?e, "no audio output, playback disabled");
                Box::new(UnavailableSink)
            }
        }
    } else {
        Box::new(UnavailableSink)
    };

    SpeechOrchestrator::new(tts, sink)
}

fn report(formatter: &Formatter, action: Action, err: &SpeechError) {
    if err.is_validation() {
        warn!(%action, error = %err, "action rejected");
    } else {
        error!(%action, error = ?err, "action failed");
    }
    formatter.print_notice(&Notice::for_failure(action, err));
}

pub async fn speak(
    orchestrator: &mut SpeechOrchestrator,
    formatter: &Formatter,
    request: &SynthesisRequest,
    mode: PlaybackMode,
) -> Result<(), SpeechError> {
    let result = orchestrator.speak(request, mode).await;
    if let Err(e) = &result {
        report(formatter, Action::Speak, e);
    }
    result
}

pub async fn download(
    orchestrator: &mut SpeechOrchestrator,
    formatter: &Formatter,
    request: &SynthesisRequest,
    dir: &Path,
) -> Result<PathBuf, SpeechError> {
    match orchestrator.download(request, dir, Utc::now()).await {
        Ok(path) => {
            formatter.print_system(&format!("Saved {}", path.display()));
            Ok(path)
        }
        Err(e) => {
            report(formatter, Action::Download, &e);
            Err(e)
        }
    }
}

pub async fn save_last(
    orchestrator: &SpeechOrchestrator,
    formatter: &Formatter,
    dir: &Path,
) -> Result<PathBuf, SpeechError> {
    match orchestrator.save_last(dir, Utc::now()).await {
        Ok(path) => {
            formatter.print_system(&format!("Saved {}", path.display()));
            Ok(path)
        }
        Err(e) => {
            report(formatter, Action::SaveLast, &e);
            Err(e)
        }
    }
}

pub async fn open(formatter: &Formatter, path: &Path) -> Result<String, SpeechError> {
    let result = upload::load_text(path).await;
    if let Err(e) = &result {
        report(formatter, Action::Upload, e);
    }
    result
}

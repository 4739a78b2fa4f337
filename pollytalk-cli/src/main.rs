use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pollytalk_core::settings::{Settings, SettingsManager};
use pollytalk_core::voice::resolver::{self, VoiceGender};
use pollytalk_core::voice::tts::types::{MAX_SPEED, MIN_SPEED};
use pollytalk_core::{PlaybackMode, SynthesisRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod actions;
mod commands;
mod formatter;
mod interactive_app;
mod state;
mod voices;

use crate::formatter::Formatter;
use crate::interactive_app::InteractiveApp;

#[derive(Parser, Debug)]
#[command(name = "pollytalk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read text aloud or save it as mp3 with AWS Polly")]
struct Args {
    /// Load settings from a specific file instead of ~/.pollytalk/settings.toml
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize text and play it
    Speak {
        #[command(flatten)]
        input: InputArgs,

        /// Synthesize and play one word at a time
        #[arg(long, overrides_with = "whole")]
        word_by_word: bool,

        /// Play the text as one utterance, even if word-by-word is saved
        #[arg(long, overrides_with = "word_by_word")]
        whole: bool,
    },

    /// Synthesize text into an mp3 file
    Download {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for the audio file
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// List supported locales and their voices
    Voices {
        #[arg(long)]
        json: bool,
    },

    /// Print the effective settings file
    Settings,

    /// Interactive form (default)
    Interactive,
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Text to read
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read the text from a .txt or .md file
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Locale such as en-US or ja-JP
    #[arg(long)]
    locale: Option<String>,

    /// female or male
    #[arg(long)]
    voice: Option<VoiceGender>,

    /// Playback speed between 0.5 and 2.0
    #[arg(long, value_parser = parse_speed)]
    speed: Option<f32>,
}

fn parse_speed(value: &str) -> Result<f32, String> {
    let speed: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(format!("speed must be between {MIN_SPEED} and {MAX_SPEED}"));
    }
    Ok(speed)
}

fn main() -> Result<ExitCode> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<ExitCode> {
    let args = Args::parse();
    info!("CLI startup: command={:?}", args.command);

    let settings_manager = match args.settings {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };

    match args.command.unwrap_or(Command::Interactive) {
        Command::Speak {
            input,
            word_by_word,
            whole,
        } => {
            let saved = settings_manager.settings().playback_mode();
            let mode = speak_mode(saved, word_by_word, whole);
            run_speak(&settings_manager, input, mode).await
        }
        Command::Download { input, output_dir } => {
            run_download(&settings_manager, input, output_dir).await
        }
        Command::Voices { json } => {
            if json {
                println!("{}", voices::json()?);
            } else {
                println!("{}", voices::table());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings => {
            println!("# {}", settings_manager.path().display());
            println!(
                "{}",
                toml::to_string_pretty(&settings_manager.settings())
                    .context("Failed to serialize settings")?
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Interactive => {
            let mut app = InteractiveApp::new(settings_manager).await?;
            app.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Flags override the saved settings for this invocation only.
async fn build_request(
    settings: &Settings,
    input: InputArgs,
    formatter: &Formatter,
) -> Option<SynthesisRequest> {
    let locale = input.locale.unwrap_or_else(|| settings.locale.clone());
    if !resolver::is_supported(&locale) {
        formatter.print_warning(&format!(
            "locale {locale} is not supported, using {} voices",
            resolver::DEFAULT_LOCALE
        ));
    }

    let requested = input.voice.unwrap_or(settings.voice);
    let voice = resolver::effective_gender(&locale, requested);
    if voice != requested {
        formatter.print_warning(&format!("{locale} only has one voice"));
    }

    let text = match (input.text, input.file) {
        (Some(text), _) => text,
        (None, Some(path)) => actions::open(formatter, &path).await.ok()?,
        (None, None) => String::new(),
    };

    let speed = input.speed.unwrap_or_else(|| settings.speed());
    Some(SynthesisRequest::new(text, locale, voice, speed))
}

/// The later of `--word-by-word` / `--whole` wins; neither keeps the saved mode.
fn speak_mode(saved: PlaybackMode, word_by_word: bool, whole: bool) -> PlaybackMode {
    match (word_by_word, whole) {
        (true, _) => PlaybackMode::WordByWord,
        (_, true) => PlaybackMode::Whole,
        _ => saved,
    }
}

fn exit_code<T, E>(result: Result<T, E>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run_speak(
    settings_manager: &SettingsManager,
    input: InputArgs,
    mode: PlaybackMode,
) -> Result<ExitCode> {
    let settings = settings_manager.settings();
    let formatter = Formatter::detect();
    let Some(request) = build_request(&settings, input, &formatter).await else {
        return Ok(ExitCode::FAILURE);
    };

    let mut orchestrator = actions::build_orchestrator(&settings, true).await;
    Ok(exit_code(
        actions::speak(&mut orchestrator, &formatter, &request, mode).await,
    ))
}

async fn run_download(
    settings_manager: &SettingsManager,
    input: InputArgs,
    output_dir: Option<PathBuf>,
) -> Result<ExitCode> {
    let settings = settings_manager.settings();
    let formatter = Formatter::detect();
    let Some(request) = build_request(&settings, input, &formatter).await else {
        return Ok(ExitCode::FAILURE);
    };

    let dir = output_dir.unwrap_or_else(|| settings.output_dir());
    let mut orchestrator = actions::build_orchestrator(&settings, false).await;
    Ok(exit_code(
        actions::download(&mut orchestrator, &formatter, &request, &dir).await,
    ))
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".pollytalk").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("pollytalk.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}

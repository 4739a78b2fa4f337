use pollytalk_core::voice::resolver::{self, VoiceGender};
use pollytalk_core::voice::tts::types::{MAX_SPEED, MIN_SPEED};
use std::path::PathBuf;

use crate::state::State;

pub const HELP: &str = "\
Type text and press enter to read it aloud.
  /speak            read the current text again
  /text             show the current text
  /open <path>      load text from a .txt or .md file
  /locale [id]      show or set the locale (see /voices)
  /voice <female|male>
  /speed <0.5-2.0>
  /words [on|off]   toggle word-by-word playback
  /output <dir>     directory for downloads
  /download         synthesize the current text to an mp3 file
  /save-last        save the last synthesized audio without a new request
  /voices           list supported locales
  /settings         show the current form
  /save             persist the current form as defaults
  /quit";

/// Commands that need the orchestrator or the filesystem
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    Speak,
    Open(PathBuf),
    Download,
    SaveLast,
    SaveSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocalCommandResult {
    Handled {
        msg: String,
    },

    /// Needs async work from the app
    Deferred(Deferred),

    /// A command to exit the app was detected
    Exit,

    /// Not a command; the line is text to read.
    Unhandled,
}

fn handled(msg: impl Into<String>) -> LocalCommandResult {
    LocalCommandResult::Handled { msg: msg.into() }
}

pub fn handle_local_command(state: &mut State, input: &str) -> LocalCommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return LocalCommandResult::Unhandled;
    }

    let (command, arg) = match input.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (input, ""),
    };

    match command {
        "/help" => handled(HELP),
        "/speak" => LocalCommandResult::Deferred(Deferred::Speak),
        "/text" => {
            if state.text.is_empty() {
                handled("(no text)")
            } else {
                handled(state.text.clone())
            }
        }
        "/open" if arg.is_empty() => handled("Usage: /open <path>"),
        "/open" => LocalCommandResult::Deferred(Deferred::Open(PathBuf::from(arg))),
        "/locale" if arg.is_empty() => handled(format!("Locale: {}", state.locale)),
        "/locale" => {
            let known = resolver::is_supported(arg);
            state.set_locale(arg);
            if known {
                handled(format!("Locale: {} ({})", state.locale, state.voice))
            } else {
                handled(format!(
                    "Locale: {} is not supported, {} voices will be used",
                    state.locale,
                    resolver::DEFAULT_LOCALE
                ))
            }
        }
        "/voice" => match arg.parse::<VoiceGender>() {
            Ok(voice) => {
                if state.set_voice(voice) {
                    handled(format!("Voice: {}", state.voice))
                } else {
                    handled(format!("{} only has one voice", state.locale))
                }
            }
            Err(_) => handled("Usage: /voice <female|male>"),
        },
        "/speed" => match arg.parse::<f32>() {
            Ok(speed) if (MIN_SPEED..=MAX_SPEED).contains(&speed) => {
                state.set_speed(speed);
                handled(format!("Speed: {:.1}x", state.speed))
            }
            _ => handled(format!("Usage: /speed <{MIN_SPEED}-{MAX_SPEED}>")),
        },
        "/words" => {
            state.word_by_word = match arg {
                "" => !state.word_by_word,
                "on" => true,
                "off" => false,
                _ => return handled("Usage: /words [on|off]"),
            };
            handled(format!(
                "Word-by-word: {}",
                if state.word_by_word { "on" } else { "off" }
            ))
        }
        "/output" if arg.is_empty() => {
            handled(format!("Output: {}", state.output_dir.display()))
        }
        "/output" => {
            state.output_dir = PathBuf::from(arg);
            handled(format!("Output: {}", state.output_dir.display()))
        }
        "/download" => LocalCommandResult::Deferred(Deferred::Download),
        "/save-last" => LocalCommandResult::Deferred(Deferred::SaveLast),
        "/voices" => handled(crate::voices::table()),
        "/settings" => handled(state.summary()),
        "/save" => LocalCommandResult::Deferred(Deferred::SaveSettings),
        "/exit" | "/quit" => LocalCommandResult::Exit,
        _ => handled(format!("Unknown command {command}, try /help")),
    }
}

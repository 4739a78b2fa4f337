use anyhow::Result;
use pollytalk_core::settings::SettingsManager;
use pollytalk_core::SpeechOrchestrator;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use crate::actions;
use crate::commands::{handle_local_command, Deferred, LocalCommandResult};
use crate::formatter::Formatter;
use crate::state::State;

/// Line-based form: any plain line is read aloud, slash commands edit the
/// form or trigger downloads.
pub struct InteractiveApp {
    orchestrator: SpeechOrchestrator,
    settings_manager: SettingsManager,
    formatter: Formatter,
    state: State,
}

impl InteractiveApp {
    pub async fn new(settings_manager: SettingsManager) -> Result<Self> {
        let settings = settings_manager.settings();
        let orchestrator = actions::build_orchestrator(&settings, true).await;
        let formatter = Formatter::new();

        formatter.print_system("💡 Type text to hear it, /help for commands, /quit to exit");

        let state = State::from_settings(&settings);
        formatter.print_system(&state.summary());

        Ok(Self {
            orchestrator,
            settings_manager,
            formatter,
            state,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            let line = match rl.readline("\x1b[35m>\x1b[0m ") {
                Ok(line) => line,
                Err(err) => match err {
                    ReadlineError::Interrupted => {
                        continue;
                    }
                    _ => break,
                },
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            rl.add_history_entry(&line)?;

            match handle_local_command(&mut self.state, input) {
                LocalCommandResult::Handled { msg } => {
                    self.formatter.print_system(&msg);
                }
                LocalCommandResult::Deferred(deferred) => self.run_deferred(deferred).await?,
                LocalCommandResult::Exit => break,
                LocalCommandResult::Unhandled => {
                    self.state.text = input.to_string();
                    self.run_deferred(Deferred::Speak).await?;
                }
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Action failures were already reported by `actions`; only settings
    /// persistence errors propagate.
    async fn run_deferred(&mut self, deferred: Deferred) -> Result<()> {
        info!(?deferred, "interactive action");
        match deferred {
            Deferred::Speak => {
                let request = self.state.request();
                let mode = self.state.mode();
                let _ = actions::speak(&mut self.orchestrator, &self.formatter, &request, mode)
                    .await;
            }
            Deferred::Open(path) => {
                if let Ok(text) = actions::open(&self.formatter, &path).await {
                    self.formatter.print_system(&format!(
                        "Loaded {} characters from {}",
                        text.chars().count(),
                        path.display()
                    ));
                    self.state.text = text;
                }
            }
            Deferred::Download => {
                let request = self.state.request();
                let dir = self.state.output_dir.clone();
                let _ =
                    actions::download(&mut self.orchestrator, &self.formatter, &request, &dir)
                        .await;
            }
            Deferred::SaveLast => {
                let _ = actions::save_last(
                    &self.orchestrator,
                    &self.formatter,
                    &self.state.output_dir,
                )
                .await;
            }
            Deferred::SaveSettings => {
                let mut settings = self.settings_manager.settings();
                self.state.apply_to(&mut settings);
                self.settings_manager.save_settings(settings)?;
                self.formatter.print_system(&format!(
                    "Saved settings to {}",
                    self.settings_manager.path().display()
                ));
            }
        }
        Ok(())
    }
}

//! Console host for the timer: prints what the window would show and reads
//! commands from stdin.

use anyhow::{anyhow, bail, Result};
use log::{info, warn};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedReceiver,
};

use crate::settings::{Settings, SettingsCandidate};
use crate::timer::{DisplayColor, Effect, TimerController};

const HELP: &str = "commands: start | settings [apps=a,b] [work=N] [break=N] | show | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The start/stop button.
    Toggle,
    Settings(SettingsCandidate),
    Show,
    Help,
    Quit,
}

/// Parses one line of input. Fields left out of a `settings` command keep
/// their current values.
pub fn parse_command(line: &str, current: &Settings) -> Result<Command> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match verb.to_lowercase().as_str() {
        "" | "s" | "start" | "stop" => Ok(Command::Toggle),
        "show" | "status" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "settings" | "set" => {
            let mut candidate = SettingsCandidate::from(current);
            for field in rest.split_whitespace() {
                let (key, value) = field
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected key=value, got {field:?}"))?;
                match key {
                    "apps" => candidate.right_apps = value.split(',').map(str::to_string).collect(),
                    "work" => candidate.work_minutes = value.to_string(),
                    "break" => candidate.break_minutes = value.to_string(),
                    other => bail!("unknown setting {other:?}"),
                }
            }
            Ok(Command::Settings(candidate))
        }
        other => bail!("unknown command {other:?}"),
    }
}

/// Terminal rendering of presentation effects. Keeps the last colour so the
/// clock text is drawn the way the window would draw it.
pub struct Console {
    color: DisplayColor,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            color: DisplayColor::Neutral,
        }
    }
}

impl Console {
    pub fn render(&mut self, effect: &Effect) -> Option<String> {
        match effect {
            Effect::ColorChanged { color } => {
                self.color = *color;
                None
            }
            Effect::TextChanged { text } => Some(self.paint(text)),
            Effect::StatusChanged { status } => Some(format!("[{status}]")),
            Effect::GardenChanged { garden } => Some(format!("garden {garden}")),
            Effect::Notify { title, body } => Some(format!("* {title}: {body}")),
            Effect::PhaseChanged { phase } => {
                info!("Phase changed to {phase:?}");
                None
            }
            Effect::PlayTone { .. } | Effect::StartDistraction | Effect::StopDistraction => None,
        }
    }

    fn paint(&self, text: &str) -> String {
        match self.color {
            DisplayColor::Neutral => text.to_string(),
            DisplayColor::Alert => format!("\x1b[31m{text}\x1b[0m"),
            DisplayColor::AlertEmphasis => format!("\x1b[1;31m{text}\x1b[0m"),
        }
    }
}

/// Runs until `quit` or end of input, printing effects as they arrive.
pub async fn run_console(controller: TimerController, mut effects: UnboundedReceiver<Effect>) -> Result<()> {
    let printer = tokio::spawn(async move {
        let mut console = Console::default();
        while let Some(effect) = effects.recv().await {
            if let Some(line) = console.render(&effect) {
                println!("{line}");
            }
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let current = controller.settings();
        match parse_command(&line, &current) {
            Ok(Command::Toggle) => {
                controller.toggle_start().await;
            }
            Ok(Command::Settings(candidate)) => {
                controller.apply_settings(candidate).await;
            }
            Ok(Command::Show) => {
                let snapshot = controller.snapshot().await;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(err) => {
                warn!("Ignoring input {line:?}: {err}");
                println!("{err}. {HELP}");
            }
        }
    }

    controller.quit().await;
    printer.abort();
    Ok(())
}

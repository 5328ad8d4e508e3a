pub mod audio;
pub mod garden;
pub mod notify;
pub mod sensing;
pub mod settings;
pub mod shell;
pub mod sinks;
pub mod timer;
mod utils;

use std::{env, fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use log::info;
use tokio::sync::mpsc;

use audio::{playlist::Playlist, AudioEngineHandle};
use garden::RandomPicker;
use notify::Notifier;
use sensing::NativeProbe;
use settings::SettingsStore;
use sinks::DeviceSink;
use timer::{SessionEngine, TimerController};

const SETTINGS_FILE: &str = "pomodoro_settings.json";
const SONGS_DIR: &str = "annoying_songs_mp3";

/// Where settings and distraction tracks live on this machine.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub settings_file: PathBuf,
    pub songs_dir: PathBuf,
}

impl AppPaths {
    /// Per-user directories, overridable through `COTTON_SETTINGS` and
    /// `COTTON_SONGS_DIR`.
    pub fn resolve() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "cotton", "CottonPomodoro")
            .ok_or_else(|| anyhow!("Could not determine a home directory"))?;

        let settings_file = env::var_os("COTTON_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| dirs.config_dir().join(SETTINGS_FILE));
        let songs_dir = env::var_os("COTTON_SONGS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| dirs.data_dir().join(SONGS_DIR));

        Ok(Self {
            settings_file,
            songs_dir,
        })
    }
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Cotton Pomodoro starting up...");

    let paths = AppPaths::resolve()?;
    fs::create_dir_all(&paths.songs_dir)
        .with_context(|| format!("Failed to create {}", paths.songs_dir.display()))?;
    info!(
        "Settings at {}, tracks from {}",
        paths.settings_file.display(),
        paths.songs_dir.display()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let store = Arc::new(SettingsStore::load(paths.settings_file));
        let engine = SessionEngine::new(store.current(), Box::new(RandomPicker::new()));

        let (shell_tx, shell_rx) = mpsc::unbounded_channel();
        let sink = DeviceSink::new(
            AudioEngineHandle::new(Playlist::new(paths.songs_dir)),
            Notifier::new(),
            shell_tx,
        );

        let controller = TimerController::new(
            engine,
            Arc::new(NativeProbe::new()),
            Arc::new(sink),
            store,
        );
        controller.start().await;

        shell::run_console(controller, shell_rx).await
    })
}

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use tokio::{
    sync::Mutex,
    task::{self, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    sensing::{ActiveWindow, FocusProbe},
    settings::{Settings, SettingsCandidate, SettingsStore},
    sinks::EffectSink,
};

use super::{Effect, SessionEngine, SessionSnapshot};

/// A probe slower than this counts as being off-task for that tick.
const PROBE_TIMEOUT: Duration = Duration::from_millis(750);

#[derive(Clone)]
pub struct TimerController {
    engine: Arc<Mutex<SessionEngine>>,
    probe: Arc<dyn FocusProbe>,
    sink: Arc<dyn EffectSink>,
    settings: Arc<SettingsStore>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel: CancellationToken,
    tick_interval: Duration,
    debug_probe: bool,
}

impl TimerController {
    pub fn new(
        engine: SessionEngine,
        probe: Arc<dyn FocusProbe>,
        sink: Arc<dyn EffectSink>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let debug_probe = std::env::var("COTTON_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            engine: Arc::new(Mutex::new(engine)),
            probe,
            sink,
            settings,
            ticker: Arc::new(Mutex::new(None)),
            cancel: CancellationToken::new(),
            tick_interval: Duration::from_secs(1),
            debug_probe,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Emits the initial Idle effects and starts the once-per-second ticker.
    pub async fn start(&self) {
        {
            let mut engine = self.engine.lock().await;
            let effects = engine.startup();
            self.dispatch(effects);
        }
        self.spawn_ticker().await;
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.current()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn toggle_start(&self) -> SessionSnapshot {
        let mut engine = self.engine.lock().await;
        let effects = engine.toggle_start();
        info!("Start/stop pressed, phase is now {:?}", engine.phase().kind());
        self.dispatch(effects);
        engine.snapshot()
    }

    /// Validates `candidate`, persists it and applies it to the running session.
    /// A failed write is logged; the new values still take effect.
    pub async fn apply_settings(&self, candidate: SettingsCandidate) -> Arc<Settings> {
        let settings = Arc::new(Settings::from_candidate(&candidate));
        if let Err(err) = self.settings.update(Arc::clone(&settings)) {
            warn!("Failed to persist settings: {err:#}");
        }

        let mut engine = self.engine.lock().await;
        let effects = engine.apply_settings(Arc::clone(&settings));
        self.dispatch(effects);
        info!(
            "Settings applied: {} min work, {} min break, apps {:?}",
            settings.work_minutes, settings.break_minutes, settings.right_apps
        );
        settings
    }

    /// Advances the session by one tick, probing the foreground window first
    /// when the current phase cares about it. The phase is re-checked under the
    /// same lock that applies the tick, so a work session started while the
    /// lock was released is probed before it is scored.
    pub async fn tick_once(&self) {
        let mut window = None;
        let mut probed = false;
        loop {
            let mut engine = self.engine.lock().await;
            if engine.needs_probe() && !probed {
                drop(engine);
                window = self.probe_window().await;
                probed = true;
                continue;
            }

            let effects = engine.tick(Instant::now(), window.as_ref());
            self.dispatch(effects);
            return;
        }
    }

    /// Stops the ticker and silences the distraction audio.
    pub async fn quit(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.ticker.lock().await.take() {
            let _ = handle.await;
        }
        self.sink.apply(Effect::StopDistraction);
        info!("Timer stopped");
    }

    async fn probe_window(&self) -> Option<ActiveWindow> {
        let probe = Arc::clone(&self.probe);
        match time::timeout(PROBE_TIMEOUT, task::spawn_blocking(move || probe.probe())).await {
            Ok(Ok(window)) => {
                if window.is_empty() {
                    debug!("Probe found no foreground window");
                } else if self.debug_probe {
                    info!(
                        "Probe: title={:?} process={:?}",
                        window.title, window.process_name
                    );
                }
                Some(window)
            }
            Ok(Err(err)) => {
                warn!("Focus probe failed: {err}");
                None
            }
            Err(_) => {
                warn!("Focus probe timed out after {PROBE_TIMEOUT:?}");
                None
            }
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let controller = self.clone();
        let cancel = self.cancel.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the display already shows second zero.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => controller.tick_once().await,
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.sink.apply(effect);
        }
    }
}

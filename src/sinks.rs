//! Carries out the side effects requested by the session engine.

use tokio::sync::mpsc::UnboundedSender;

use crate::audio::AudioEngineHandle;
use crate::notify::Notifier;
use crate::timer::Effect;

pub trait EffectSink: Send + Sync {
    /// Must not block: called while the engine lock is held.
    fn apply(&self, effect: Effect);
}

/// Routes device effects to the speakers and the notification daemon, and
/// forwards presentation effects to the shell.
pub struct DeviceSink {
    audio: AudioEngineHandle,
    notifier: Notifier,
    shell: UnboundedSender<Effect>,
}

impl DeviceSink {
    pub fn new(audio: AudioEngineHandle, notifier: Notifier, shell: UnboundedSender<Effect>) -> Self {
        Self {
            audio,
            notifier,
            shell,
        }
    }
}

impl EffectSink for DeviceSink {
    fn apply(&self, effect: Effect) {
        match &effect {
            Effect::PlayTone { tone } => self.audio.play_tone(*tone),
            Effect::Notify { title, body } => self.notifier.show(title, body),
            Effect::StartDistraction => self.audio.start_distraction(),
            Effect::StopDistraction => self.audio.stop_distraction(),
            Effect::PhaseChanged { .. }
            | Effect::StatusChanged { .. }
            | Effect::TextChanged { .. }
            | Effect::ColorChanged { .. }
            | Effect::GardenChanged { .. } => {}
        }

        // The shell also hears about device effects so it can echo them.
        // A closed channel just means the shell has gone away.
        let _ = self.shell.send(effect);
    }
}

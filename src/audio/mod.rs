pub mod playlist;
pub mod tones;

use playlist::Playlist;

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{
    mpsc::{self, RecvTimeoutError, Sender},
    Arc, Mutex,
};
use std::thread;
use std::time::Duration;

use crate::timer::ToneKind;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// How often the audio thread checks whether the distraction track ran out.
const LOOP_POLL_INTERVAL: Duration = Duration::from_millis(250);
const DISTRACTION_VOLUME: f32 = 0.6;

enum AudioCommand {
    PlayTone(ToneKind),
    StartDistraction,
    StopDistraction,
}

/// What the distraction sink is currently looping.
enum Track {
    File(PathBuf),
    Siren,
}

/// Owns the non-`Send` rodio objects on the audio thread.
struct AudioDevice {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    tones: Sink,
    distraction: Option<Sink>,
}

impl AudioDevice {
    fn open() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| anyhow!("Failed to create audio output stream: {e}"))?;
        let tones =
            Sink::try_new(&handle).map_err(|e| anyhow!("Failed to create audio sink: {e}"))?;
        Ok(Self {
            _stream: stream,
            handle,
            tones,
            distraction: None,
        })
    }

    fn play_tone(&self, kind: ToneKind) {
        tones::append_steps(&self.tones, tones::pattern(kind));
    }

    /// (Re)starts the distraction sink with `track` from the beginning.
    fn play_track(&mut self, track: &Track) -> Result<()> {
        if let Some(old) = self.distraction.take() {
            old.stop();
        }
        let sink =
            Sink::try_new(&self.handle).map_err(|e| anyhow!("Failed to create audio sink: {e}"))?;
        sink.set_volume(DISTRACTION_VOLUME);

        match track {
            Track::File(path) => sink.append(decode(path)?),
            Track::Siren => tones::append_steps(&sink, &tones::siren()),
        }
        self.distraction = Some(sink);
        Ok(())
    }

    fn stop_track(&mut self) {
        if let Some(sink) = self.distraction.take() {
            sink.stop();
        }
    }

    fn track_finished(&self) -> bool {
        self.distraction.as_ref().map_or(true, Sink::empty)
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| anyhow!("Failed to open {}: {e}", path.display()))?;
    Decoder::new(BufReader::new(file)).map_err(|e| anyhow!("Failed to decode {}: {e}", path.display()))
}

/// Handle to the audio thread. Every call is fire-and-forget: failures are
/// logged and the timer carries on without sound.
pub struct AudioEngineHandle {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
    playlist: Playlist,
}

impl AudioEngineHandle {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            playlist,
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>> {
        let mut guard = self.tx.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let playlist = self.playlist.clone();

        // Dedicated thread holding non-Send audio objects
        thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || run_audio_thread(rx, playlist))?;

        *guard = Some(tx.clone());
        Ok(tx)
    }

    fn send(&self, command: AudioCommand) {
        let result = self
            .ensure_thread()
            .and_then(|tx| tx.send(command).map_err(|_| anyhow!("audio thread has exited")));
        if let Err(err) = result {
            log_warn!("Audio command dropped: {err:#}");
        }
    }

    pub fn play_tone(&self, kind: ToneKind) {
        self.send(AudioCommand::PlayTone(kind));
    }

    pub fn start_distraction(&self) {
        self.send(AudioCommand::StartDistraction);
    }

    pub fn stop_distraction(&self) {
        if let Some(tx) = self.tx.lock().unwrap_or_else(|p| p.into_inner()).as_ref() {
            let _ = tx.send(AudioCommand::StopDistraction);
        }
    }
}

fn run_audio_thread(rx: mpsc::Receiver<AudioCommand>, playlist: Playlist) {
    let mut device = match AudioDevice::open() {
        Ok(device) => Some(device),
        Err(err) => {
            log_warn!("Audio disabled: {err:#}");
            None
        }
    };
    let mut rng = StdRng::from_entropy();
    let mut looping: Option<Track> = None;

    loop {
        match rx.recv_timeout(LOOP_POLL_INTERVAL) {
            Ok(AudioCommand::PlayTone(kind)) => {
                if let Some(device) = device.as_ref() {
                    device.play_tone(kind);
                }
            }
            Ok(AudioCommand::StartDistraction) => {
                let track = match playlist.pick(&mut rng) {
                    Some(path) => {
                        log_info!("Looping distraction track {}", path.display());
                        Track::File(path)
                    }
                    None => {
                        log_info!(
                            "No tracks in {}, looping the built-in siren",
                            playlist.dir().display()
                        );
                        Track::Siren
                    }
                };
                if let Some(device) = device.as_mut() {
                    if let Err(err) = device.play_track(&track) {
                        log_warn!("Distraction track failed: {err:#}");
                    }
                }
                looping = Some(track);
            }
            Ok(AudioCommand::StopDistraction) => {
                looping = None;
                if let Some(device) = device.as_mut() {
                    device.stop_track();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // Restart the track whenever it runs out while the intent is still on.
        let restart_error = match (looping.as_ref(), device.as_mut()) {
            (Some(track), Some(device)) if device.track_finished() => device.play_track(track).err(),
            _ => None,
        };
        if let Some(err) = restart_error {
            log_warn!("Distraction track failed: {err:#}");
            looping = match looping {
                Some(Track::File(_)) => Some(Track::Siren),
                _ => None,
            };
        }
    }
}

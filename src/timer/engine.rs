use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::garden::{Garden, SlotPicker};
use crate::sensing::ActiveWindow;
use crate::settings::Settings;

use super::display::{format_clock, format_minutes, DisplayColor, Status};
use super::effects::{Effect, ToneKind};
use super::state::{Phase, PhaseKind, SessionSnapshot};
use super::throttle::WrongAppEpisode;

/// The session state machine. Every method is a pure transition: it mutates
/// the engine and returns the side effects the caller must carry out, in order.
pub struct SessionEngine {
    settings: Arc<Settings>,
    phase: Phase,
    garden: Garden,
    picker: Box<dyn SlotPicker>,
    distraction_active: bool,
    shown_text: Option<String>,
    shown_color: Option<DisplayColor>,
    shown_status: Option<Status>,
}

impl SessionEngine {
    pub fn new(settings: Arc<Settings>, picker: Box<dyn SlotPicker>) -> Self {
        Self {
            settings,
            phase: Phase::default(),
            garden: Garden::new(),
            picker,
            distraction_active: false,
            shown_text: None,
            shown_color: None,
            shown_status: None,
        }
    }

    /// Effects for the initial Idle phase at process start.
    pub fn startup(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        out.push(Effect::GardenChanged {
            garden: self.garden.to_string(),
        });
        self.enter_idle(&mut out);
        out
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn garden(&self) -> &Garden {
        &self.garden
    }

    /// Only work sessions consult the focus probe.
    pub fn needs_probe(&self) -> bool {
        matches!(self.phase, Phase::Working { .. })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (remaining_secs, break_elapsed_secs) = match self.phase {
            Phase::Working { remaining_secs, .. } => (remaining_secs, 0),
            Phase::Break { elapsed_secs, .. } => (0, elapsed_secs),
            Phase::Idle { .. } | Phase::Stopped { .. } => (0, 0),
        };

        SessionSnapshot {
            phase: self.phase.kind(),
            off_task: self.phase.is_off_task(),
            remaining_secs,
            break_elapsed_secs,
            work_total_secs: self.settings.work_total_secs(),
            break_total_secs: self.settings.break_total_secs(),
            session_count: self.garden.session_count(),
            garden: self.garden.to_string(),
            distraction_active: self.distraction_active,
        }
    }

    /// The single start/stop button.
    pub fn toggle_start(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        match self.phase {
            Phase::Idle { .. } => {
                let total = self.settings.work_total_secs();
                self.phase = Phase::working(total);
                out.push(Effect::PhaseChanged {
                    phase: PhaseKind::Working,
                });
                self.set_distraction(false, &mut out);
                self.show(format_minutes(total), DisplayColor::Neutral, Status::Working, &mut out);
            }
            Phase::Working { .. } => {
                self.phase = Phase::Stopped { elapsed_secs: 0 };
                out.push(Effect::PhaseChanged {
                    phase: PhaseKind::Stopped,
                });
                self.set_distraction(false, &mut out);
                self.show(format_clock(0), DisplayColor::Alert, Status::Stopped, &mut out);
            }
            // Pressing start while stopped skips the rest of the work session.
            Phase::Stopped { .. } => self.enter_break(&mut out),
            Phase::Break { .. } => self.enter_idle(&mut out),
        }
        out
    }

    /// Advances the session by one second. `window` is the focus probe result,
    /// `None` when the probe did not answer in time; it is ignored outside work.
    pub fn tick(&mut self, now: Instant, window: Option<&ActiveWindow>) -> Vec<Effect> {
        let mut out = Vec::new();
        match self.phase {
            Phase::Idle { elapsed_secs } => {
                let elapsed_secs = elapsed_secs + 1;
                self.phase = Phase::Idle { elapsed_secs };
                self.show(
                    format_clock(secs_i64(elapsed_secs)),
                    DisplayColor::Alert,
                    Status::Idle,
                    &mut out,
                );
            }
            Phase::Stopped { elapsed_secs } => {
                let elapsed_secs = elapsed_secs + 1;
                self.phase = Phase::Stopped { elapsed_secs };
                self.show(
                    format_clock(secs_i64(elapsed_secs)),
                    DisplayColor::Alert,
                    Status::Stopped,
                    &mut out,
                );
            }
            Phase::Break {
                elapsed_secs,
                overtime_notified,
            } => self.tick_break(elapsed_secs + 1, overtime_notified, &mut out),
            Phase::Working {
                remaining_secs,
                wrong_app,
            } => self.tick_working(now, window, remaining_secs, wrong_app, &mut out),
        }
        out
    }

    /// Swaps in a validated settings snapshot. In-progress time is not pro-rated:
    /// a running work session restarts from the new total and a break restarts.
    pub fn apply_settings(&mut self, settings: Arc<Settings>) -> Vec<Effect> {
        let mut out = Vec::new();
        self.settings = settings;
        let work_total = self.settings.work_total_secs();

        let text = match &mut self.phase {
            Phase::Working { remaining_secs, .. } => {
                *remaining_secs = work_total;
                format_clock(work_total)
            }
            Phase::Break { elapsed_secs, .. } => {
                *elapsed_secs = 0;
                format_clock(secs_i64(self.settings.break_total_secs()))
            }
            Phase::Idle { .. } | Phase::Stopped { .. } => format_clock(work_total),
        };
        self.show_text(text, &mut out);
        out
    }

    fn tick_break(&mut self, elapsed_secs: u64, overtime_notified: bool, out: &mut Vec<Effect>) {
        let total = self.settings.break_total_secs();

        if elapsed_secs <= total {
            self.phase = Phase::Break {
                elapsed_secs,
                overtime_notified,
            };
            self.show(
                format_clock(secs_i64(total - elapsed_secs)),
                DisplayColor::Neutral,
                Status::Break,
                out,
            );
            return;
        }

        if !overtime_notified {
            info!("Break ran over its {total}s budget");
            out.push(Effect::PlayTone {
                tone: ToneKind::BreakOvertime,
            });
            out.push(Effect::notify("Break Time's Up!", "You're on overtime 😄"));
            self.set_distraction(true, out);
        }
        self.phase = Phase::Break {
            elapsed_secs,
            overtime_notified: true,
        };
        self.show(
            format_clock(secs_i64(elapsed_secs - total)),
            DisplayColor::Alert,
            Status::BreakOvertime,
            out,
        );
    }

    fn tick_working(
        &mut self,
        now: Instant,
        window: Option<&ActiveWindow>,
        mut remaining_secs: i64,
        mut wrong_app: Option<WrongAppEpisode>,
        out: &mut Vec<Effect>,
    ) {
        let on_task = window
            .map(|w| self.settings.is_approved(&w.title, &w.process_name))
            .unwrap_or(false);

        if on_task {
            remaining_secs -= 1;
            wrong_app = None;
            self.set_distraction(false, out);
            self.show(
                format_minutes(remaining_secs),
                DisplayColor::Neutral,
                Status::Working,
                out,
            );
        } else {
            remaining_secs = (remaining_secs + 1).min(self.settings.work_total_secs());

            if wrong_app.is_none() {
                self.set_distraction(true, out);
            }
            let episode = wrong_app.get_or_insert_with(|| WrongAppEpisode::begin(now));
            if episode.should_notify(now) {
                out.push(Effect::PlayTone {
                    tone: ToneKind::WrongApp,
                });
                out.push(Effect::notify(
                    "Wrong App Detected",
                    format!("You're on: {}", describe_window(window)),
                ));
            }

            self.show(
                format_clock(remaining_secs),
                DisplayColor::AlertEmphasis,
                Status::WrongApp,
                out,
            );
        }

        self.phase = Phase::Working {
            remaining_secs,
            wrong_app,
        };

        if remaining_secs <= 0 {
            self.complete_session(out);
        }
    }

    fn complete_session(&mut self, out: &mut Vec<Effect>) {
        out.push(Effect::PhaseChanged {
            phase: PhaseKind::Completed,
        });
        self.show_status(Status::Completed, out);
        out.push(Effect::PlayTone {
            tone: ToneKind::WorkComplete,
        });
        out.push(Effect::notify("Pomodoro complete", "Take a break!"));

        self.garden.record_completed_session(self.picker.as_mut());
        info!(
            "Work session {} complete, garden is now {}",
            self.garden.session_count(),
            self.garden
        );
        out.push(Effect::GardenChanged {
            garden: self.garden.to_string(),
        });

        self.enter_break(out);
    }

    fn enter_break(&mut self, out: &mut Vec<Effect>) {
        self.phase = Phase::fresh_break();
        out.push(Effect::PhaseChanged {
            phase: PhaseKind::Break,
        });
        self.set_distraction(false, out);
        self.show(
            format_clock(secs_i64(self.settings.break_total_secs())),
            DisplayColor::Neutral,
            Status::Break,
            out,
        );
    }

    fn enter_idle(&mut self, out: &mut Vec<Effect>) {
        self.phase = Phase::default();
        out.push(Effect::PhaseChanged {
            phase: PhaseKind::Idle,
        });
        self.set_distraction(true, out);
        self.show(
            format_clock(self.settings.work_total_secs()),
            DisplayColor::Alert,
            Status::Idle,
            out,
        );
    }

    fn set_distraction(&mut self, active: bool, out: &mut Vec<Effect>) {
        if self.distraction_active == active {
            return;
        }
        self.distraction_active = active;
        out.push(if active {
            Effect::StartDistraction
        } else {
            Effect::StopDistraction
        });
    }

    fn show(&mut self, text: String, color: DisplayColor, status: Status, out: &mut Vec<Effect>) {
        self.show_status(status, out);
        self.show_text(text, out);
        if self.shown_color != Some(color) {
            self.shown_color = Some(color);
            out.push(Effect::ColorChanged { color });
        }
    }

    fn show_status(&mut self, status: Status, out: &mut Vec<Effect>) {
        if self.shown_status != Some(status) {
            self.shown_status = Some(status);
            out.push(Effect::StatusChanged { status });
        }
    }

    fn show_text(&mut self, text: String, out: &mut Vec<Effect>) {
        if self.shown_text.as_deref() != Some(text.as_str()) {
            self.shown_text = Some(text.clone());
            out.push(Effect::TextChanged { text });
        }
    }
}

fn secs_i64(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

fn describe_window(window: Option<&ActiveWindow>) -> &str {
    match window {
        Some(w) if !w.title.is_empty() => &w.title,
        Some(w) if !w.process_name.is_empty() => &w.process_name,
        _ => "an unknown window",
    }
}

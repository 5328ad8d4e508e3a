use serde::Serialize;

use super::display::{DisplayColor, Status};
use super::state::PhaseKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToneKind {
    WorkComplete,
    BreakFinished,
    BreakOvertime,
    WrongApp,
}

/// A side-effect request produced by the session engine. Output-device
/// effects are fire-and-forget; presentation effects are only emitted when
/// the value differs from the last one sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Effect {
    PhaseChanged { phase: PhaseKind },
    StatusChanged { status: Status },
    TextChanged { text: String },
    ColorChanged { color: DisplayColor },
    GardenChanged { garden: String },
    PlayTone { tone: ToneKind },
    Notify { title: String, body: String },
    StartDistraction,
    StopDistraction,
}

impl Effect {
    pub fn notify(title: &str, body: impl Into<String>) -> Self {
        Effect::Notify {
            title: title.to_string(),
            body: body.into(),
        }
    }
}

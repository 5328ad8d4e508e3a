use serde::Serialize;

use super::throttle::WrongAppEpisode;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Idle,
    Working,
    Stopped,
    /// Never stored; reported between a finished work session and its break.
    Completed,
    Break,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle {
        elapsed_secs: u64,
    },
    Working {
        /// Kept within `0..=work_total_secs` at every tick boundary.
        remaining_secs: i64,
        wrong_app: Option<WrongAppEpisode>,
    },
    Stopped {
        elapsed_secs: u64,
    },
    Break {
        elapsed_secs: u64,
        overtime_notified: bool,
    },
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle { elapsed_secs: 0 }
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle { .. } => PhaseKind::Idle,
            Phase::Working { .. } => PhaseKind::Working,
            Phase::Stopped { .. } => PhaseKind::Stopped,
            Phase::Break { .. } => PhaseKind::Break,
        }
    }

    pub fn working(remaining_secs: i64) -> Self {
        Phase::Working {
            remaining_secs,
            wrong_app: None,
        }
    }

    pub fn fresh_break() -> Self {
        Phase::Break {
            elapsed_secs: 0,
            overtime_notified: false,
        }
    }

    pub fn is_off_task(&self) -> bool {
        matches!(
            self,
            Phase::Working {
                wrong_app: Some(_),
                ..
            }
        )
    }
}

/// Read-only view of the engine handed to the shell and to tests.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: PhaseKind,
    pub off_task: bool,
    /// Work seconds left; zero outside a work session.
    pub remaining_secs: i64,
    pub break_elapsed_secs: u64,
    pub work_total_secs: i64,
    pub break_total_secs: u64,
    pub session_count: u64,
    pub garden: String,
    pub distraction_active: bool,
}

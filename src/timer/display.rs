//! Text and styling shown by the presentation shell.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayColor {
    /// Normal countdown (white).
    Neutral,
    /// Idle, stopped or break overtime (red).
    Alert,
    /// Off-task during work (red, bold).
    AlertEmphasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Idle,
    Working,
    WrongApp,
    Stopped,
    Completed,
    Break,
    BreakOvertime,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Idle => "Idle",
            Status::Working => "Working…",
            Status::WrongApp => "Wrong app – undoing progress",
            Status::Stopped => "Stopped",
            Status::Completed => "Pomodoro complete",
            Status::Break => "Break",
            Status::BreakOvertime => "Break Overtime",
        };
        f.write_str(label)
    }
}

/// `mm:ss`, negative input shown as `00:00`.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whole minutes rounded up, e.g. `"12 min"`.
pub fn format_minutes(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{} min", (seconds + 59) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(6001), "100:01");
        assert_eq!(format_clock(-3), "00:00");
    }

    #[test]
    fn test_format_minutes_rounds_up() {
        assert_eq!(format_minutes(1500), "25 min");
        assert_eq!(format_minutes(1499), "25 min");
        assert_eq!(format_minutes(1440), "24 min");
        assert_eq!(format_minutes(1), "1 min");
        assert_eq!(format_minutes(0), "0 min");
    }
}

use std::time::{Duration, Instant};

/// Off-task time before the first wrong-app notification.
pub const FIRST_NOTICE_AFTER: Duration = Duration::from_secs(5);
/// Spacing between repeated wrong-app notifications.
pub const REPEAT_NOTICE_EVERY: Duration = Duration::from_secs(10);

/// One continuous stretch of off-task ticks during a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongAppEpisode {
    pub started_at: Instant,
    pub last_notified_at: Option<Instant>,
}

impl WrongAppEpisode {
    pub fn begin(now: Instant) -> Self {
        Self {
            started_at: now,
            last_notified_at: None,
        }
    }

    /// Returns true when a notification is due at `now` and records it as sent.
    pub fn should_notify(&mut self, now: Instant) -> bool {
        let due = match self.last_notified_at {
            None => now.saturating_duration_since(self.started_at) >= FIRST_NOTICE_AFTER,
            Some(last) => now.saturating_duration_since(last) >= REPEAT_NOTICE_EVERY,
        };
        if due {
            self.last_notified_at = Some(now);
        }
        due
    }
}

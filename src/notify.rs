use notify_rust::Notification;

const APP_NAME: &str = "Cotton Pomodoro";

/// Desktop notifications, shown from a blocking worker so a slow or missing
/// notification daemon never holds up the timer.
#[derive(Debug, Clone, Default)]
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, title: &str, body: &str) {
        let title = title.to_string();
        let body = body.to_string();
        tokio::task::spawn_blocking(move || {
            if let Err(err) = Notification::new()
                .summary(&title)
                .body(&body)
                .appname(APP_NAME)
                .show()
            {
                log::debug!("Notification {title:?} not shown: {err}");
            }
        });
    }
}

//! Focus probe: which window is in front, and which process owns it.

#[cfg(target_os = "linux")]
mod linux;
mod process;
#[cfg(windows)]
mod win32;

use serde::Serialize;

pub use process::ProcessNames;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWindow {
    pub title: String,
    pub process_name: String,
}

impl ActiveWindow {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.process_name.is_empty()
    }
}

/// Queries the OS foreground window. Implementations never fail: any error
/// (no display, no focused window, access denied) yields empty strings.
pub trait FocusProbe: Send + Sync {
    fn probe(&self) -> ActiveWindow;
}

#[cfg(target_os = "linux")]
pub use linux::X11Probe as NativeProbe;

#[cfg(windows)]
pub use win32::Win32Probe as NativeProbe;

/// Platforms without a backend always report an empty window, which the
/// engine treats as off-task.
#[cfg(not(any(target_os = "linux", windows)))]
pub struct NativeProbe;

#[cfg(not(any(target_os = "linux", windows)))]
impl NativeProbe {
    pub fn new() -> Self {
        log::warn!("No focus probe for this platform; every work tick will count as off-task");
        Self
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
impl FocusProbe for NativeProbe {
    fn probe(&self) -> ActiveWindow {
        ActiveWindow::default()
    }
}

use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
};

use super::{ActiveWindow, FocusProbe, ProcessNames};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Fallback buffer when the title length query reports zero.
const TITLE_FALLBACK_LEN: usize = 512;

pub struct Win32Probe {
    processes: ProcessNames,
}

impl Win32Probe {
    pub fn new() -> Self {
        Self {
            processes: ProcessNames::new(),
        }
    }
}

impl Default for Win32Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusProbe for Win32Probe {
    fn probe(&self) -> ActiveWindow {
        // SAFETY: plain Win32 queries on a window handle; the title buffer
        // outlives the call and its length is passed through the slice.
        let (title, pid) = unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.0.is_null() {
                return ActiveWindow::default();
            }

            let reported = usize::try_from(GetWindowTextLengthW(hwnd)).unwrap_or(0);
            let mut buffer = vec![0u16; if reported == 0 { TITLE_FALLBACK_LEN } else { reported + 1 }];
            let copied = usize::try_from(GetWindowTextW(hwnd, &mut buffer)).unwrap_or(0);
            let title = String::from_utf16_lossy(&buffer[..copied.min(buffer.len())]);

            let mut pid = 0u32;
            GetWindowThreadProcessId(hwnd, Some(&mut pid as *mut u32));
            (title, pid)
        };

        let process_name = self.processes.name_of(pid).unwrap_or_default();
        log_debug!("active window: {title:?} ({process_name})");

        ActiveWindow {
            title,
            process_name,
        }
    }
}

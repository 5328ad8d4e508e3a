use std::sync::Mutex;

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resolves a PID to its executable name, refreshing only that process.
pub struct ProcessNames {
    system: Mutex<System>,
}

impl ProcessNames {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    pub fn name_of(&self, pid: u32) -> Option<String> {
        if pid == 0 {
            return None;
        }
        let pid = Pid::from_u32(pid);
        let mut system = self.system.lock().unwrap_or_else(|p| p.into_inner());
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        system
            .process(pid)
            .map(|process| process.name().to_string_lossy().into_owned())
    }
}

impl Default for ProcessNames {
    fn default() -> Self {
        Self::new()
    }
}

use anyhow::{anyhow, Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use super::{ActiveWindow, FocusProbe, ProcessNames};

const ENABLE_LOGS: bool = false;

use crate::{log_debug, log_warn};

struct Atoms {
    net_active_window: Atom,
    net_wm_name: Atom,
    net_wm_pid: Atom,
    utf8_string: Atom,
}

struct X11Session {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl X11Session {
    fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("failed to connect to X server")?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| anyhow!("X server reported no screen {screen_num}"))?;

        let atoms = Atoms {
            net_active_window: intern(&conn, "_NET_ACTIVE_WINDOW")?,
            net_wm_name: intern(&conn, "_NET_WM_NAME")?,
            net_wm_pid: intern(&conn, "_NET_WM_PID")?,
            utf8_string: intern(&conn, "UTF8_STRING")?,
        };

        Ok(Self { conn, root, atoms })
    }

    fn active_window_id(&self) -> Result<Option<Window>> {
        let reply = self
            .conn
            .get_property(false, self.root, self.atoms.net_active_window, AtomEnum::WINDOW, 0, 1)?
            .reply()?;
        Ok(reply.value32().and_then(|mut values| values.next()).filter(|id| *id != 0))
    }

    fn title(&self, window: Window) -> Result<Option<String>> {
        let reply = self
            .conn
            .get_property(false, window, self.atoms.net_wm_name, self.atoms.utf8_string, 0, 1024)?
            .reply()?;
        if !reply.value.is_empty() {
            return Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()));
        }

        // Older clients only set the Latin-1 WM_NAME.
        let reply = self
            .conn
            .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::ANY, 0, 1024)?
            .reply()?;
        if reply.value.is_empty() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()))
    }

    fn pid(&self, window: Window) -> Result<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, window, self.atoms.net_wm_pid, AtomEnum::CARDINAL, 0, 1)?
            .reply()?;
        Ok(reply.value32().and_then(|mut values| values.next()))
    }

    fn wm_class(&self, window: Window) -> Result<Option<String>> {
        let reply = self
            .conn
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 1024)?
            .reply()?;
        Ok(reply
            .value
            .split(|byte| *byte == 0)
            .find(|part| !part.is_empty())
            .map(|part| String::from_utf8_lossy(part).into_owned()))
    }
}

fn intern(conn: &RustConnection, name: &str) -> Result<Atom> {
    Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
}

/// Reads the EWMH active window from the X server. The process name comes
/// from `_NET_WM_PID` when the client sets it, otherwise from `WM_CLASS`.
pub struct X11Probe {
    session: Option<X11Session>,
    processes: ProcessNames,
}

impl X11Probe {
    pub fn new() -> Self {
        let session = match X11Session::connect() {
            Ok(session) => Some(session),
            Err(err) => {
                log::warn!("Focus probe disabled, work ticks will count as off-task: {err:#}");
                None
            }
        };

        Self {
            session,
            processes: ProcessNames::new(),
        }
    }

    fn query(&self, session: &X11Session) -> Result<ActiveWindow> {
        let Some(window) = session.active_window_id()? else {
            return Ok(ActiveWindow::default());
        };

        let title = session.title(window)?.unwrap_or_default();
        let process_name = match session.pid(window)?.and_then(|pid| self.processes.name_of(pid)) {
            Some(name) => name,
            None => session.wm_class(window)?.unwrap_or_default(),
        };

        Ok(ActiveWindow {
            title,
            process_name,
        })
    }
}

impl Default for X11Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusProbe for X11Probe {
    fn probe(&self) -> ActiveWindow {
        let Some(session) = &self.session else {
            return ActiveWindow::default();
        };

        match self.query(session) {
            Ok(window) => {
                log_debug!("active window: {:?} ({})", window.title, window.process_name);
                window
            }
            Err(err) => {
                log_warn!("active window query failed: {err:#}");
                ActiveWindow::default()
            }
        }
    }
}

pub mod controller;
pub mod display;
pub mod effects;
pub mod engine;
pub mod state;
pub mod throttle;

pub use controller::TimerController;
pub use display::{DisplayColor, Status};
pub use effects::{Effect, ToneKind};
pub use engine::SessionEngine;
pub use state::{Phase, PhaseKind, SessionSnapshot};

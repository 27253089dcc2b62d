pub mod hud;

pub use hud::{DebugStats, HudActions, HudOverlay, HudState};

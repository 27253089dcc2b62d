//! Typed player action rig: clip timing keyed by [`ActionKind`].
//!
//! The rig file maps every action to a clip duration and loop flag. All timing
//! uses integer microseconds (`u64`) so clip completion is deterministic under
//! any frame cadence with no floating-point drift.
//!
//! Validation happens at load: every `ActionKind` must be present with a
//! nonzero duration. After that, `ActionRig::clip` is infallible and gameplay
//! code never branches on a missing animation.

use crate::action::ActionKind;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Timing for one player action.
#[derive(Debug, Clone, Copy)]
pub struct ActionClip {
    pub duration_us: u64,
    pub looping: bool,
}

/// Validated mapping from action kind to clip.
#[derive(Debug, Clone)]
pub struct ActionRig {
    pub rig_id: String,
    clips: HashMap<ActionKind, ActionClip>,
}

impl ActionRig {
    /// Build a rig from an already-assembled clip table. Every action kind
    /// must be present.
    pub fn from_clips(
        rig_id: impl Into<String>,
        clips: HashMap<ActionKind, ActionClip>,
    ) -> Result<Self, String> {
        for &kind in ActionKind::ALL {
            if !clips.contains_key(&kind) {
                return Err(format!(
                    "Rig validation failed: action '{}' is missing",
                    kind.name()
                ));
            }
        }
        Ok(Self {
            rig_id: rig_id.into(),
            clips,
        })
    }

    pub fn clip(&self, kind: ActionKind) -> ActionClip {
        // Construction validates presence for every kind.
        self.clips[&kind]
    }
}

/// Runtime playback state for the single active action.
#[derive(Debug, Clone, Copy)]
pub struct ActionState {
    pub kind: ActionKind,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl ActionState {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            elapsed_us: 0,
            finished: false,
        }
    }

    /// Advance playback by `dt_us` microseconds against the clip for `kind`.
    /// Looping clips wrap; one-shot clips latch `finished` at the end.
    pub fn tick(&mut self, dt_us: u64, clip: ActionClip) {
        if self.finished {
            return;
        }
        self.elapsed_us += dt_us;
        if self.elapsed_us >= clip.duration_us {
            if clip.looping {
                self.elapsed_us %= clip.duration_us;
            } else {
                self.elapsed_us = clip.duration_us;
                self.finished = true;
            }
        }
    }

    /// Normalized playback position in `[0, 1]`, for render-side pose blending.
    pub fn phase(&self, clip: ActionClip) -> f32 {
        if clip.duration_us == 0 {
            return 0.0;
        }
        self.elapsed_us as f32 / clip.duration_us as f32
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct RigFileJson {
    version: String,
    rig_id: String,
    actions: HashMap<String, ClipJson>,
}

#[derive(Debug, Deserialize)]
struct ClipJson {
    duration_ms: u64,
    #[serde(default)]
    looping: bool,
}

/// Load and validate an action rig file from disk.
pub fn load_rig_from_path(path: &Path) -> Result<ActionRig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read rig file {}: {e}", path.display()))?;
    let json: RigFileJson = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse rig JSON {}: {e}", path.display()))?;

    if json.version != "0.1" {
        return Err(format!(
            "Rig validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.rig_id.is_empty() {
        return Err("Rig validation failed: rig_id is empty".to_string());
    }

    let mut clips = HashMap::new();
    for (name, clip) in &json.actions {
        let Some(kind) = ActionKind::from_name(name) else {
            return Err(format!(
                "Rig validation failed: unknown action '{}' (expected one of idle/run/jump/death/victory/flying)",
                name
            ));
        };
        if clip.duration_ms == 0 {
            return Err(format!(
                "Rig validation failed: action '{}' has zero duration",
                name
            ));
        }
        clips.insert(
            kind,
            ActionClip {
                duration_us: clip.duration_ms * 1000,
                looping: clip.looping,
            },
        );
    }

    ActionRig::from_clips(json.rig_id, clips)
}

//! Action-based input: the host maps raw key events to named actions, the
//! simulation only ever sees Start/End pairs for those names.
//!
//! Decoupling the simulation from key codes keeps it replayable: a recorded
//! stream of [`Action`] values reproduces a run exactly.

use brickrun_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Key press or key release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Start,
    End,
}

/// Everything the player (or a debug view) can ask of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionName {
    Up,
    Down,
    Left,
    Right,
    Run,
    Jump,
    ToggleGrid,
    ToggleBoundingBoxes,
    ToggleTextures,
}

/// One input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub name: ActionName,
}

impl Action {
    pub fn start(name: ActionName) -> Self {
        Self {
            kind: ActionKind::Start,
            name,
        }
    }

    pub fn end(name: ActionName) -> Self {
        Self {
            kind: ActionKind::End,
            name,
        }
    }
}

// ---------------------------------------------------------------------------
// Debug draw flags
// ---------------------------------------------------------------------------

/// Renderer hints toggled by the debug actions. The simulation never reads
/// them; they ride along for the host to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugFlags {
    pub draw_grid: bool,
    pub draw_bounding_boxes: bool,
    pub draw_textures: bool,
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self {
            draw_grid: false,
            draw_bounding_boxes: false,
            draw_textures: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Fold one action into the player's input flags and the debug flags.
///
/// Movement actions set their flag on Start and clear it on End; toggles
/// react to Start only, so holding the key does not flicker the flag.
pub fn apply_action(input: &mut Input, flags: &mut DebugFlags, action: Action) {
    let pressed = action.kind == ActionKind::Start;
    match action.name {
        ActionName::Up => input.up = pressed,
        ActionName::Down => input.down = pressed,
        ActionName::Left => input.left = pressed,
        ActionName::Right => input.right = pressed,
        ActionName::Run => input.run = pressed,
        ActionName::Jump => input.jump = pressed,
        ActionName::ToggleGrid => {
            if pressed {
                flags.draw_grid = !flags.draw_grid;
            }
        }
        ActionName::ToggleBoundingBoxes => {
            if pressed {
                flags.draw_bounding_boxes = !flags.draw_bounding_boxes;
            }
        }
        ActionName::ToggleTextures => {
            if pressed {
                flags.draw_textures = !flags.draw_textures;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Brickrun Engine -- deterministic platformer simulation on top of
//! [`brickrun_ecs`].
//!
//! The engine advances a side-scrolling world in fixed ticks: player movement
//! driven by a grounded/airborne state machine, walking and shelled enemies,
//! swept-less AABB collision resolved from previous-tick overlap, and
//! tick-counted animation playback. There is no renderer here; positions,
//! scales, clip names, and debug flags are the signals a host draws from.
//!
//! # Quick Start
//!
//! ```
//! use brickrun_engine::prelude::*;
//!
//! let catalog = ClipCatalog::with_defaults();
//! let mut playfield = Playfield::new(PlayfieldConfig::default(), catalog).unwrap();
//! playfield.load(&parse_level("TileRangeHorizontal Brick 0 1 20"));
//!
//! playfield.apply(Action::start(ActionName::Right));
//! for _ in 0..120 {
//!     playfield.tick();
//! }
//! assert!(playfield.camera_x() > 0.0);
//! ```

#![deny(unsafe_code)]

pub mod animation;
pub mod collision;
pub mod geometry;
pub mod input;
pub mod kinematics;
pub mod level;
pub mod movement;
pub mod playfield;

/// Re-export the ECS crate for convenience.
pub use brickrun_ecs;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Recoverable engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Reading a level file failed.
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value was out of range.
    #[error("invalid playfield config: {reason}")]
    InvalidConfig { reason: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the ECS prelude.
    pub use brickrun_ecs::prelude::*;

    pub use crate::animation::{clips, AnimationClip, ClipCatalog};
    pub use crate::geometry::{classify_direction, is_collision, overlap, CollisionDirection};
    pub use crate::input::{Action, ActionKind, ActionName, DebugFlags};
    pub use crate::level::{grid_to_world, load_level, parse_level, SpawnCommand, StaticKind};
    pub use crate::playfield::{Playfield, PlayfieldConfig};
    pub use crate::EngineError;
}

//! Component records: plain data attached to entities, no behavior.
//!
//! Every entity owns at most one component of each kind. The invariant that
//! matters across the whole simulation: any entity carrying a
//! [`BoundingBox`] also carries a [`Transform`], and `Transform::prev_pos`
//! holds the position from the previous tick at the moment collision
//! resolution runs -- direction classification reads the *previous* overlap,
//! not the current one.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Position, velocity, and per-frame acceleration.
///
/// `accel_x`/`accel_y` persist across ticks rather than being recomputed from
/// scratch: the airborne movement rules inspect the *previous* tick's vertical
/// acceleration to tell which reduced-gravity tier a jump launched with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position of the entity's center.
    pub pos: Vec2,
    /// Position at the end of the previous tick's integration.
    pub prev_pos: Vec2,
    /// Velocity in world units per tick.
    pub velocity: Vec2,
    /// Render scale; `scale.x` flips sign to mirror the sprite.
    pub scale: Vec2,
    /// Rotation in degrees (renderer signal only).
    pub angle: f64,
    /// Rotation speed in degrees per tick (renderer signal only).
    pub angular_velocity: f64,
    /// Horizontal acceleration applied this tick.
    pub accel_x: f64,
    /// Vertical acceleration applied this tick (gravity, positive is down).
    pub accel_y: f64,
}

impl Transform {
    /// A transform at rest at `pos`, with `prev_pos` equal to `pos`.
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            velocity: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            angle: 0.0,
            angular_velocity: 0.0,
            accel_x: 0.0,
            accel_y: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// Axis-aligned collision box, centered on the entity's `Transform::pos`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Full extents of the box.
    pub size: Vec2,
    /// Cached `size / 2`, the value the overlap formula actually consumes.
    pub half_size: Vec2,
}

impl BoundingBox {
    /// Build a box from its full size.
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            half_size: size.half(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Per-frame boolean input signals for the player.
///
/// `can_jump` is an edge-trigger gate, not an input: it is true only while
/// grounded, cleared the instant a jump starts, and re-armed only by a
/// top-side collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Input {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held to run instead of walk.
    pub run: bool,
    /// Held to jump / extend the jump arc.
    pub jump: bool,
    /// Whether a jump may start this tick.
    pub can_jump: bool,
}

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

/// Which way the player sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Per-tick acceleration intent, classified before integration.
///
/// Decelerating means speed is shrinking toward zero; accelerating means it is
/// growing away from zero. Exactly one variant holds each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccelerationKind {
    AcceleratingLeft,
    AcceleratingRight,
    DeceleratingLeft,
    DeceleratingRight,
    Zero,
}

/// Player movement state (player entity only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Grounded vs airborne; the two modes use independent kinematics tables.
    pub is_grounded: bool,
    /// Grounded sub-state: decelerating while still moving against held input.
    pub is_skidding: bool,
    /// Current facing, updated by the state machine.
    pub facing: Facing,
    /// This tick's classified acceleration intent.
    pub acceleration: AccelerationKind,
    /// Horizontal velocity captured at jump start; gates the airborne
    /// horizontal speed cap for the whole arc.
    pub initial_jump_x_speed: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_grounded: false,
            is_skidding: false,
            facing: Facing::Right,
            acceleration: AccelerationKind::Zero,
            initial_jump_x_speed: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

/// Enemy species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Goomba,
    Koopa,
}

/// Enemy behavior state.
///
/// `Dead` has no variant here: a dead enemy is simply a destroyed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Waiting for the player to cross `activation_x`; does not move.
    Dormant,
    /// Walking and colliding normally.
    Active,
    /// Stomped Koopa sitting still until bumped.
    ShellIdle,
    /// Kicked shell sliding at full speed; destroys other enemies on contact.
    ShellMoving,
}

/// Enemy component (enemy entities only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub state: EnemyState,
    /// World x-coordinate the player must reach before this enemy activates.
    pub activation_x: f64,
}

impl Enemy {
    /// A dormant enemy of the given kind.
    pub fn dormant(kind: EnemyKind, activation_x: f64) -> Self {
        Self {
            kind,
            state: EnemyState::Dormant,
            activation_x,
        }
    }

    /// Whether this enemy participates in movement and collisions this tick.
    #[inline]
    pub fn is_moving_state(&self) -> bool {
        matches!(self.state, EnemyState::Active | EnemyState::ShellMoving)
    }
}

// ---------------------------------------------------------------------------
// LifeSpan
// ---------------------------------------------------------------------------

/// Countdown in ticks; the entity destroys itself when it reaches zero.
///
/// Used for shell timers and transient debris/coin effect entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeSpan {
    pub ticks_remaining: u32,
}

impl LifeSpan {
    pub fn new(ticks: u32) -> Self {
        Self {
            ticks_remaining: ticks,
        }
    }
}

// ---------------------------------------------------------------------------
// AnimationRef
// ---------------------------------------------------------------------------

/// Reference to the entity's current animation clip plus its playback cursor.
///
/// The clip itself (frame count, speed, sprite size) lives in the asset
/// catalog; this component only names it and tracks elapsed ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationRef {
    /// Name of the current clip in the catalog.
    pub clip: String,
    /// Ticks elapsed since this clip was selected (advanced once per tick).
    pub elapsed_ticks: u64,
    /// Whether the clip loops; non-repeating clips end the entity's life when
    /// finished (AnimationEffect entities).
    pub repeat: bool,
}

impl AnimationRef {
    /// Start playing `clip` from its first frame.
    pub fn new(clip: impl Into<String>, repeat: bool) -> Self {
        Self {
            clip: clip.into(),
            elapsed_ticks: 0,
            repeat,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_at_rest_has_prev_pos_equal_pos() {
        let t = Transform::at(Vec2::new(100.0, 200.0));
        assert_eq!(t.pos, t.prev_pos);
        assert_eq!(t.velocity, Vec2::ZERO);
        assert_eq!(t.scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn bounding_box_half_size() {
        let bb = BoundingBox::new(Vec2::new(64.0, 64.0));
        assert_eq!(bb.half_size, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn default_input_cannot_jump() {
        let input = Input::default();
        assert!(!input.can_jump);
        assert!(!input.jump);
    }

    #[test]
    fn dormant_enemy_does_not_move() {
        let e = Enemy::dormant(EnemyKind::Goomba, 256.0);
        assert_eq!(e.state, EnemyState::Dormant);
        assert!(!e.is_moving_state());
    }

    #[test]
    fn shell_states_move_only_when_kicked() {
        let mut e = Enemy::dormant(EnemyKind::Koopa, 0.0);
        e.state = EnemyState::ShellIdle;
        assert!(!e.is_moving_state());
        e.state = EnemyState::ShellMoving;
        assert!(e.is_moving_state());
    }
}

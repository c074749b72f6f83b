//! Animation clips, the clip catalog, and per-tick animation selection.
//!
//! Clips are pure timing data (frame count, ticks per frame, sprite size);
//! which frame to show is derived from an entity's elapsed-tick cursor, so
//! playback is deterministic and snapshot-friendly. The catalog stands in for
//! the asset system: simulation code refers to clips by name only.

use std::collections::HashMap;

use brickrun_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kinematics::grounded;

// ---------------------------------------------------------------------------
// Clip names
// ---------------------------------------------------------------------------

/// Well-known clip names used by the simulation itself. Level files may name
/// any other clip for tiles and decorations.
pub mod clips {
    pub const PLAYER_STAND: &str = "PlayerStand";
    pub const PLAYER_WALK: &str = "PlayerWalk";
    pub const PLAYER_RUN: &str = "PlayerRun";
    pub const PLAYER_SKID: &str = "PlayerSkid";
    pub const PLAYER_AIR: &str = "PlayerAir";

    pub const BRICK: &str = "Brick";
    pub const QUESTION_BLINK: &str = "QuestionMarkBlink";
    pub const QUESTION_HIT: &str = "QuestionMarkBlockHit";
    pub const BRICK_DEBRIS: &str = "BrickDebris";
    pub const COIN_SPIN: &str = "CoinSpin";

    pub const GOOMBA_WALK: &str = "GoombaWalk";
    pub const GOOMBA_DEAD: &str = "GoombaDead";
    pub const KOOPA_WALK: &str = "KoopaWalk";
    pub const KOOPA_SHELL: &str = "KoopaShell";
}

// ---------------------------------------------------------------------------
// AnimationClip
// ---------------------------------------------------------------------------

/// Timing and size data for one animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Number of frames in the sheet.
    pub frame_count: u64,
    /// Ticks each frame is shown for. Zero means the clip has no duration at
    /// all: it reports ended immediately.
    pub frame_speed: u64,
    /// Sprite size in world units (renderer signal, also used to center
    /// spawned entities on their grid cell).
    pub size: Vec2,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frame_count: u64, frame_speed: u64, size: Vec2) -> Self {
        Self {
            name: name.into(),
            frame_count,
            frame_speed,
            size,
        }
    }

    /// Zero-based frame to show after `elapsed` ticks, wrapping for looped
    /// playback.
    pub fn current_frame_index(&self, elapsed: u64) -> u64 {
        if self.frame_speed == 0 || self.frame_count == 0 {
            return 0;
        }
        (elapsed / self.frame_speed) % self.frame_count
    }

    /// Whether a non-repeating playback of this clip has finished after
    /// `elapsed` ticks.
    pub fn has_ended(&self, elapsed: u64) -> bool {
        if self.frame_speed == 0 {
            return true;
        }
        elapsed / self.frame_speed >= self.frame_count
    }
}

// ---------------------------------------------------------------------------
// ClipCatalog
// ---------------------------------------------------------------------------

/// Name-indexed clip registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipCatalog {
    entries: HashMap<String, AnimationClip>,
}

impl ClipCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-populated with every clip the simulation refers to by
    /// name, using 64x64 sprites. Real frame data would come from the asset
    /// pipeline; these timings match the hand-tuned originals closely enough
    /// for the simulation semantics (only `frame_speed`/`frame_count` matter).
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        let size = Vec2::new(64.0, 64.0);
        for (name, frames, speed) in [
            (clips::PLAYER_STAND, 1, 1),
            (clips::PLAYER_WALK, 3, 6),
            (clips::PLAYER_RUN, 3, 3),
            (clips::PLAYER_SKID, 1, 1),
            (clips::PLAYER_AIR, 1, 1),
            (clips::BRICK, 1, 1),
            (clips::QUESTION_BLINK, 3, 10),
            (clips::QUESTION_HIT, 1, 1),
            (clips::BRICK_DEBRIS, 4, 8),
            (clips::COIN_SPIN, 4, 4),
            (clips::GOOMBA_WALK, 2, 8),
            (clips::GOOMBA_DEAD, 1, 30),
            (clips::KOOPA_WALK, 2, 8),
            (clips::KOOPA_SHELL, 1, 1),
        ] {
            catalog.register(AnimationClip::new(name, frames, speed, size));
        }
        catalog
    }

    pub fn register(&mut self, clip: AnimationClip) {
        self.entries.insert(clip.name.clone(), clip);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

// ---------------------------------------------------------------------------
// Player clip selection
// ---------------------------------------------------------------------------

/// Pick the player's clip for this tick from its movement state.
///
/// Walk and run share the same sheet at different speeds, so switching
/// between them carries the current frame over instead of restarting, which
/// keeps the legs from visibly snapping.
pub fn select_player(store: &mut EntityStore, player: EntityId, catalog: &ClipCatalog) {
    let Some(state) = store.player_state.get(player).copied() else {
        return;
    };
    let velocity_x = store.transform.must(player).velocity.x;

    let next = if state.is_grounded {
        if state.acceleration == AccelerationKind::Zero && velocity_x == 0.0 {
            clips::PLAYER_STAND
        } else if state.is_skidding {
            clips::PLAYER_SKID
        } else if velocity_x.abs() > grounded::MAX_WALK_SPEED {
            clips::PLAYER_RUN
        } else {
            clips::PLAYER_WALK
        }
    } else {
        clips::PLAYER_AIR
    };

    let anim = store.animation.must_mut(player);
    if anim.clip != next {
        let walk_run_switch = (next == clips::PLAYER_RUN && anim.clip == clips::PLAYER_WALK)
            || (next == clips::PLAYER_WALK && anim.clip == clips::PLAYER_RUN);
        let mut elapsed = 0;
        if walk_run_switch {
            if let (Some(old), Some(new)) = (catalog.get(&anim.clip), catalog.get(next)) {
                elapsed = old.current_frame_index(anim.elapsed_ticks) * new.frame_speed;
            }
        }
        anim.clip = next.to_string();
        anim.elapsed_ticks = elapsed;
        anim.repeat = true;
    }

    // Mirror the sprite to match the facing.
    let transform = store.transform.must_mut(player);
    if (transform.scale.x < 0.0 && state.facing == Facing::Right)
        || (transform.scale.x > 0.0 && state.facing == Facing::Left)
    {
        transform.scale.x = -transform.scale.x;
    }
}

// ---------------------------------------------------------------------------
// Cursor advance and expiry
// ---------------------------------------------------------------------------

/// Advance every playback cursor one tick and destroy finished effects.
///
/// Effect entities exist only for their clip; one whose non-repeating clip
/// has ended (or that names a clip the catalog does not know) is destroyed.
pub fn advance(store: &mut EntityStore, catalog: &ClipCatalog) {
    for id in store.entities().to_vec() {
        if let Some(anim) = store.animation.get_mut(id) {
            anim.elapsed_ticks += 1;
        }
    }

    for id in store.tagged(Tag::AnimationEffect).to_vec() {
        let Some(anim) = store.animation.get(id) else {
            continue;
        };
        if anim.repeat {
            continue;
        }
        match catalog.get(&anim.clip) {
            Some(clip) => {
                if clip.has_ended(anim.elapsed_ticks) {
                    store.destroy(id);
                }
            }
            None => {
                warn!(entity = %id, clip = %anim.clip, "effect references unknown clip");
                store.destroy(id);
            }
        }
    }
}

/// Count down every [`LifeSpan`] and destroy entities that hit zero.
pub fn tick_life_spans(store: &mut EntityStore) {
    for id in store.entities().to_vec() {
        if let Some(life) = store.life_span.get_mut(id) {
            life.ticks_remaining = life.ticks_remaining.saturating_sub(1);
            if life.ticks_remaining == 0 {
                store.destroy(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(frames: u64, speed: u64) -> AnimationClip {
        AnimationClip::new("test", frames, speed, Vec2::new(64.0, 64.0))
    }

    #[test]
    fn frame_index_wraps() {
        let clip = sized(3, 4);
        assert_eq!(clip.current_frame_index(0), 0);
        assert_eq!(clip.current_frame_index(3), 0);
        assert_eq!(clip.current_frame_index(4), 1);
        assert_eq!(clip.current_frame_index(11), 2);
        assert_eq!(clip.current_frame_index(12), 0, "wrapped");
    }

    #[test]
    fn has_ended_after_all_frames_played() {
        let clip = sized(3, 4);
        assert!(!clip.has_ended(0));
        assert!(!clip.has_ended(11));
        assert!(clip.has_ended(12));
    }

    #[test]
    fn zero_speed_clip_ends_immediately() {
        let clip = sized(1, 0);
        assert!(clip.has_ended(0));
        assert_eq!(clip.current_frame_index(5), 0);
    }

    fn player_fixture() -> (EntityStore, EntityId, ClipCatalog) {
        let mut store = EntityStore::new();
        let player = store.create(Tag::Player);
        store
            .transform
            .insert(player, Transform::at(Vec2::new(0.0, 0.0)));
        store.input.insert(player, Input::default());
        store.player_state.insert(
            player,
            PlayerState {
                is_grounded: true,
                ..Default::default()
            },
        );
        store
            .animation
            .insert(player, AnimationRef::new(clips::PLAYER_STAND, true));
        store.flush();
        (store, player, ClipCatalog::with_defaults())
    }

    #[test]
    fn idle_player_stands_moving_player_walks() {
        let (mut store, player, catalog) = player_fixture();
        select_player(&mut store, player, &catalog);
        assert_eq!(store.animation.must(player).clip, clips::PLAYER_STAND);

        store.transform.must_mut(player).velocity.x = 3.0;
        store.player_state.must_mut(player).acceleration = AccelerationKind::AcceleratingRight;
        select_player(&mut store, player, &catalog);
        assert_eq!(store.animation.must(player).clip, clips::PLAYER_WALK);
    }

    #[test]
    fn past_walk_speed_runs_airborne_flies() {
        let (mut store, player, catalog) = player_fixture();
        store.transform.must_mut(player).velocity.x = grounded::MAX_RUN_SPEED;
        store.player_state.must_mut(player).acceleration = AccelerationKind::AcceleratingRight;
        select_player(&mut store, player, &catalog);
        assert_eq!(store.animation.must(player).clip, clips::PLAYER_RUN);

        store.player_state.must_mut(player).is_grounded = false;
        select_player(&mut store, player, &catalog);
        assert_eq!(store.animation.must(player).clip, clips::PLAYER_AIR);
    }

    #[test]
    fn skid_overrides_walk() {
        let (mut store, player, catalog) = player_fixture();
        store.transform.must_mut(player).velocity.x = 4.0;
        let state = store.player_state.must_mut(player);
        state.acceleration = AccelerationKind::DeceleratingLeft;
        state.is_skidding = true;
        select_player(&mut store, player, &catalog);
        assert_eq!(store.animation.must(player).clip, clips::PLAYER_SKID);
    }

    #[test]
    fn walk_to_run_switch_preserves_the_visible_frame() {
        let (mut store, player, catalog) = player_fixture();
        store.transform.must_mut(player).velocity.x = 3.0;
        store.player_state.must_mut(player).acceleration = AccelerationKind::AcceleratingRight;
        select_player(&mut store, player, &catalog);

        // Advance into the walk clip's second frame (walk speed is 6).
        store.animation.must_mut(player).elapsed_ticks = 7;
        let walk = catalog.get(clips::PLAYER_WALK).unwrap();
        let frame_before = walk.current_frame_index(7);
        assert_eq!(frame_before, 1);

        store.transform.must_mut(player).velocity.x = grounded::MAX_RUN_SPEED;
        select_player(&mut store, player, &catalog);

        let anim = store.animation.must(player);
        assert_eq!(anim.clip, clips::PLAYER_RUN);
        let run = catalog.get(clips::PLAYER_RUN).unwrap();
        assert_eq!(run.current_frame_index(anim.elapsed_ticks), frame_before);
    }

    #[test]
    fn facing_left_mirrors_the_sprite() {
        let (mut store, player, catalog) = player_fixture();
        store.player_state.must_mut(player).facing = Facing::Left;
        select_player(&mut store, player, &catalog);
        assert_eq!(store.transform.must(player).scale.x, -1.0);

        // And back.
        store.player_state.must_mut(player).facing = Facing::Right;
        select_player(&mut store, player, &catalog);
        assert_eq!(store.transform.must(player).scale.x, 1.0);
    }

    #[test]
    fn finished_effect_destroys_itself() {
        let mut store = EntityStore::new();
        let catalog = ClipCatalog::with_defaults();
        let effect = store.create(Tag::AnimationEffect);
        store
            .transform
            .insert(effect, Transform::at(Vec2::ZERO));
        store
            .animation
            .insert(effect, AnimationRef::new(clips::GOOMBA_DEAD, false));
        store.flush();

        // GoombaDead is 1 frame at 30 ticks.
        for _ in 0..29 {
            advance(&mut store, &catalog);
            assert!(store.is_active(effect));
        }
        advance(&mut store, &catalog);
        assert!(!store.is_active(effect));
    }

    #[test]
    fn repeating_animations_never_expire() {
        let mut store = EntityStore::new();
        let catalog = ClipCatalog::with_defaults();
        let tile = store.create(Tag::Tile);
        store.transform.insert(tile, Transform::at(Vec2::ZERO));
        store
            .animation
            .insert(tile, AnimationRef::new(clips::QUESTION_BLINK, true));
        store.flush();

        for _ in 0..100 {
            advance(&mut store, &catalog);
        }
        assert!(store.is_active(tile));
        assert_eq!(store.animation.must(tile).elapsed_ticks, 100);
    }

    #[test]
    fn life_span_destroys_at_zero() {
        let mut store = EntityStore::new();
        let shell = store.create(Tag::Enemy);
        store.life_span.insert(shell, LifeSpan::new(3));
        store.flush();

        tick_life_spans(&mut store);
        tick_life_spans(&mut store);
        assert!(store.is_active(shell));
        tick_life_spans(&mut store);
        assert!(!store.is_active(shell));
    }
}

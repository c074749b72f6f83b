//! Collision detection and resolution for the player, enemies, and tiles.
//!
//! Player-vs-tile resolution keeps at most one candidate block per approach
//! direction: when two blocks are hit from the same side, fixing the
//! penetration against one also fixes the other, so only the best candidate
//! per bucket is resolved. Cardinal buckets can see two blocks a tick, the
//! diagonal ones at most one.
//!
//! Resolution order is fixed: bottom, left, right, top, then the four
//! diagonals. Every bucket after the first re-checks its overlap, since an
//! earlier push may already have separated the boxes.

use brickrun_ecs::prelude::*;
use tracing::debug;

use crate::animation::clips;
use crate::geometry::{self, CollisionDirection};
use crate::kinematics::{enemy as enemy_kinematics, vertical};

// ---------------------------------------------------------------------------
// Player vs tiles
// ---------------------------------------------------------------------------

/// Resolve all player collisions for this tick: tiles first, then enemies.
pub fn resolve_player(store: &mut EntityStore, player: EntityId) {
    resolve_player_tiles(store, player);
    resolve_player_enemies(store, player);
}

fn overlap_against(store: &EntityStore, pos: Vec2, half: Vec2, other: EntityId) -> Vec2 {
    let t = store.transform.must(other);
    let b = store.bounding_box.must(other);
    geometry::overlap(pos, t.pos, half, b.half_size)
}

/// Player-vs-tile detection, bucket selection, and positional resolution.
///
/// A bottom hit (head bump) additionally triggers the block's special
/// behavior; a top hit grounds the player and re-arms the jump; resolving no
/// bucket at all while grounded means the player walked off an edge and goes
/// airborne.
pub fn resolve_player_tiles(store: &mut EntityStore, player: EntityId) {
    let Some(mut transform) = store.transform.get(player).copied() else {
        return;
    };
    let half = store.bounding_box.must(player).half_size;
    let mut input = *store.input.must(player);
    let mut state = *store.player_state.must(player);

    let mut bottom_hit: Option<EntityId> = None;
    let mut left_hit: Option<EntityId> = None;
    let mut right_hit: Option<EntityId> = None;
    let mut top_hit: Option<EntityId> = None;
    let mut top_left_hit: Option<EntityId> = None;
    let mut top_right_hit: Option<EntityId> = None;
    let mut bottom_left_hit: Option<EntityId> = None;
    let mut bottom_right_hit: Option<EntityId> = None;

    let tiles = store.tagged(Tag::Tile).to_vec();
    for tile in tiles {
        let tile_transform = *store.transform.must(tile);
        let tile_half = store.bounding_box.must(tile).half_size;

        let overlap = geometry::overlap(transform.pos, tile_transform.pos, half, tile_half);
        if !geometry::is_collision(overlap) {
            continue;
        }
        let prev_overlap = geometry::overlap(
            transform.prev_pos,
            tile_transform.prev_pos,
            half,
            tile_half,
        );
        match geometry::classify_direction(prev_overlap, transform.prev_pos, tile_transform.pos) {
            CollisionDirection::Bottom => {
                // Keep the block with the larger x-overlap.
                if bottom_hit.is_none_or(|best| {
                    overlap.x > overlap_against(store, transform.pos, half, best).x
                }) {
                    bottom_hit = Some(tile);
                }
            }
            CollisionDirection::Left => {
                // Keep the higher block (smaller y in a y-down world).
                if left_hit.is_none_or(|best| {
                    tile_transform.pos.y < store.transform.must(best).pos.y
                }) {
                    left_hit = Some(tile);
                }
            }
            CollisionDirection::Right => {
                if right_hit.is_none_or(|best| {
                    tile_transform.pos.y < store.transform.must(best).pos.y
                }) {
                    right_hit = Some(tile);
                }
            }
            CollisionDirection::Top => {
                if top_hit.is_none_or(|best| {
                    overlap.x > overlap_against(store, transform.pos, half, best).x
                }) {
                    top_hit = Some(tile);
                }
            }
            CollisionDirection::DiagTopLeft => top_left_hit = Some(tile),
            CollisionDirection::DiagTopRight => top_right_hit = Some(tile),
            CollisionDirection::DiagBottomLeft => bottom_left_hit = Some(tile),
            CollisionDirection::DiagBottomRight => bottom_right_hit = Some(tile),
        }
    }

    if let Some(block) = bottom_hit {
        let overlap = overlap_against(store, transform.pos, half, block);
        transform.pos.y += overlap.y;
        transform.velocity.y = 0.0;
        hit_block_from_below(store, block);
    }
    if let Some(block) = left_hit {
        let overlap = overlap_against(store, transform.pos, half, block);
        if geometry::is_collision(overlap) {
            transform.pos.x -= overlap.x;
        }
    }
    if let Some(block) = right_hit {
        let overlap = overlap_against(store, transform.pos, half, block);
        if geometry::is_collision(overlap) {
            transform.pos.x += overlap.x;
        }
    }
    if let Some(block) = top_hit {
        let overlap = overlap_against(store, transform.pos, half, block);
        if geometry::is_collision(overlap) {
            transform.pos.y -= overlap.y;
            transform.velocity.y = 0.0;
            input.can_jump = true;
            state.is_grounded = true;
        }
    }
    // Diagonal hits only push horizontally, away from the block's corner.
    for (block, sign) in [
        (top_left_hit, -1.0),
        (top_right_hit, 1.0),
        (bottom_left_hit, -1.0),
        (bottom_right_hit, 1.0),
    ] {
        if let Some(block) = block {
            let overlap = overlap_against(store, transform.pos, half, block);
            if geometry::is_collision(overlap) {
                transform.pos.x += sign * overlap.x;
            }
        }
    }

    let touched_nothing = bottom_hit.is_none()
        && left_hit.is_none()
        && right_hit.is_none()
        && top_hit.is_none()
        && top_left_hit.is_none()
        && top_right_hit.is_none()
        && bottom_left_hit.is_none()
        && bottom_right_hit.is_none();
    if touched_nothing && state.is_grounded {
        // Walked off an edge: the airborne speed cap is keyed to the speed
        // the player left the ground with, same as a jump.
        state.is_grounded = false;
        state.initial_jump_x_speed = transform.velocity.x;
        input.can_jump = false;
    }

    *store.transform.must_mut(player) = transform;
    *store.input.must_mut(player) = input;
    *store.player_state.must_mut(player) = state;
}

/// Special-block reaction to a head bump.
fn hit_block_from_below(store: &mut EntityStore, block: EntityId) {
    let Some(clip) = store.animation.get(block).map(|a| a.clip.clone()) else {
        return;
    };
    match clip.as_str() {
        clips::QUESTION_BLINK => {
            // The blinking block is swapped for its spent version; the coin
            // pops out above it.
            let pos = store.transform.must(block).pos;
            let size = store.bounding_box.must(block).size;
            let spent = store.create(Tag::Tile);
            store.transform.insert(spent, Transform::at(pos));
            store.bounding_box.insert(spent, BoundingBox::new(size));
            store
                .animation
                .insert(spent, AnimationRef::new(clips::QUESTION_HIT, true));
            spawn_effect(store, clips::COIN_SPIN, pos - Vec2::new(0.0, size.y));
            store.destroy(block);
            debug!(block = %block, "question block hit");
        }
        clips::BRICK => {
            let pos = store.transform.must(block).pos;
            spawn_effect(store, clips::BRICK_DEBRIS, pos);
            store.destroy(block);
            debug!(block = %block, "brick destroyed");
        }
        _ => {}
    }
}

/// Spawn a transient animation entity; it destroys itself when the clip ends.
fn spawn_effect(store: &mut EntityStore, clip: &str, pos: Vec2) {
    let effect = store.create(Tag::AnimationEffect);
    store.transform.insert(effect, Transform::at(pos));
    store.animation.insert(effect, AnimationRef::new(clip, false));
}

// ---------------------------------------------------------------------------
// Player vs enemies
// ---------------------------------------------------------------------------

/// Player-vs-enemy contact. At most one enemy is handled per tick.
///
/// A falling airborne player stomps: a Goomba dies, a walking or sliding
/// Koopa tucks into an idle shell, an idle shell gets kicked. Any other
/// contact with a moving enemy kills the player; brushing an idle shell from
/// the side kicks it away.
pub fn resolve_player_enemies(store: &mut EntityStore, player: EntityId) {
    let Some(mut transform) = store.transform.get(player).copied() else {
        return;
    };
    let half = store.bounding_box.must(player).half_size;
    let state = *store.player_state.must(player);

    let enemies = store.tagged(Tag::Enemy).to_vec();
    for id in enemies {
        let Some(enemy) = store.enemy.get(id).copied() else {
            continue;
        };
        if enemy.state == EnemyState::Dormant {
            continue;
        }
        let enemy_pos = store.transform.must(id).pos;
        let enemy_half = store.bounding_box.must(id).half_size;
        let overlap = geometry::overlap(transform.pos, enemy_pos, half, enemy_half);
        if !geometry::is_collision(overlap) {
            continue;
        }

        let is_stomping = transform.velocity.y > 0.0 && !state.is_grounded;
        if is_stomping {
            transform.velocity.y = -vertical::STOMP_VELOCITY;
            transform.pos.y -= overlap.y;
            match (enemy.kind, enemy.state) {
                (EnemyKind::Goomba, _) => {
                    store.destroy(id);
                    spawn_effect(store, clips::GOOMBA_DEAD, enemy_pos);
                    debug!(enemy = %id, "goomba stomped");
                }
                (EnemyKind::Koopa, EnemyState::ShellIdle) => {
                    kick_shell(store, id, transform.pos.x);
                }
                (EnemyKind::Koopa, _) => {
                    let shell = store.enemy.must_mut(id);
                    shell.state = EnemyState::ShellIdle;
                    store.transform.must_mut(id).velocity = Vec2::ZERO;
                    store
                        .life_span
                        .insert(id, LifeSpan::new(enemy_kinematics::SHELL_IDLE_TICKS));
                    store
                        .animation
                        .insert(id, AnimationRef::new(clips::KOOPA_SHELL, true));
                    debug!(enemy = %id, "koopa stomped into shell");
                }
            }
        } else if enemy.state == EnemyState::ShellIdle {
            kick_shell(store, id, transform.pos.x);
        } else {
            store.destroy(player);
            debug!(player = %player, enemy = %id, "player killed by enemy contact");
        }
        break;
    }

    *store.transform.must_mut(player) = transform;
}

/// Send an idle shell sliding away from whatever bumped it.
fn kick_shell(store: &mut EntityStore, shell: EntityId, from_x: f64) {
    let transform = store.transform.must_mut(shell);
    let direction = if from_x <= transform.pos.x { 1.0 } else { -1.0 };
    transform.velocity.x = direction * enemy_kinematics::SHELL_SPEED;
    store.enemy.must_mut(shell).state = EnemyState::ShellMoving;
    store.life_span.remove(shell);
    debug!(shell = %shell, direction, "shell kicked");
}

// ---------------------------------------------------------------------------
// Enemies vs tiles
// ---------------------------------------------------------------------------

/// Moving enemies and shells collide with tiles: land on top, bounce off
/// walls by reversing horizontal velocity.
pub fn resolve_enemy_tiles(store: &mut EntityStore) {
    let enemies = store.tagged(Tag::Enemy).to_vec();
    let tiles = store.tagged(Tag::Tile).to_vec();
    for id in enemies {
        let Some(enemy) = store.enemy.get(id) else {
            continue;
        };
        if !enemy.is_moving_state() {
            continue;
        }
        let mut transform = *store.transform.must(id);
        let half = store.bounding_box.must(id).half_size;

        for &tile in &tiles {
            let tile_transform = *store.transform.must(tile);
            let tile_half = store.bounding_box.must(tile).half_size;
            let overlap = geometry::overlap(transform.pos, tile_transform.pos, half, tile_half);
            if !geometry::is_collision(overlap) {
                continue;
            }
            let prev_overlap = geometry::overlap(
                transform.prev_pos,
                tile_transform.prev_pos,
                half,
                tile_half,
            );
            match geometry::classify_direction(
                prev_overlap,
                transform.prev_pos,
                tile_transform.pos,
            ) {
                CollisionDirection::Top => {
                    transform.pos.y -= overlap.y;
                    transform.velocity.y = 0.0;
                }
                CollisionDirection::Right => {
                    transform.pos.x += overlap.x;
                    transform.velocity.x = -transform.velocity.x;
                }
                CollisionDirection::Left => {
                    transform.pos.x -= overlap.x;
                    transform.velocity.x = -transform.velocity.x;
                }
                _ => {}
            }
        }

        *store.transform.must_mut(id) = transform;
    }
}

// ---------------------------------------------------------------------------
// Enemies vs enemies
// ---------------------------------------------------------------------------

/// Pairwise enemy contact: a moving shell destroys any active enemy it
/// touches and is spent in the impact; two walkers push apart and turn away
/// from each other, leftmost walking left.
pub fn resolve_enemy_pairs(store: &mut EntityStore) {
    let enemies = store.tagged(Tag::Enemy).to_vec();
    for i in 0..enemies.len() {
        let a = enemies[i];
        for &b in &enemies[i + 1..] {
            if !store.is_active(a) {
                break;
            }
            if !store.is_active(b) {
                continue;
            }
            let enemy_a = *store.enemy.must(a);
            let enemy_b = *store.enemy.must(b);
            if !enemy_a.is_moving_state() || !enemy_b.is_moving_state() {
                continue;
            }
            let mut ta = *store.transform.must(a);
            let mut tb = *store.transform.must(b);
            let half_a = store.bounding_box.must(a).half_size;
            let half_b = store.bounding_box.must(b).half_size;
            let overlap = geometry::overlap(ta.pos, tb.pos, half_a, half_b);
            if !geometry::is_collision(overlap) {
                continue;
            }

            if enemy_a.state == EnemyState::ShellMoving
                || enemy_b.state == EnemyState::ShellMoving
            {
                destroy_in_shell_contact(store, a, ta.pos, enemy_a.kind);
                destroy_in_shell_contact(store, b, tb.pos, enemy_b.kind);
                continue;
            }

            // Half-overlap push-apart; velocities forced outward.
            if ta.pos.x <= tb.pos.x {
                if ta.velocity.x > 0.0 {
                    ta.velocity.x = -ta.velocity.x;
                }
                if tb.velocity.x < 0.0 {
                    tb.velocity.x = -tb.velocity.x;
                }
                ta.pos.x -= overlap.x / 2.0;
                tb.pos.x += overlap.x / 2.0;
            } else {
                if tb.velocity.x > 0.0 {
                    tb.velocity.x = -tb.velocity.x;
                }
                if ta.velocity.x < 0.0 {
                    ta.velocity.x = -ta.velocity.x;
                }
                ta.pos.x += overlap.x / 2.0;
                tb.pos.x -= overlap.x / 2.0;
            }
            *store.transform.must_mut(a) = ta;
            *store.transform.must_mut(b) = tb;
        }
    }
}

fn destroy_in_shell_contact(store: &mut EntityStore, enemy: EntityId, pos: Vec2, kind: EnemyKind) {
    store.destroy(enemy);
    let clip = match kind {
        EnemyKind::Goomba => clips::GOOMBA_DEAD,
        EnemyKind::Koopa => clips::KOOPA_SHELL,
    };
    spawn_effect(store, clip, pos);
    debug!(enemy = %enemy, "enemy destroyed in shell contact");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

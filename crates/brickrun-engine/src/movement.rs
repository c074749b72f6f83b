//! Player movement: per-tick state classification and integration.
//!
//! Movement is split in two passes. [`classify`] is pure state derivation: it
//! reads the input flags and current velocity and decides this tick's
//! [`AccelerationKind`], skid flag, and facing, without touching the physics.
//! [`integrate_player`] then turns that classification into acceleration,
//! applies the speed caps and snap rules, and advances the position.
//!
//! Grounded and airborne ticks use entirely separate tables and rules (see
//! [`crate::kinematics`]); the two paths are mutually exclusive per tick,
//! selected by `PlayerState::is_grounded`.

use brickrun_ecs::prelude::*;

use crate::kinematics::{airborne, enemy, grounded, vertical};

// ---------------------------------------------------------------------------
// State classification
// ---------------------------------------------------------------------------

/// Classify this tick's acceleration intent, skid flag, and facing.
///
/// Exactly one [`AccelerationKind`] wins, in fixed priority: decelerating
/// left, decelerating right, accelerating left, accelerating right, zero.
/// Grounded skidding is sticky: once skidding, the player keeps skidding for
/// as long as it keeps decelerating, which prevents single-tick flicker when
/// the opposing key is released mid-skid.
pub fn classify(input: &Input, transform: &Transform, state: &mut PlayerState) {
    let is_airborne = !state.is_grounded;
    let pressing_left = input.left;
    let pressing_right = input.right;
    let standing_still = transform.velocity.x == 0.0;
    let moving_right = transform.velocity.x > 0.0;
    let moving_left = transform.velocity.x < 0.0;

    let decelerating_left;
    let decelerating_right;
    let accelerating_left;
    let accelerating_right;
    let mut skidding = false;
    let mut facing = state.facing;

    if is_airborne {
        // Turning only; letting go of the keys does not decelerate mid-air
        // (no air friction), and there is no skid state.
        let changing_direction = (moving_left && pressing_right && !pressing_left)
            || (moving_right && pressing_left && !pressing_right);
        let above_initial_speed_threshold =
            state.initial_jump_x_speed.abs() >= airborne::INITIAL_SPEED_THRESHOLD_FOR_VEL;
        let max_x_speed = if above_initial_speed_threshold {
            airborne::ABOVE_IST_SPEED_LIMIT
        } else {
            airborne::BELOW_IST_SPEED_LIMIT
        };
        let below_max_speed =
            transform.velocity.x < max_x_speed && transform.velocity.x > -max_x_speed;

        decelerating_left = moving_right && changing_direction;
        decelerating_right = moving_left && changing_direction;
        accelerating_left = pressing_left
            && !pressing_right
            && (moving_left || standing_still)
            && below_max_speed;
        accelerating_right = pressing_right
            && !pressing_left
            && (standing_still || moving_right)
            && below_max_speed;
    } else {
        let running = input.run;
        let at_max_walk_speed = transform.velocity.x == grounded::MAX_WALK_SPEED
            || transform.velocity.x == -grounded::MAX_WALK_SPEED;
        let at_max_run_speed = transform.velocity.x == grounded::MAX_RUN_SPEED
            || transform.velocity.x == -grounded::MAX_RUN_SPEED;
        let walking_past_max_walk_speed =
            transform.velocity.x.abs() > grounded::MAX_WALK_SPEED && !running;
        // Stopping or turning: moving one way while pressing the other, or
        // while not pressing that way at all.
        let changing_direction = (moving_left && (pressing_right || !pressing_left))
            || (moving_right && (pressing_left || !pressing_right));
        let was_skidding = state.is_skidding;

        decelerating_left =
            moving_right && (changing_direction || walking_past_max_walk_speed);
        decelerating_right =
            moving_left && (changing_direction || walking_past_max_walk_speed);
        accelerating_left = pressing_left
            && !pressing_right
            && (moving_left || standing_still)
            && (!at_max_walk_speed || running)
            && !at_max_run_speed
            && !walking_past_max_walk_speed;
        accelerating_right = pressing_right
            && !pressing_left
            && (standing_still || moving_right)
            && (!at_max_walk_speed || running)
            && !at_max_run_speed
            && !walking_past_max_walk_speed;
        skidding = ((moving_right && pressing_left && !pressing_right)
            || (moving_left && pressing_right && !pressing_left))
            || ((decelerating_left || decelerating_right) && was_skidding);

        if skidding {
            // While skidding the sprite faces the direction of deceleration.
            facing = if decelerating_left {
                Facing::Left
            } else {
                Facing::Right
            };
        } else if transform.velocity.x < 0.0 {
            facing = Facing::Left;
        } else if transform.velocity.x > 0.0 {
            facing = Facing::Right;
        }
    }

    state.acceleration = if decelerating_left {
        AccelerationKind::DeceleratingLeft
    } else if decelerating_right {
        AccelerationKind::DeceleratingRight
    } else if accelerating_left {
        AccelerationKind::AcceleratingLeft
    } else if accelerating_right {
        AccelerationKind::AcceleratingRight
    } else {
        AccelerationKind::Zero
    };
    state.is_skidding = skidding;
    state.facing = facing;
}

// ---------------------------------------------------------------------------
// Player integration
// ---------------------------------------------------------------------------

/// Apply acceleration, clamps, and position integration for the player.
///
/// Must run exactly once per tick, after [`classify`] and before collision
/// resolution (which reads the `prev_pos` written here).
pub fn integrate_player(transform: &mut Transform, input: &mut Input, state: &mut PlayerState) {
    if state.is_grounded {
        integrate_grounded(transform, input, state);
    } else {
        integrate_airborne(transform, input, state);
    }
}

fn integrate_grounded(transform: &mut Transform, input: &mut Input, state: &mut PlayerState) {
    let running = input.run;
    let walking = !input.run;
    let skidding = state.is_skidding;

    let decelerating_left = state.acceleration == AccelerationKind::DeceleratingLeft;
    let decelerating_right = state.acceleration == AccelerationKind::DeceleratingRight;
    let accelerating_left = state.acceleration == AccelerationKind::AcceleratingLeft;
    let accelerating_right = state.acceleration == AccelerationKind::AcceleratingRight;

    // Step 1: this tick's horizontal acceleration.
    let acceleration_x = if running {
        grounded::RUN_ACC
    } else {
        grounded::WALK_ACC
    };
    let deceleration_x = if skidding {
        grounded::SKID_DEC
    } else {
        grounded::RELEASE_DEC
    };

    transform.accel_x = if decelerating_right {
        deceleration_x
    } else if decelerating_left {
        -deceleration_x
    } else if accelerating_right {
        acceleration_x
    } else if accelerating_left {
        -acceleration_x
    } else {
        0.0
    };

    // Step 2: apply to velocity.
    transform.velocity.x += transform.accel_x;

    let past_max_walk_speed = transform.velocity.x.abs() > grounded::MAX_WALK_SPEED;
    let past_max_run_speed = transform.velocity.x.abs() > grounded::MAX_RUN_SPEED;
    let below_min_walk_speed = transform.velocity.x.abs() < grounded::MIN_WALK_SPEED;
    let below_turnaround_speed = transform.velocity.x.abs() < grounded::SKID_TURNAROUND_SPEED;

    // Step 3: clamp/snap chain, first match wins.
    if past_max_walk_speed && accelerating_right && walking {
        transform.velocity.x = grounded::MAX_WALK_SPEED;
    } else if past_max_walk_speed && accelerating_left && walking {
        transform.velocity.x = -grounded::MAX_WALK_SPEED;
    } else if past_max_run_speed && accelerating_right && running {
        transform.velocity.x = grounded::MAX_RUN_SPEED;
    } else if past_max_run_speed && accelerating_left && running {
        transform.velocity.x = -grounded::MAX_RUN_SPEED;
    } else if below_min_walk_speed && accelerating_right {
        // No creeping below the minimum walk speed.
        transform.velocity.x = grounded::MIN_WALK_SPEED;
    } else if below_min_walk_speed && accelerating_left {
        transform.velocity.x = -grounded::MIN_WALK_SPEED;
    } else if (below_min_walk_speed || (below_turnaround_speed && skidding))
        && (decelerating_left || decelerating_right)
    {
        // Snap to exactly zero; no asymptotic drift.
        transform.velocity.x = 0.0;
    }

    let x_speed = transform.velocity.x;
    let at_small_speed = x_speed.abs() < vertical::SMALL_SPEED_THRESHOLD;
    let at_medium_speed = x_speed >= -vertical::MEDIUM_SPEED_THRESHOLD
        && x_speed <= vertical::MEDIUM_SPEED_THRESHOLD
        && !at_small_speed;
    let starting_jump = input.can_jump && input.jump;

    // Step 4: jump initiation selects the reduced-gravity tier by the
    // horizontal speed at launch.
    if starting_jump {
        transform.accel_y = if at_small_speed {
            vertical::REDUCED_GRAVITY_S
        } else if at_medium_speed {
            vertical::REDUCED_GRAVITY_M
        } else {
            vertical::REDUCED_GRAVITY_L
        };
    }

    // Step 5: gravity applies every tick, grounded or not.
    transform.velocity.y += transform.accel_y;

    // Step 6: jump launch overrides vertical velocity with the tier's
    // initial jump speed and fixes the arc's horizontal cap.
    if starting_jump {
        transform.velocity.y = if at_small_speed {
            -vertical::INITIAL_VELOCITY_S
        } else if at_medium_speed {
            -vertical::INITIAL_VELOCITY_M
        } else {
            -vertical::INITIAL_VELOCITY_L
        };

        input.can_jump = false;
        state.initial_jump_x_speed = transform.velocity.x;
        state.is_grounded = false;
    }

    // Step 7: advance position. Exactly once per tick.
    transform.prev_pos = transform.pos;
    transform.pos += transform.velocity;
}

fn integrate_airborne(transform: &mut Transform, input: &mut Input, state: &mut PlayerState) {
    let above_initial_speed_threshold_for_vel =
        state.initial_jump_x_speed.abs() >= airborne::INITIAL_SPEED_THRESHOLD_FOR_VEL;
    let above_current_speed_threshold =
        transform.velocity.x.abs() >= airborne::CURRENT_SPEED_THRESHOLD_FOR_ACC;
    let above_initial_speed_threshold_for_acc =
        state.initial_jump_x_speed.abs() >= airborne::INITIAL_SPEED_THRESHOLD_FOR_ACC;

    // Step 1: pick the acceleration/deceleration tier.
    let acceleration_x = if above_current_speed_threshold {
        airborne::ABOVE_CST_ACC
    } else {
        airborne::BELOW_CST_ACC
    };
    let deceleration_x = if above_current_speed_threshold {
        airborne::ABOVE_CST_DEC
    } else if above_initial_speed_threshold_for_acc {
        airborne::ABOVE_IST_DEC
    } else {
        airborne::BELOW_IST_DEC
    };

    transform.accel_x = match state.acceleration {
        AccelerationKind::AcceleratingLeft => -acceleration_x,
        AccelerationKind::AcceleratingRight => acceleration_x,
        AccelerationKind::DeceleratingLeft => -deceleration_x,
        AccelerationKind::DeceleratingRight => deceleration_x,
        AccelerationKind::Zero => 0.0,
    };

    // Step 2: apply to velocity.
    transform.velocity.x += transform.accel_x;

    // Step 3: the cap was fixed at jump start; later input cannot raise it.
    let speed_limit = if above_initial_speed_threshold_for_vel {
        airborne::ABOVE_IST_SPEED_LIMIT
    } else {
        airborne::BELOW_IST_SPEED_LIMIT
    };
    transform.velocity.x = transform.velocity.x.clamp(-speed_limit, speed_limit);

    let pressing_jump = input.jump;
    let had_reduced_gravity = transform.accel_y == vertical::REDUCED_GRAVITY_S
        || transform.accel_y == vertical::REDUCED_GRAVITY_M
        || transform.accel_y == vertical::REDUCED_GRAVITY_L;
    let falling = transform.velocity.y >= 0.0;

    // Step 4: the reduced-gravity phase ends when the jump key is released
    // or the apex is passed; the switch preserves the tier.
    if had_reduced_gravity && (!pressing_jump || falling) {
        transform.accel_y = if transform.accel_y == vertical::REDUCED_GRAVITY_S {
            vertical::GRAVITY_S
        } else if transform.accel_y == vertical::REDUCED_GRAVITY_M {
            vertical::GRAVITY_M
        } else {
            vertical::GRAVITY_L
        };
    }

    // Step 5: apply gravity.
    transform.velocity.y += transform.accel_y;

    // Step 6: terminal fall speed resets rather than saturates.
    if transform.velocity.y > vertical::MAX_DOWNWARD_SPEED {
        transform.velocity.y = vertical::RESET_DOWNWARD_SPEED;
    }

    // Step 7: advance position. Exactly once per tick.
    transform.prev_pos = transform.pos;
    transform.pos += transform.velocity;
}

// ---------------------------------------------------------------------------
// Enemy integration
// ---------------------------------------------------------------------------

/// Gravity and position integration for an active enemy or moving shell.
///
/// Dormant and shell-idle enemies do not move; the caller filters on
/// [`Enemy::is_moving_state`].
pub fn integrate_enemy(transform: &mut Transform) {
    transform.velocity.y += transform.accel_y;
    transform.prev_pos = transform.pos;
    transform.pos += transform.velocity;
}

/// Initial velocity and gravity for a freshly activated walking enemy.
pub fn enemy_walk_velocity() -> (f64, f64) {
    (-enemy::WALK_SPEED, enemy::GRAVITY)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

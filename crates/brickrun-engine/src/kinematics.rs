//! Empirically tuned kinematics tables, in world units per tick.
//!
//! These constants define the movement feel and are treated as an opaque
//! parameter set: they are not derived from anything, and changing any one of
//! them changes how the game plays. Grounded and airborne movement have
//! independent tables.

/// Grounded horizontal movement.
pub mod grounded {
    /// Speeds below this snap to zero (decelerating) or up to this value
    /// (accelerating) -- there is no sub-threshold creeping.
    pub const MIN_WALK_SPEED: f64 = 0.296875;
    /// Horizontal speed cap while walking.
    pub const MAX_WALK_SPEED: f64 = 6.25;
    /// Horizontal speed cap while running.
    pub const MAX_RUN_SPEED: f64 = 10.25;
    /// While skidding, speeds below this snap to zero.
    pub const SKID_TURNAROUND_SPEED: f64 = 2.25;
    /// Acceleration while walking.
    pub const WALK_ACC: f64 = 0.1484375;
    /// Acceleration while running.
    pub const RUN_ACC: f64 = 0.22265625;
    /// Deceleration after releasing the direction keys.
    pub const RELEASE_DEC: f64 = 0.203125;
    /// Deceleration while skidding (pressing against the motion).
    pub const SKID_DEC: f64 = 0.40625;
}

/// Airborne horizontal movement.
///
/// Acceleration tier is picked by the *current* horizontal speed (CST) and
/// the horizontal speed the jump *started* with (IST); the speed cap for the
/// whole arc is fixed at jump start.
pub mod airborne {
    /// CST: current-speed threshold for the acceleration tiers.
    pub const CURRENT_SPEED_THRESHOLD_FOR_ACC: f64 = 6.25;
    /// IST: initial-speed threshold for the deceleration tiers.
    pub const INITIAL_SPEED_THRESHOLD_FOR_ACC: f64 = 7.25;

    /// Acceleration when current speed < CST.
    pub const BELOW_CST_ACC: f64 = 0.1484375;
    /// Acceleration when current speed >= CST.
    pub const ABOVE_CST_ACC: f64 = 0.22265625;

    /// Deceleration when current speed >= CST.
    pub const ABOVE_CST_DEC: f64 = 0.22265625;
    /// Deceleration when IST <= initial speed and current speed < CST.
    pub const ABOVE_IST_DEC: f64 = 0.203125;
    /// Deceleration when initial speed < IST and current speed < CST.
    pub const BELOW_IST_DEC: f64 = 0.1484375;

    /// Initial-jump-speed threshold selecting the airborne speed cap.
    pub const INITIAL_SPEED_THRESHOLD_FOR_VEL: f64 = 6.25;
    /// Speed cap when the jump started below the threshold.
    pub const BELOW_IST_SPEED_LIMIT: f64 = 6.25;
    /// Speed cap when the jump started at or above the threshold.
    pub const ABOVE_IST_SPEED_LIMIT: f64 = 10.25;
}

/// Vertical movement: three jump tiers keyed on horizontal speed at jump
/// start. Holding the jump key keeps the tier's reduced gravity; releasing it
/// (or starting to fall) switches to the same tier's full gravity.
pub mod vertical {
    /// SST: below this horizontal speed, the small jump tier applies.
    pub const SMALL_SPEED_THRESHOLD: f64 = 4.0;
    /// MST: up to this horizontal speed, the medium jump tier applies.
    pub const MEDIUM_SPEED_THRESHOLD: f64 = 9.2490234375;
    /// LST: above this horizontal speed, the large jump tier applies.
    pub const LARGE_SPEED_THRESHOLD: f64 = 9.25;

    // Small tier (< SST).
    pub const INITIAL_VELOCITY_S: f64 = 16.0;
    pub const REDUCED_GRAVITY_S: f64 = 0.5;
    pub const GRAVITY_S: f64 = 1.75;

    // Medium tier (>= SST and <= MST).
    pub const INITIAL_VELOCITY_M: f64 = 16.0;
    pub const REDUCED_GRAVITY_M: f64 = 0.46875;
    pub const GRAVITY_M: f64 = 1.5;

    // Large tier (>= LST).
    pub const INITIAL_VELOCITY_L: f64 = 20.0;
    pub const REDUCED_GRAVITY_L: f64 = 0.625;
    pub const GRAVITY_L: f64 = 2.25;

    /// Terminal fall speed. Exceeding it does not saturate: the speed is
    /// reset to [`RESET_DOWNWARD_SPEED`].
    pub const MAX_DOWNWARD_SPEED: f64 = 18.0;
    /// Fall speed to reset to after exceeding the terminal speed.
    pub const RESET_DOWNWARD_SPEED: f64 = 16.0;

    /// Upward bounce speed after stomping an enemy.
    pub const STOMP_VELOCITY: f64 = 17.25;
}

/// Enemy movement.
pub mod enemy {
    /// Enemies walk leftward at the player's max walk speed.
    pub const WALK_SPEED: f64 = super::grounded::MAX_WALK_SPEED;
    /// Kicked shells slide at the player's max run speed.
    pub const SHELL_SPEED: f64 = super::grounded::MAX_RUN_SPEED;
    /// Gravity applied to enemies (the large jump tier's full gravity).
    pub const GRAVITY: f64 = super::vertical::GRAVITY_L;
    /// Ticks an idle shell survives before expiring on its own.
    pub const SHELL_IDLE_TICKS: u32 = 600;
}

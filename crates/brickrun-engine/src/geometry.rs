//! Axis-aligned overlap computation and collision-direction classification.
//!
//! A collision exists between two boxes iff both components of their overlap
//! vector are strictly positive. Direction is classified from the
//! *previous-tick* overlap and positions: current-frame overlap alone cannot
//! tell "came from the left" apart from "came from above" when a box tunnels
//! diagonally into a corner within one tick, but the previous positions
//! recover the approach axis without sub-stepping.
//!
//! Coordinates are y-down, so [`CollisionDirection::Top`] means the moving
//! body approached from above the block (it is landing on it).

use brickrun_ecs::math::Vec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

/// Per-axis penetration depth between two boxes centered at `pos_a`/`pos_b`
/// with the given half-extents.
///
/// `result.x = half_a.x + half_b.x - |pos_a.x - pos_b.x|`, symmetric in y.
/// Either component may be negative (separation on that axis).
#[inline]
pub fn overlap(pos_a: Vec2, pos_b: Vec2, half_a: Vec2, half_b: Vec2) -> Vec2 {
    let delta = (pos_a - pos_b).abs();
    Vec2::new(
        half_a.x + half_b.x - delta.x,
        half_a.y + half_b.y - delta.y,
    )
}

/// Whether an overlap vector represents an actual collision.
#[inline]
pub fn is_collision(overlap: Vec2) -> bool {
    overlap.x > 0.0 && overlap.y > 0.0
}

// ---------------------------------------------------------------------------
// CollisionDirection
// ---------------------------------------------------------------------------

/// The side of the block the moving body approached from, relative to the
/// block: `Top` means it came from above, `Left` from the left, and the
/// diagonals cover corner-clipping approaches where neither axis overlapped
/// on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionDirection {
    Top,
    Bottom,
    Left,
    Right,
    DiagTopLeft,
    DiagTopRight,
    DiagBottomLeft,
    DiagBottomRight,
}

impl CollisionDirection {
    /// Whether this is one of the four corner-approach directions.
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            CollisionDirection::DiagTopLeft
                | CollisionDirection::DiagTopRight
                | CollisionDirection::DiagBottomLeft
                | CollisionDirection::DiagBottomRight
        )
    }
}

/// Classify the approach direction of body A relative to body B.
///
/// `prev_overlap` is the overlap of the two boxes at their *previous-tick*
/// positions; `prev_pos_a` is A's previous position and `prev_pos_b` is B's
/// position (static blocks have `prev_pos == pos`).
///
/// Decision order:
/// 1. Vertical overlap last tick means a horizontal approach: `Left`/`Right`
///    by x ordering.
/// 2. Otherwise, horizontal overlap last tick means a vertical approach:
///    `Top`/`Bottom` by y ordering.
/// 3. Otherwise neither axis overlapped: a diagonal approach, combining both
///    orderings.
pub fn classify_direction(prev_overlap: Vec2, prev_pos_a: Vec2, prev_pos_b: Vec2) -> CollisionDirection {
    if prev_overlap.y > 0.0 {
        if prev_pos_a.x < prev_pos_b.x {
            CollisionDirection::Left
        } else {
            CollisionDirection::Right
        }
    } else if prev_overlap.x > 0.0 {
        if prev_pos_a.y < prev_pos_b.y {
            CollisionDirection::Top
        } else {
            CollisionDirection::Bottom
        }
    } else if prev_pos_a.y < prev_pos_b.y {
        if prev_pos_a.x < prev_pos_b.x {
            CollisionDirection::DiagTopLeft
        } else {
            CollisionDirection::DiagTopRight
        }
    } else if prev_pos_a.x < prev_pos_b.x {
        CollisionDirection::DiagBottomLeft
    } else {
        CollisionDirection::DiagBottomRight
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Vec2 = Vec2 { x: 32.0, y: 32.0 };

    #[test]
    fn overlap_of_touching_boxes_is_zero() {
        // Exactly side by side: zero x-overlap, full y-overlap.
        let o = overlap(Vec2::new(0.0, 0.0), Vec2::new(64.0, 0.0), HALF, HALF);
        assert_eq!(o, Vec2::new(0.0, 64.0));
        assert!(!is_collision(o), "touching is not colliding");
    }

    #[test]
    fn overlap_of_penetrating_boxes_is_positive() {
        let o = overlap(Vec2::new(0.0, 0.0), Vec2::new(60.0, 10.0), HALF, HALF);
        assert_eq!(o, Vec2::new(4.0, 54.0));
        assert!(is_collision(o));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(40.0, -8.0);
        let ha = Vec2::new(32.0, 16.0);
        let hb = Vec2::new(8.0, 24.0);
        assert_eq!(overlap(a, b, ha, hb), overlap(b, a, hb, ha));
    }

    #[test]
    fn separated_boxes_have_negative_component() {
        let o = overlap(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), HALF, HALF);
        assert!(o.x < 0.0);
        assert!(!is_collision(o));
    }

    #[test]
    fn horizontal_approach_classifies_left_right() {
        // Vertically aligned last tick (y-overlap positive), A to the left.
        let prev = Vec2::new(-2.0, 64.0);
        assert_eq!(
            classify_direction(prev, Vec2::new(0.0, 0.0), Vec2::new(64.0, 0.0)),
            CollisionDirection::Left
        );
        assert_eq!(
            classify_direction(prev, Vec2::new(64.0, 0.0), Vec2::new(0.0, 0.0)),
            CollisionDirection::Right
        );
    }

    #[test]
    fn vertical_approach_classifies_top_bottom() {
        // Horizontally aligned last tick (x-overlap positive), A above (y-down).
        let prev = Vec2::new(64.0, -2.0);
        assert_eq!(
            classify_direction(prev, Vec2::new(0.0, 0.0), Vec2::new(0.0, 64.0)),
            CollisionDirection::Top
        );
        assert_eq!(
            classify_direction(prev, Vec2::new(0.0, 64.0), Vec2::new(0.0, 0.0)),
            CollisionDirection::Bottom
        );
    }

    #[test]
    fn corner_approach_classifies_diagonals() {
        // No overlap on either axis last tick.
        let prev = Vec2::new(-1.0, -1.0);
        let b = Vec2::new(64.0, 64.0);
        assert_eq!(
            classify_direction(prev, Vec2::new(0.0, 0.0), b),
            CollisionDirection::DiagTopLeft
        );
        assert_eq!(
            classify_direction(prev, Vec2::new(128.0, 0.0), b),
            CollisionDirection::DiagTopRight
        );
        assert_eq!(
            classify_direction(prev, Vec2::new(0.0, 128.0), b),
            CollisionDirection::DiagBottomLeft
        );
        assert_eq!(
            classify_direction(prev, Vec2::new(128.0, 128.0), b),
            CollisionDirection::DiagBottomRight
        );
    }

    #[test]
    fn landing_on_a_block_is_top() {
        // Player falling onto a tile: last tick it was fully above the tile
        // (x-overlap but no y-overlap), this tick it penetrates.
        let player_prev = Vec2::new(100.0, 600.0);
        let tile_pos = Vec2::new(96.0, 672.0);
        let prev = overlap(player_prev, tile_pos, HALF, HALF);
        assert!(prev.x > 0.0 && prev.y <= 0.0);
        assert_eq!(
            classify_direction(prev, player_prev, tile_pos),
            CollisionDirection::Top
        );
    }
}

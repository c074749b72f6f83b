//! Property tests for overlap computation and direction classification.

use brickrun_ecs::math::Vec2;
use brickrun_engine::geometry::{classify_direction, is_collision, overlap, CollisionDirection};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -10_000.0..10_000.0f64
}

fn extent() -> impl Strategy<Value = f64> {
    1.0..256.0f64
}

proptest! {
    /// Overlap is symmetric in its two boxes.
    #[test]
    fn overlap_is_symmetric(
        ax in coord(), ay in coord(), bx in coord(), by in coord(),
        hax in extent(), hay in extent(), hbx in extent(), hby in extent(),
    ) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        let ha = Vec2::new(hax, hay);
        let hb = Vec2::new(hbx, hby);
        prop_assert_eq!(overlap(a, b, ha, hb), overlap(b, a, hb, ha));
    }

    /// Identical boxes at the same position overlap by their full extent.
    #[test]
    fn coincident_boxes_overlap_fully(
        x in coord(), y in coord(), hx in extent(), hy in extent(),
    ) {
        let pos = Vec2::new(x, y);
        let half = Vec2::new(hx, hy);
        let o = overlap(pos, pos, half, half);
        prop_assert_eq!(o, Vec2::new(2.0 * hx, 2.0 * hy));
        prop_assert!(is_collision(o));
    }

    /// Boxes separated on the x axis never collide, however their y extents
    /// relate.
    #[test]
    fn separated_boxes_never_collide(
        x in coord(), ay in coord(), by in coord(),
        hx in extent(), hay in extent(), hby in extent(),
        gap in 0.001..1_000.0f64,
    ) {
        let a = Vec2::new(x, ay);
        let b = Vec2::new(x + 2.0 * hx + gap, by);
        prop_assert!(!is_collision(overlap(a, b, Vec2::new(hx, hay), Vec2::new(hx, hby))));
    }

    /// If the previous y-extents overlapped, classification is always a
    /// cardinal left/right matching the x ordering.
    #[test]
    fn vertical_overlap_classifies_horizontal(
        ax in coord(), bx in coord(), y in coord(),
        prev_x in -100.0..100.0f64, prev_y in 0.001..100.0f64,
    ) {
        prop_assume!(ax != bx);
        let dir = classify_direction(
            Vec2::new(prev_x, prev_y),
            Vec2::new(ax, y),
            Vec2::new(bx, y),
        );
        if ax < bx {
            prop_assert_eq!(dir, CollisionDirection::Left);
        } else {
            prop_assert_eq!(dir, CollisionDirection::Right);
        }
    }

    /// If neither previous extent overlapped, classification is always one of
    /// the four diagonals.
    #[test]
    fn no_overlap_classifies_diagonal(
        ax in coord(), ay in coord(), bx in coord(), by in coord(),
        prev_x in -100.0..0.0f64, prev_y in -100.0..0.0f64,
    ) {
        let dir = classify_direction(
            Vec2::new(prev_x, prev_y),
            Vec2::new(ax, ay),
            Vec2::new(bx, by),
        );
        prop_assert!(dir.is_diagonal());
    }

    /// Every classification is deterministic: same inputs, same direction.
    #[test]
    fn classification_is_deterministic(
        px in -100.0..100.0f64, py in -100.0..100.0f64,
        ax in coord(), ay in coord(), bx in coord(), by in coord(),
    ) {
        let prev = Vec2::new(px, py);
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        prop_assert_eq!(classify_direction(prev, a, b), classify_direction(prev, a, b));
    }
}

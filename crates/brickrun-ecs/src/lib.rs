//! Brickrun ECS -- entity/component storage for the platformer simulation.
//!
//! Entities are ids in a tag-indexed store; components live in typed dense
//! columns. Creation and destruction are deferred: both take effect at the
//! next [`EntityStore::flush`](store::EntityStore::flush), so systems can
//! iterate the live views while spawning and destroying freely within a tick.
//!
//! # Quick Start
//!
//! ```
//! use brickrun_ecs::prelude::*;
//!
//! let mut store = EntityStore::new();
//! let tile = store.create(Tag::Tile);
//! store.transform.insert(tile, Transform::at(Vec2::new(32.0, 32.0)));
//! store.bounding_box.insert(tile, BoundingBox::new(Vec2::new(64.0, 64.0)));
//!
//! // Invisible until the store is flushed.
//! assert!(store.tagged(Tag::Tile).is_empty());
//! store.flush();
//! assert_eq!(store.tagged(Tag::Tile), &[tile]);
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod math;
pub mod store;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{
        AccelerationKind, AnimationRef, BoundingBox, Enemy, EnemyKind, EnemyState, Facing, Input,
        LifeSpan, PlayerState, Transform,
    };
    pub use crate::entity::{EntityId, Tag};
    pub use crate::math::Vec2;
    pub use crate::store::{ComponentColumn, EntityStore};
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn spawn_tile(store: &mut EntityStore, x: f64, y: f64) -> EntityId {
        let tile = store.create(Tag::Tile);
        store.transform.insert(tile, Transform::at(Vec2::new(x, y)));
        store
            .bounding_box
            .insert(tile, BoundingBox::new(Vec2::new(64.0, 64.0)));
        tile
    }

    #[test]
    fn spawn_attach_query_roundtrip() {
        let mut store = EntityStore::new();
        let tile = spawn_tile(&mut store, 96.0, 704.0);
        store.flush();

        assert_eq!(store.tag_of(tile), Some(Tag::Tile));
        assert_eq!(store.transform.must(tile).pos, Vec2::new(96.0, 704.0));
        assert_eq!(
            store.bounding_box.must(tile).half_size,
            Vec2::new(32.0, 32.0)
        );
    }

    #[test]
    fn systems_can_destroy_and_spawn_while_iterating() {
        let mut store = EntityStore::new();
        for i in 0..4 {
            spawn_tile(&mut store, i as f64 * 64.0, 704.0);
        }
        store.flush();

        // A system iterating tiles destroys some and spawns replacements;
        // membership stays stable for the rest of the tick.
        let tiles = store.tagged(Tag::Tile).to_vec();
        for &tile in &tiles {
            if store.transform.must(tile).pos.x < 128.0 {
                store.destroy(tile);
                spawn_tile(&mut store, 512.0, 704.0);
            }
        }
        assert_eq!(store.tagged(Tag::Tile).len(), 4, "views unchanged mid-tick");

        store.flush();
        assert_eq!(store.tagged(Tag::Tile).len(), 4, "2 removed, 2 added");
        for &tile in store.tagged(Tag::Tile) {
            assert!(store.is_active(tile));
        }
    }

    #[test]
    fn mixed_tags_stay_in_their_views() {
        let mut store = EntityStore::new();
        let player = store.create(Tag::Player);
        store.input.insert(player, Input::default());
        store.player_state.insert(player, PlayerState::default());
        let goomba = store.create(Tag::Enemy);
        store
            .enemy
            .insert(goomba, Enemy::dormant(EnemyKind::Goomba, 128.0));
        let effect = store.create(Tag::AnimationEffect);
        store
            .animation
            .insert(effect, AnimationRef::new("GoombaDead", false));
        store.flush();

        assert_eq!(store.tagged(Tag::Player), &[player]);
        assert_eq!(store.tagged(Tag::Enemy), &[goomba]);
        assert_eq!(store.tagged(Tag::AnimationEffect), &[effect]);
        assert!(store.tagged(Tag::Tile).is_empty());
        assert_eq!(store.entities().len(), 3);
    }
}

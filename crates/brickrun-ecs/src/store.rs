//! The [`EntityStore`] owns all entities and their component columns, with
//! two-phase (deferred) add/remove semantics.
//!
//! Systems iterate the live entity views freely during a tick; creations go
//! onto a pending list and destructions only mark the entity inactive.
//! [`EntityStore::flush`] -- called once at the top of each tick -- is the
//! single operation that mutates view membership: it commits pending entities
//! into the live views and physically removes inactive ones from every view
//! and every component column. This discipline exists purely for
//! iterator-invalidation safety on one thread; there is no parallelism.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::component::{
    AnimationRef, BoundingBox, Enemy, Input, LifeSpan, PlayerState, Transform,
};
use crate::entity::{EntityId, Tag};

// ---------------------------------------------------------------------------
// ComponentColumn
// ---------------------------------------------------------------------------

/// Dense, typed storage for one component kind.
///
/// Values live in a dense vector (stable iteration, cache-friendly) with an
/// entity-to-row map on the side. Removal swap-removes the row and patches
/// the map, so row order is not meaningful -- ordered iteration always goes
/// through the store's entity views, never through a column.
#[derive(Debug)]
pub struct ComponentColumn<T> {
    name: &'static str,
    dense: Vec<(EntityId, T)>,
    rows: HashMap<EntityId, usize>,
}

impl<T> ComponentColumn<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            dense: Vec::new(),
            rows: HashMap::new(),
        }
    }

    /// Attach or overwrite this component on `entity`.
    pub fn insert(&mut self, entity: EntityId, value: T) {
        match self.rows.get(&entity) {
            Some(&row) => self.dense[row].1 = value,
            None => {
                self.rows.insert(entity, self.dense.len());
                self.dense.push((entity, value));
            }
        }
    }

    /// Whether `entity` has this component.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.rows.contains_key(&entity)
    }

    /// Look up the component, if present.
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.rows.get(&entity).map(|&row| &self.dense[row].1)
    }

    /// Mutable lookup, if present.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        match self.rows.get(&entity) {
            Some(&row) => Some(&mut self.dense[row].1),
            None => None,
        }
    }

    /// Look up the component, panicking if absent.
    ///
    /// Absence is a contract violation (the caller asserted the entity has
    /// this component kind), so it fails loudly rather than degrading.
    #[track_caller]
    pub fn must(&self, entity: EntityId) -> &T {
        match self.get(entity) {
            Some(value) => value,
            None => panic!("entity {entity} has no {} component", self.name),
        }
    }

    /// Mutable variant of [`must`](Self::must).
    #[track_caller]
    pub fn must_mut(&mut self, entity: EntityId) -> &mut T {
        let name = self.name;
        match self.get_mut(entity) {
            Some(value) => value,
            None => panic!("entity {entity} has no {name} component"),
        }
    }

    /// Detach the component from `entity`. No-op if absent.
    pub fn remove(&mut self, entity: EntityId) {
        if let Some(row) = self.rows.remove(&entity) {
            self.dense.swap_remove(row);
            if let Some(&(moved, _)) = self.dense.get(row) {
                self.rows.insert(moved, row);
            }
        }
    }

    /// Number of entities carrying this component.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether no entity carries this component.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EntityStore
// ---------------------------------------------------------------------------

/// Owner of all entities, tag-indexed views, and component columns.
pub struct EntityStore {
    /// All committed entities, in creation order.
    live: Vec<EntityId>,
    /// One insertion-ordered view per tag.
    by_tag: [Vec<EntityId>; Tag::ALL.len()],
    /// Tag of every created entity (pending included).
    tags: HashMap<EntityId, Tag>,
    /// Entities created this tick, waiting for the next flush.
    pending: Vec<EntityId>,
    /// Entities marked destroyed, removed on the next flush.
    inactive: HashSet<EntityId>,
    /// Monotonic creation counter; doubles as the id source.
    total_created: u64,

    /// Position / velocity / acceleration.
    pub transform: ComponentColumn<Transform>,
    /// Axis-aligned collision box.
    pub bounding_box: ComponentColumn<BoundingBox>,
    /// Player input flags.
    pub input: ComponentColumn<Input>,
    /// Player movement state.
    pub player_state: ComponentColumn<PlayerState>,
    /// Enemy behavior state.
    pub enemy: ComponentColumn<Enemy>,
    /// Tick countdown to self-destruction.
    pub life_span: ComponentColumn<LifeSpan>,
    /// Current animation clip + playback cursor.
    pub animation: ComponentColumn<AnimationRef>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            live: Vec::new(),
            by_tag: Default::default(),
            tags: HashMap::new(),
            pending: Vec::new(),
            inactive: HashSet::new(),
            total_created: 0,
            transform: ComponentColumn::new("Transform"),
            bounding_box: ComponentColumn::new("BoundingBox"),
            input: ComponentColumn::new("Input"),
            player_state: ComponentColumn::new("PlayerState"),
            enemy: ComponentColumn::new("Enemy"),
            life_span: ComponentColumn::new("LifeSpan"),
            animation: ComponentColumn::new("AnimationRef"),
        }
    }

    /// Create a new entity with the given tag.
    ///
    /// The entity is queued for the next [`flush`](Self::flush): it is absent
    /// from all views until then, but the returned id is immediately valid
    /// for component attachment.
    pub fn create(&mut self, tag: Tag) -> EntityId {
        self.total_created += 1;
        let id = EntityId::new(self.total_created);
        self.tags.insert(id, tag);
        self.pending.push(id);
        id
    }

    /// Mark an entity destroyed.
    ///
    /// The entity stays present in all views until the next
    /// [`flush`](Self::flush), so systems mid-iteration never observe a
    /// membership change. Destroying an unknown or already-destroyed id is a
    /// no-op.
    pub fn destroy(&mut self, entity: EntityId) {
        if self.tags.contains_key(&entity) {
            self.inactive.insert(entity);
        }
    }

    /// Whether the entity exists and is not marked destroyed.
    pub fn is_active(&self, entity: EntityId) -> bool {
        self.tags.contains_key(&entity) && !self.inactive.contains(&entity)
    }

    /// Commit pending creations and physically remove destroyed entities.
    ///
    /// This is the only operation that changes view membership. Call it once
    /// at the top of every tick, before any system iterates.
    pub fn flush(&mut self) {
        // Commit this tick's creations. An entity destroyed while still
        // pending is dropped without ever becoming visible.
        let added = self.pending.len();
        for id in std::mem::take(&mut self.pending) {
            if self.inactive.contains(&id) {
                continue;
            }
            let tag = self.tags[&id];
            self.live.push(id);
            self.by_tag[tag.index()].push(id);
        }

        // Physically remove everything marked inactive.
        let removed = self.inactive.len();
        if removed > 0 {
            let inactive = std::mem::take(&mut self.inactive);
            self.live.retain(|id| !inactive.contains(id));
            for view in &mut self.by_tag {
                view.retain(|id| !inactive.contains(id));
            }
            for id in inactive {
                self.tags.remove(&id);
                self.remove_all_components(id);
            }
        }

        if added > 0 || removed > 0 {
            debug!(added, removed, live = self.live.len(), "entity store flushed");
        }
    }

    fn remove_all_components(&mut self, id: EntityId) {
        self.transform.remove(id);
        self.bounding_box.remove(id);
        self.input.remove(id);
        self.player_state.remove(id);
        self.enemy.remove(id);
        self.life_span.remove(id);
        self.animation.remove(id);
    }

    /// All live entities, in creation order. Excludes pending entities and
    /// includes inactive ones until the next flush.
    pub fn entities(&self) -> &[EntityId] {
        &self.live
    }

    /// Live entities with the given tag, in creation order.
    pub fn tagged(&self, tag: Tag) -> &[EntityId] {
        &self.by_tag[tag.index()]
    }

    /// The tag an entity was created with, if it still exists.
    pub fn tag_of(&self, entity: EntityId) -> Option<Tag> {
        self.tags.get(&entity).copied()
    }

    /// Total entities ever created. Monotonic; never decreases.
    pub fn total_created(&self) -> u64 {
        self.total_created
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! The playfield: entity store, clip catalog, and the fixed-step tick loop.
//!
//! One [`Playfield::tick`] advances the whole simulation by one step,
//! single-threaded and in a fixed system order, so identical level data and
//! identical action streams replay identical runs.

use brickrun_ecs::prelude::*;
use tracing::{debug, warn};

use crate::animation::{self, clips, ClipCatalog};
use crate::collision;
use crate::input::{apply_action, Action, DebugFlags};
use crate::kinematics::vertical;
use crate::level::{grid_to_world, SpawnCommand, StaticKind};
use crate::movement;
use crate::EngineError;

// ---------------------------------------------------------------------------
// PlayfieldConfig
// ---------------------------------------------------------------------------

/// World dimensions and player spawn point.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayfieldConfig {
    /// Window size in world units; the bottom edge is `window_size.y`
    /// (y-down) and falling past it is fatal.
    pub window_size: Vec2,
    /// Grid cell size for level coordinates.
    pub cell_size: Vec2,
    /// Player spawn point in grid coordinates.
    pub player_spawn: (f64, f64),
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            window_size: Vec2::new(1280.0, 768.0),
            cell_size: Vec2::new(64.0, 64.0),
            player_spawn: (4.0, 7.0),
        }
    }
}

impl PlayfieldConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if self.window_size.x <= 0.0 || self.window_size.y <= 0.0 {
            return Err(EngineError::InvalidConfig {
                reason: "window size must be positive".to_string(),
            });
        }
        if self.cell_size.x <= 0.0 || self.cell_size.y <= 0.0 {
            return Err(EngineError::InvalidConfig {
                reason: "cell size must be positive".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Playfield
// ---------------------------------------------------------------------------

/// The running simulation.
pub struct Playfield {
    pub store: EntityStore,
    pub debug_flags: DebugFlags,
    catalog: ClipCatalog,
    config: PlayfieldConfig,
    player: EntityId,
    camera_x: f64,
    ticks: u64,
}

impl Playfield {
    pub fn new(config: PlayfieldConfig, catalog: ClipCatalog) -> Result<Self, EngineError> {
        config.validate()?;
        let mut playfield = Self {
            store: EntityStore::new(),
            debug_flags: DebugFlags::default(),
            catalog,
            config,
            player: EntityId::new(0),
            camera_x: 0.0,
            ticks: 0,
        };
        playfield.player = playfield.spawn_player();
        Ok(playfield)
    }

    /// The current player entity. Changes when the player dies and respawns.
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Camera x for the renderer: follows the player, never moves backwards.
    pub fn camera_x(&self) -> f64 {
        self.camera_x
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &PlayfieldConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ClipCatalog {
        &self.catalog
    }

    /// Fold an input event into the player's input flags.
    pub fn apply(&mut self, action: Action) {
        if let Some(input) = self.store.input.get_mut(self.player) {
            apply_action(input, &mut self.debug_flags, action);
        }
    }

    // -- spawning -----------------------------------------------------------

    /// Spawn every entity a parsed level names. Entities become visible to
    /// the systems at the next tick's flush.
    pub fn load(&mut self, commands: &[SpawnCommand]) {
        for command in commands {
            match command {
                SpawnCommand::Static { kind, clip, gx, gy } => {
                    self.spawn_static(*kind, clip, *gx, *gy);
                }
                SpawnCommand::Enemy {
                    kind,
                    gx,
                    gy,
                    activation_cells,
                } => {
                    self.spawn_enemy(*kind, *gx, *gy, *activation_cells);
                }
            }
        }
    }

    fn spawn_player(&mut self) -> EntityId {
        let (gx, gy) = self.config.player_spawn;
        let size = self.config.cell_size;
        let pos = grid_to_world(gx, gy, size, self.config.cell_size, self.config.window_size.y);

        let player = self.store.create(Tag::Player);
        let mut transform = Transform::at(pos);
        transform.accel_y = vertical::GRAVITY_S;
        self.store.transform.insert(player, transform);
        self.store.bounding_box.insert(player, BoundingBox::new(size));
        self.store.input.insert(player, Input::default());
        self.store.player_state.insert(player, PlayerState::default());
        self.store
            .animation
            .insert(player, AnimationRef::new(clips::PLAYER_STAND, true));
        debug!(player = %player, x = pos.x, y = pos.y, "player spawned");
        player
    }

    /// Spawn a tile or decoration. A clip the catalog does not know is a
    /// level/asset mismatch: logged, spawn skipped.
    pub fn spawn_static(&mut self, kind: StaticKind, clip: &str, gx: f64, gy: f64) -> Option<EntityId> {
        let Some(clip_data) = self.catalog.get(clip) else {
            warn!(clip, gx, gy, "unknown clip for static entity, skipping spawn");
            return None;
        };
        let pos = grid_to_world(
            gx,
            gy,
            clip_data.size,
            self.config.cell_size,
            self.config.window_size.y,
        );

        let id = self.store.create(kind.tag());
        self.store.transform.insert(id, Transform::at(pos));
        self.store
            .animation
            .insert(id, AnimationRef::new(clip, true));
        if kind == StaticKind::Tile {
            self.store
                .bounding_box
                .insert(id, BoundingBox::new(self.config.cell_size));
        }
        Some(id)
    }

    /// Spawn a dormant enemy. It wakes when the player comes within
    /// `activation_cells` cells of its column.
    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        gx: f64,
        gy: f64,
        activation_cells: f64,
    ) -> EntityId {
        let size = self.config.cell_size;
        let pos = grid_to_world(gx, gy, size, self.config.cell_size, self.config.window_size.y);
        let walk_clip = match kind {
            EnemyKind::Goomba => clips::GOOMBA_WALK,
            EnemyKind::Koopa => clips::KOOPA_WALK,
        };

        let id = self.store.create(Tag::Enemy);
        let mut transform = Transform::at(pos);
        let (walk_x, gravity) = movement::enemy_walk_velocity();
        transform.velocity.x = walk_x;
        transform.accel_y = gravity;
        self.store.transform.insert(id, transform);
        self.store.bounding_box.insert(id, BoundingBox::new(size));
        self.store.enemy.insert(
            id,
            Enemy::dormant(kind, (gx - activation_cells) * self.config.cell_size.x),
        );
        self.store
            .animation
            .insert(id, AnimationRef::new(walk_clip, true));
        id
    }

    // -- the tick -----------------------------------------------------------

    /// Advance the simulation one step.
    pub fn tick(&mut self) {
        self.store.flush();

        if !self.store.is_active(self.player) {
            self.player = self.spawn_player();
        }

        self.activate_enemies();
        self.classify_player();
        self.integrate();

        collision::resolve_player(&mut self.store, self.player);
        collision::resolve_enemy_tiles(&mut self.store);
        collision::resolve_enemy_pairs(&mut self.store);

        animation::select_player(&mut self.store, self.player, &self.catalog);
        animation::advance(&mut self.store, &self.catalog);
        animation::tick_life_spans(&mut self.store);

        self.cleanup_out_of_bounds();

        if let Some(transform) = self.store.transform.get(self.player) {
            if transform.pos.x > self.camera_x {
                self.camera_x = transform.pos.x;
            }
        }
        self.ticks += 1;
    }

    /// Wake dormant enemies once the player is close enough.
    fn activate_enemies(&mut self) {
        let Some(player_x) = self.store.transform.get(self.player).map(|t| t.pos.x) else {
            return;
        };
        for id in self.store.tagged(Tag::Enemy).to_vec() {
            let Some(enemy) = self.store.enemy.get_mut(id) else {
                continue;
            };
            if enemy.state == EnemyState::Dormant && enemy.activation_x <= player_x {
                enemy.state = EnemyState::Active;
                debug!(enemy = %id, "enemy activated");
            }
        }
    }

    fn classify_player(&mut self) {
        let Some(transform) = self.store.transform.get(self.player).copied() else {
            return;
        };
        let input = *self.store.input.must(self.player);
        let state = self.store.player_state.must_mut(self.player);
        movement::classify(&input, &transform, state);
    }

    fn integrate(&mut self) {
        if self.store.transform.contains(self.player) {
            let mut transform = *self.store.transform.must(self.player);
            let mut input = *self.store.input.must(self.player);
            let mut state = *self.store.player_state.must(self.player);
            movement::integrate_player(&mut transform, &mut input, &mut state);
            *self.store.transform.must_mut(self.player) = transform;
            *self.store.input.must_mut(self.player) = input;
            *self.store.player_state.must_mut(self.player) = state;
        }

        for id in self.store.tagged(Tag::Enemy).to_vec() {
            let Some(enemy) = self.store.enemy.get(id) else {
                continue;
            };
            if !enemy.is_moving_state() {
                continue;
            }
            if let Some(transform) = self.store.transform.get_mut(id) {
                movement::integrate_enemy(transform);
            }
        }
    }

    /// Destroy anything that fell below the window. The player is destroyed
    /// at most once and respawns at the next tick's flush.
    fn cleanup_out_of_bounds(&mut self) {
        let floor = self.config.window_size.y;
        for id in self.store.entities().to_vec() {
            let Some(transform) = self.store.transform.get(id) else {
                continue;
            };
            let half_height = self
                .store
                .bounding_box
                .get(id)
                .map_or(self.config.cell_size.y / 2.0, |b| b.half_size.y);
            if transform.pos.y - half_height > floor {
                if id == self.player {
                    debug!(player = %id, "player fell out of the world");
                }
                self.store.destroy(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

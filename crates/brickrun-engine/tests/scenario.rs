//! End-to-end simulation scenarios driven through the playfield tick loop.

use brickrun_engine::kinematics::{enemy as enemy_kinematics, grounded, vertical};
use brickrun_engine::prelude::*;

/// A playfield with a long brick floor directly under the player spawn.
///
/// The spawn cell is (4, 7), so a floor at grid y 6 catches the player on the
/// first tick.
fn playfield_with_floor() -> Playfield {
    let mut playfield =
        Playfield::new(PlayfieldConfig::default(), ClipCatalog::with_defaults()).unwrap();
    playfield.load(&parse_level("TileRangeHorizontal Brick 0 6 60"));
    playfield.tick(); // flush the level and settle onto the floor
    playfield
}

fn player_pos(playfield: &Playfield) -> Vec2 {
    playfield.store.transform.must(playfield.player()).pos
}

#[test]
fn player_at_rest_on_a_tile_does_not_drift() {
    let mut playfield = playfield_with_floor();
    let rest = player_pos(&playfield);

    for _ in 0..10 {
        playfield.tick();
        assert_eq!(player_pos(&playfield), rest, "no drift while idle");
        let t = playfield.store.transform.must(playfield.player());
        assert_eq!(t.velocity, Vec2::ZERO);
    }
    assert!(
        playfield
            .store
            .player_state
            .must(playfield.player())
            .is_grounded
    );
}

#[test]
fn holding_right_reaches_and_holds_the_walk_cap() {
    let mut playfield = playfield_with_floor();
    playfield.apply(Action::start(ActionName::Right));

    for _ in 0..60 {
        playfield.tick();
        let vx = playfield
            .store
            .transform
            .must(playfield.player())
            .velocity
            .x;
        assert!(vx <= grounded::MAX_WALK_SPEED, "walk cap violated: {vx}");
    }
    let vx = playfield
        .store
        .transform
        .must(playfield.player())
        .velocity
        .x;
    assert_eq!(vx, grounded::MAX_WALK_SPEED);
}

#[test]
fn jump_launches_and_lands_back_on_the_floor() {
    let mut playfield = playfield_with_floor();
    let rest = player_pos(&playfield);

    playfield.apply(Action::start(ActionName::Jump));
    playfield.tick();
    {
        let state = playfield.store.player_state.must(playfield.player());
        assert!(!state.is_grounded);
        let t = playfield.store.transform.must(playfield.player());
        assert!(t.velocity.y < 0.0, "moving up after launch");
    }
    playfield.apply(Action::end(ActionName::Jump));

    let mut landed_at = None;
    for i in 0..120 {
        playfield.tick();
        if playfield
            .store
            .player_state
            .must(playfield.player())
            .is_grounded
        {
            landed_at = Some(i);
            break;
        }
    }
    assert!(landed_at.is_some(), "must land within the arc");
    assert_eq!(player_pos(&playfield), rest, "straight jump lands in place");
    assert!(
        playfield.store.input.must(playfield.player()).can_jump,
        "landing re-arms the jump"
    );
}

#[test]
fn free_fall_destroys_the_player_exactly_once_then_respawns() {
    // No floor at all.
    let mut playfield =
        Playfield::new(PlayfieldConfig::default(), ClipCatalog::with_defaults()).unwrap();
    let first = playfield.player();

    let mut deaths = 0;
    let mut was_active = false;
    for _ in 0..120 {
        playfield.tick();
        let active = playfield.store.is_active(playfield.player());
        if was_active && !active {
            deaths += 1;
        }
        was_active = active;
        if deaths == 1 {
            break;
        }
    }
    assert_eq!(deaths, 1);

    playfield.tick();
    assert_ne!(playfield.player(), first);
}

/// Park the player directly above an enemy, falling.
fn drop_player_onto(playfield: &mut Playfield, target: EntityId) {
    let target_pos = playfield.store.transform.must(target).pos;
    let player = playfield.player();
    let t = playfield.store.transform.must_mut(player);
    t.pos = target_pos - Vec2::new(0.0, 70.0);
    t.prev_pos = t.pos;
    t.velocity = Vec2::new(0.0, 4.0);
    t.accel_y = vertical::GRAVITY_S;
    playfield.store.player_state.must_mut(player).is_grounded = false;
}

#[test]
fn stomping_a_goomba_kills_it_and_bounces_the_player() {
    let mut playfield = playfield_with_floor();
    // Negative activation column: awake as soon as the level starts.
    let goomba = playfield.spawn_enemy(EnemyKind::Goomba, 10.0, 7.0, 30.0);
    playfield.tick();
    drop_player_onto(&mut playfield, goomba);

    let mut bounce = None;
    for _ in 0..10 {
        playfield.tick();
        if !playfield.store.is_active(goomba) && bounce.is_none() {
            bounce = Some(
                playfield
                    .store
                    .transform
                    .must(playfield.player())
                    .velocity
                    .y,
            );
            break;
        }
    }
    assert_eq!(bounce, Some(-vertical::STOMP_VELOCITY));
    assert!(playfield.store.is_active(playfield.player()));
}

#[test]
fn koopa_stomp_kick_shell_kills_goomba_chain() {
    let mut playfield = playfield_with_floor();
    let koopa = playfield.spawn_enemy(EnemyKind::Koopa, 10.0, 7.0, 30.0);
    let goomba = playfield.spawn_enemy(EnemyKind::Goomba, 20.0, 7.0, 50.0);
    playfield.tick();

    // Stomp the koopa.
    drop_player_onto(&mut playfield, koopa);
    let mut shelled = false;
    for _ in 0..10 {
        playfield.tick();
        if playfield.store.enemy.must(koopa).state == EnemyState::ShellIdle {
            shelled = true;
            break;
        }
    }
    assert!(shelled, "stomped koopa tucks into its shell");
    assert!(playfield.store.life_span.get(koopa).is_some());

    // Walk into the shell from the left to kick it rightward, toward the
    // goomba.
    let shell_pos = playfield.store.transform.must(koopa).pos;
    {
        let player = playfield.player();
        let t = playfield.store.transform.must_mut(player);
        t.pos = shell_pos - Vec2::new(60.0, 0.0);
        t.prev_pos = t.pos;
        t.velocity = Vec2::ZERO;
        playfield.store.player_state.must_mut(player).is_grounded = true;
    }
    playfield.tick();
    let shell = playfield.store.enemy.must(koopa);
    assert_eq!(shell.state, EnemyState::ShellMoving);
    assert_eq!(
        playfield
            .store
            .transform
            .must(koopa)
            .velocity
            .x,
        enemy_kinematics::SHELL_SPEED,
        "kicked away from the player"
    );
    assert!(
        playfield.store.life_span.get(koopa).is_none(),
        "timer removed on kick"
    );

    // Get the player out of the shell's path, then let it slide.
    {
        let player = playfield.player();
        let t = playfield.store.transform.must_mut(player);
        t.pos.y -= 500.0;
        t.prev_pos = t.pos;
    }
    let mut goomba_died = false;
    for _ in 0..80 {
        playfield.tick();
        if !playfield.store.is_active(goomba) {
            goomba_died = true;
            break;
        }
    }
    assert!(goomba_died, "moving shell mows down the goomba");
    assert!(
        !playfield.store.is_active(koopa),
        "the shell is spent in the impact"
    );
}

#[test]
fn identical_action_streams_replay_identically() {
    let script = |playfield: &mut Playfield| {
        for i in 0..240u32 {
            match i {
                10 => playfield.apply(Action::start(ActionName::Right)),
                40 => playfield.apply(Action::start(ActionName::Run)),
                90 => playfield.apply(Action::start(ActionName::Jump)),
                110 => playfield.apply(Action::end(ActionName::Jump)),
                160 => playfield.apply(Action::end(ActionName::Right)),
                _ => {}
            }
            playfield.tick();
        }
    };

    let level = "TileRangeHorizontal Brick 0 6 60\nGoomba 25 7 10\nKoopa 35 7 10";
    let run = |_: ()| {
        let mut playfield =
            Playfield::new(PlayfieldConfig::default(), ClipCatalog::with_defaults()).unwrap();
        playfield.load(&parse_level(level));
        script(&mut playfield);
        (
            playfield.store.transform.must(playfield.player()).clone(),
            playfield.camera_x(),
            playfield.store.entities().len(),
        )
    };

    assert_eq!(run(()), run(()));
}

//! Headless demo: load a small level, script some input, run the simulation
//! for a few seconds of ticks, and print where everything ended up.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example headless_run
//! ```

use brickrun_engine::prelude::*;

const LEVEL: &str = "\
TileRangeHorizontal Brick 0 1 60
TileRangeVertical Brick 14 2 3
Tile QuestionMarkBlink 18 5
Decoration Bush 8 2
Goomba 24 2 12
Koopa 32 2 14
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut catalog = ClipCatalog::with_defaults();
    catalog.register(AnimationClip::new("Bush", 1, 1, Vec2::new(64.0, 64.0)));
    let mut playfield = Playfield::new(PlayfieldConfig::default(), catalog)
        .expect("default config is valid");
    playfield.load(&parse_level(LEVEL));

    // Hold right and run, with a jump over the wall at column 14.
    for tick in 0..600u32 {
        match tick {
            5 => {
                playfield.apply(Action::start(ActionName::Right));
                playfield.apply(Action::start(ActionName::Run));
            }
            45 => playfield.apply(Action::start(ActionName::Jump)),
            70 => playfield.apply(Action::end(ActionName::Jump)),
            _ => {}
        }
        playfield.tick();
    }

    let player = playfield.player();
    let transform = playfield.store.transform.must(player);
    println!(
        "after {} ticks: player at ({:.1}, {:.1}), camera x {:.1}",
        playfield.ticks(),
        transform.pos.x,
        transform.pos.y,
        playfield.camera_x()
    );
    println!(
        "entities alive: {} ({} tiles, {} enemies, {} effects)",
        playfield.store.entities().len(),
        playfield.store.tagged(Tag::Tile).len(),
        playfield.store.tagged(Tag::Enemy).len(),
        playfield.store.tagged(Tag::AnimationEffect).len(),
    );
}

//! Level file parsing and grid-to-world coordinate conversion.
//!
//! Level files are plain text, one spawn command per line, fields separated
//! by whitespace:
//!
//! ```text
//! Tile Ground 0 1
//! TileRangeHorizontal Ground 0 1 14
//! DecorationRangeVertical Bush 3 2 4
//! Goomba 22 2 10
//! Koopa 30 2 12
//! ```
//!
//! Parsing is split from spawning: the parser only produces [`SpawnCommand`]
//! values, the playfield turns them into entities. A malformed or unknown
//! line is logged and skipped; the rest of the level still loads.

use std::path::Path;

use brickrun_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::EngineError;

// ---------------------------------------------------------------------------
// SpawnCommand
// ---------------------------------------------------------------------------

/// Whether a static entity collides (tile) or is scenery (decoration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticKind {
    Tile,
    Decoration,
}

impl StaticKind {
    pub fn tag(self) -> Tag {
        match self {
            StaticKind::Tile => Tag::Tile,
            StaticKind::Decoration => Tag::Decoration,
        }
    }
}

/// One entity to spawn, in grid coordinates. Range commands in the level
/// file expand into one command per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnCommand {
    Static {
        kind: StaticKind,
        clip: String,
        gx: f64,
        gy: f64,
    },
    Enemy {
        kind: EnemyKind,
        gx: f64,
        gy: f64,
        /// Cells to the left of the spawn at which the enemy wakes up.
        activation_cells: f64,
    },
}

// ---------------------------------------------------------------------------
// Grid conversion
// ---------------------------------------------------------------------------

/// Convert a grid position to the world-space center of an entity.
///
/// Grid y counts up from the bottom of the window, and an entity occupies its
/// cell flush with the cell's bottom-left corner; the world position is the
/// entity's center in y-down coordinates.
pub fn grid_to_world(gx: f64, gy: f64, size: Vec2, cell: Vec2, window_height: f64) -> Vec2 {
    let bottom_left = Vec2::new(cell.x * gx, window_height - cell.y * gy);
    Vec2::new(bottom_left.x + size.x / 2.0, bottom_left.y - size.y / 2.0)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a level file's contents into spawn commands.
pub fn parse_level(text: &str) -> Vec<SpawnCommand> {
    let mut commands = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let line_number = line_number + 1;
        let mut fields = line.split_whitespace();
        let Some(entry) = fields.next() else {
            continue; // blank line
        };
        let rest: Vec<&str> = fields.collect();
        if let Err(reason) = parse_entry(entry, &rest, &mut commands) {
            warn!(line_number, line, reason, "skipping level line");
        }
    }
    commands
}

/// Read and parse a level file.
pub fn load_level(path: impl AsRef<Path>) -> Result<Vec<SpawnCommand>, EngineError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_level(&text))
}

fn parse_entry(
    entry: &str,
    fields: &[&str],
    out: &mut Vec<SpawnCommand>,
) -> Result<(), &'static str> {
    match entry {
        "Tile" | "Decoration" => {
            let kind = static_kind(entry);
            let [clip, gx, gy] = take_fields(fields)?;
            let (gx, gy) = (number(gx)?, number(gy)?);
            out.push(SpawnCommand::Static {
                kind,
                clip: clip.to_string(),
                gx,
                gy,
            });
            Ok(())
        }
        "TileRangeHorizontal" | "DecorationRangeHorizontal" => {
            let kind = static_kind(entry);
            let [clip, gx, gy, width] = take_fields(fields)?;
            let (gx, gy) = (number(gx)?, number(gy)?);
            let width: u32 = width.parse().map_err(|_| "invalid range width")?;
            for i in 0..width {
                out.push(SpawnCommand::Static {
                    kind,
                    clip: clip.to_string(),
                    gx: gx + f64::from(i),
                    gy,
                });
            }
            Ok(())
        }
        "TileRangeVertical" | "DecorationRangeVertical" => {
            let kind = static_kind(entry);
            let [clip, gx, gy, height] = take_fields(fields)?;
            let (gx, gy) = (number(gx)?, number(gy)?);
            let height: u32 = height.parse().map_err(|_| "invalid range height")?;
            for i in 0..height {
                out.push(SpawnCommand::Static {
                    kind,
                    clip: clip.to_string(),
                    gx,
                    gy: gy + f64::from(i),
                });
            }
            Ok(())
        }
        "Goomba" | "Koopa" => {
            let kind = if entry == "Goomba" {
                EnemyKind::Goomba
            } else {
                EnemyKind::Koopa
            };
            let [gx, gy, activation] = take_fields(fields)?;
            out.push(SpawnCommand::Enemy {
                kind,
                gx: number(gx)?,
                gy: number(gy)?,
                activation_cells: number(activation)?,
            });
            Ok(())
        }
        _ => Err("unknown entry type"),
    }
}

fn static_kind(entry: &str) -> StaticKind {
    if entry.starts_with("Tile") {
        StaticKind::Tile
    } else {
        StaticKind::Decoration
    }
}

fn take_fields<'a, const N: usize>(fields: &[&'a str]) -> Result<[&'a str; N], &'static str> {
    <[&str; N]>::try_from(fields).map_err(|_| "wrong number of fields")
}

fn number(field: &str) -> Result<f64, &'static str> {
    field.parse().map_err(|_| "invalid number")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

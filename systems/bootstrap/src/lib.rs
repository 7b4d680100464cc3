#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Aether world from tile layers.
//!
//! Levels are authored as comma-separated tile layers. Every cell holds a
//! numeric code, with `-1` marking an empty tile. Three layers are
//! understood:
//!
//! * floor blocks: any non-empty cell becomes an invisible square obstacle
//!   covering the tile,
//! * planets: the cell code selects a [`PlanetKind`] centred on the tile
//!   origin,
//! * entities: the player marker places the craft.

use aether_core::{Command, GeometryError, HitboxShape, PlanetKind};
use aether_world::{query, World};
use glam::Vec2;
use thiserror::Error;
use tracing::debug;

/// Edge length of one map tile in world pixels.
pub const TILE_SIZE: f32 = 64.0;

/// Entity layer code that marks the player spawn.
pub const PLAYER_MARKER: i32 = 394;

const EMPTY_CELL: i32 = -1;

/// Errors raised while converting tile layers into placements.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A cell could not be parsed as an integer code.
    #[error("{layer} layer cell at row {row}, column {column} is not a tile code: {value:?}")]
    InvalidCell {
        /// Layer that contained the cell.
        layer: &'static str,
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        column: usize,
        /// Raw cell contents.
        value: String,
    },
    /// A planet cell used a code outside the planet table.
    #[error("unknown planet code {code} at row {row}, column {column}")]
    UnknownPlanet {
        /// Offending planet code.
        code: i32,
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        column: usize,
    },
    /// The entity layer carried more than one player marker.
    #[error("second player marker at row {row}, column {column}")]
    DuplicatePlayer {
        /// Zero-based row of the second marker.
        row: usize,
        /// Zero-based column of the second marker.
        column: usize,
    },
    /// The entity layer carried no player marker.
    #[error("entity layer has no player marker")]
    MissingPlayer,
    /// The tile obstacle shape was rejected.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Raw CSV tile layers describing a level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TileLayout<'a> {
    /// Collision layer; every non-empty cell blocks movement.
    pub floorblocks: &'a str,
    /// Planet layer; cell codes select the planet kind.
    pub planets: &'a str,
    /// Entity layer; carries the player marker.
    pub entities: &'a str,
}

/// Produces data required to greet the player and populate the world.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Converts the layout into placement commands.
    ///
    /// Obstacles come first in row-major order, then planets, then the
    /// player, so the craft is placed into a world that already holds every
    /// static body.
    pub fn placements(&self, layout: &TileLayout<'_>) -> Result<Vec<Command>, LayoutError> {
        let mut commands = Vec::new();
        let block = HitboxShape::rect(TILE_SIZE, TILE_SIZE)?;

        for cell in cells("floorblocks", layout.floorblocks) {
            let cell = cell?;
            if cell.code == EMPTY_CELL {
                continue;
            }
            let half = TILE_SIZE / 2.0;
            commands.push(Command::PlaceObstacle {
                position: cell.origin() + Vec2::splat(half),
                shape: block,
            });
        }

        for cell in cells("planets", layout.planets) {
            let cell = cell?;
            if cell.code == EMPTY_CELL {
                continue;
            }
            let kind = u8::try_from(cell.code)
                .ok()
                .and_then(PlanetKind::from_code)
                .ok_or(LayoutError::UnknownPlanet {
                    code: cell.code,
                    row: cell.row,
                    column: cell.column,
                })?;
            commands.push(Command::PlacePlanet {
                kind,
                position: cell.origin(),
            });
        }

        let mut player = None;
        for cell in cells("entities", layout.entities) {
            let cell = cell?;
            if cell.code != PLAYER_MARKER {
                continue;
            }
            if player.is_some() {
                return Err(LayoutError::DuplicatePlayer {
                    row: cell.row,
                    column: cell.column,
                });
            }
            player = Some(cell.origin());
        }
        let position = player.ok_or(LayoutError::MissingPlayer)?;
        commands.push(Command::PlacePlayer { position });

        debug!(placements = commands.len(), "tile layout converted");
        Ok(commands)
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    row: usize,
    column: usize,
    code: i32,
}

impl Cell {
    fn origin(self) -> Vec2 {
        Vec2::new(self.column as f32, self.row as f32) * TILE_SIZE
    }
}

fn cells<'a>(
    layer: &'static str,
    csv: &'a str,
) -> impl Iterator<Item = Result<Cell, LayoutError>> + 'a {
    csv.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .flat_map(move |(row, line)| {
            line.split(',').enumerate().map(move |(column, raw)| {
                let value = raw.trim();
                value
                    .parse::<i32>()
                    .map(|code| Cell { row, column, code })
                    .map_err(|_| LayoutError::InvalidCell {
                        layer,
                        row,
                        column,
                        value: value.to_owned(),
                    })
            })
        })
}

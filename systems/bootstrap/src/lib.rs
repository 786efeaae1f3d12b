#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Tile Trail experience.

pub mod levels;

use log::debug;
use thiserror::Error;
use tile_trail_core::Tile;
use tile_trail_world::{query, BoardError, Grid, GridError, World};

pub use levels::{Level, LEVELS, PLAYER_COLOUR};

/// Errors raised while preparing a level.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No level carries the requested name.
    #[error("unknown level `{name}`")]
    UnknownLevel {
        /// Name supplied by the caller.
        name: String,
    },
    /// A placement lies outside the level's board.
    #[error("level tiles do not fit the board")]
    Grid(#[from] GridError),
    /// The board cannot host a session.
    #[error("level board is not playable")]
    Board(#[from] BoardError),
}

/// Produces data required to greet the player and load levels.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the board required for rendering.
    #[must_use]
    pub fn board<'world>(&self, world: &'world World) -> &'world Grid<Tile> {
        query::board(world)
    }

    /// Levels available to the player, in presentation order.
    #[must_use]
    pub fn levels(&self) -> &'static [Level] {
        &LEVELS
    }

    /// Builds a world in edit mode for the named level.
    pub fn level(&self, name: &str) -> Result<World, BootstrapError> {
        let level = levels::find(name).ok_or_else(|| BootstrapError::UnknownLevel {
            name: name.to_owned(),
        })?;
        let board = level.board()?;
        debug!(
            "loaded level {} ({}x{})",
            level.name(),
            level.width(),
            level.height()
        );
        Ok(World::new(board, PLAYER_COLOUR)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_is_reported_by_name() {
        let error = Bootstrap.level("labyrinth").expect_err("no such level");
        assert!(matches!(
            &error,
            BootstrapError::UnknownLevel { name } if name == "labyrinth"
        ));
        assert_eq!(error.to_string(), "unknown level `labyrinth`");
    }

    #[test]
    fn banner_is_forwarded_from_world() {
        let world = Bootstrap.level("straight").expect("level loads");
        assert_eq!(
            Bootstrap.welcome_banner(&world),
            tile_trail_core::WELCOME_BANNER
        );
        assert_eq!(Bootstrap.board(&world).width(), 4);
    }
}

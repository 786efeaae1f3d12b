//! Structural checks performed before a board is accepted by the world.

use std::collections::HashSet;

use thiserror::Error;
use tile_trail_core::{CellCoord, Direction, MoverColour, Tile, TileKind};

use crate::grid::Grid;

/// Reasons a board cannot host a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Two path endpoints share one compass point of a tile.
    #[error(
        "tile at ({}, {}) exposes more than one connector at {direction:?}",
        .cell.column(),
        .cell.row()
    )]
    AmbiguousConnector {
        /// Cell holding the offending tile.
        cell: CellCoord,
        /// Compass point claimed more than once.
        direction: Direction,
    },
    /// No start tile belongs to the mover.
    #[error("board has no start tile for mover {colour:?}")]
    MissingStartTile {
        /// Mover lacking a start tile.
        colour: MoverColour,
    },
    /// More than one start tile belongs to the mover.
    #[error(
        "board has start tiles at ({}, {}) and ({}, {}) for the same mover",
        .first.column(),
        .first.row(),
        .second.column(),
        .second.row()
    )]
    DuplicateStartTile {
        /// First start tile in grid order.
        first: CellCoord,
        /// Second start tile in grid order.
        second: CellCoord,
    },
    /// No end tile belongs to the mover.
    #[error("board has no end tile for mover {colour:?}")]
    MissingEndTile {
        /// Mover lacking an end tile.
        colour: MoverColour,
    },
}

/// Checks that `board` is playable by the mover owning `colour`.
///
/// Returns the cell of the mover's start tile on success. Rotation permutes
/// a tile's compass points, so a board accepted here stays unambiguous
/// whatever rotations are applied while editing.
pub fn validate(board: &Grid<Tile>, colour: MoverColour) -> Result<CellCoord, BoardError> {
    for (cell, tile) in board {
        check_connectors(cell, tile)?;
    }

    let mut starts = board
        .iter()
        .filter(|(_, tile)| tile.is_start_for(colour))
        .map(|(cell, _)| cell);
    let first = starts
        .next()
        .ok_or(BoardError::MissingStartTile { colour })?;
    if let Some(second) = starts.next() {
        return Err(BoardError::DuplicateStartTile { first, second });
    }

    let has_end = board
        .iter()
        .any(|(_, tile)| matches!(tile.kind(), TileKind::End { owner } if owner == colour));
    if !has_end {
        return Err(BoardError::MissingEndTile { colour });
    }

    Ok(first)
}

/// First start tile of the mover in grid iteration order.
#[must_use]
pub fn find_start(board: &Grid<Tile>, colour: MoverColour) -> Option<CellCoord> {
    board
        .iter()
        .find(|(_, tile)| tile.is_start_for(colour))
        .map(|(cell, _)| cell)
}

fn check_connectors(cell: CellCoord, tile: &Tile) -> Result<(), BoardError> {
    let mut claimed = HashSet::new();
    for path in tile.local_paths() {
        for endpoint in [path.start, path.end] {
            if !claimed.insert(endpoint) {
                return Err(BoardError::AmbiguousConnector {
                    cell,
                    direction: endpoint.rotate_by(tile.rotation()),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_trail_core::Path;

    const RED: MoverColour = MoverColour::from_rgb(0xd0, 0x30, 0x30);
    const BLUE: MoverColour = MoverColour::from_rgb(0x30, 0x30, 0xd0);

    fn board_with(tiles: Vec<(CellCoord, Tile)>) -> Grid<Tile> {
        let mut board = Grid::new(4, 4);
        for (cell, tile) in tiles {
            let _ = board.set(cell, tile).expect("cell in bounds");
        }
        board
    }

    #[test]
    fn accepts_board_with_one_start_and_an_end() {
        let board = board_with(vec![
            (CellCoord::new(0, 0), Tile::start(Direction::East, RED)),
            (CellCoord::new(1, 0), Tile::end(Direction::West, RED)),
        ]);
        assert_eq!(validate(&board, RED), Ok(CellCoord::new(0, 0)));
    }

    #[test]
    fn rejects_missing_start_tile() {
        let board = board_with(vec![
            (CellCoord::new(0, 0), Tile::start(Direction::East, BLUE)),
            (CellCoord::new(1, 0), Tile::end(Direction::West, RED)),
        ]);
        assert_eq!(
            validate(&board, RED),
            Err(BoardError::MissingStartTile { colour: RED })
        );
    }

    #[test]
    fn rejects_duplicate_start_tiles_in_grid_order() {
        let board = board_with(vec![
            (CellCoord::new(2, 0), Tile::start(Direction::East, RED)),
            (CellCoord::new(0, 3), Tile::start(Direction::East, RED)),
            (CellCoord::new(1, 0), Tile::end(Direction::West, RED)),
        ]);
        assert_eq!(
            validate(&board, RED),
            Err(BoardError::DuplicateStartTile {
                first: CellCoord::new(0, 3),
                second: CellCoord::new(2, 0),
            })
        );
    }

    #[test]
    fn rejects_missing_end_tile() {
        let board = board_with(vec![
            (CellCoord::new(0, 0), Tile::start(Direction::East, RED)),
            (CellCoord::new(1, 0), Tile::end(Direction::West, BLUE)),
        ]);
        assert_eq!(
            validate(&board, RED),
            Err(BoardError::MissingEndTile { colour: RED })
        );
    }

    #[test]
    fn rejects_two_connectors_at_one_point() {
        let tile = Tile::new(
            Direction::South,
            vec![
                Path::new(Direction::West, Direction::East),
                Path::new(Direction::North, Direction::West),
            ],
        );
        let board = board_with(vec![
            (CellCoord::new(0, 0), Tile::start(Direction::East, RED)),
            (CellCoord::new(1, 1), tile),
            (CellCoord::new(3, 3), Tile::end(Direction::West, RED)),
        ]);
        assert_eq!(
            validate(&board, RED),
            Err(BoardError::AmbiguousConnector {
                cell: CellCoord::new(1, 1),
                direction: Direction::North,
            })
        );
    }

    #[test]
    fn rejects_path_looping_back_to_its_start() {
        let board = board_with(vec![
            (CellCoord::new(0, 0), Tile::start(Direction::East, RED)),
            (
                CellCoord::new(1, 0),
                Tile::new(
                    Direction::East,
                    vec![Path::new(Direction::North, Direction::North)],
                ),
            ),
            (CellCoord::new(2, 0), Tile::end(Direction::West, RED)),
        ]);
        assert!(matches!(
            validate(&board, RED),
            Err(BoardError::AmbiguousConnector { .. })
        ));
    }

    #[test]
    fn find_start_uses_grid_order() {
        let board = board_with(vec![
            (CellCoord::new(3, 0), Tile::start(Direction::East, RED)),
            (CellCoord::new(1, 2), Tile::start(Direction::East, RED)),
        ]);
        assert_eq!(find_start(&board, RED), Some(CellCoord::new(1, 2)));
        assert_eq!(find_start(&board, BLUE), None);
    }
}

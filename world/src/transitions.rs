//! Lookup tables translating connector exits into the next connector.

use tile_trail_core::{Direction, VertexCoord};

/// Destination reached when leaving a tile through one of its eight compass points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileExit {
    /// Crosses an edge into the neighbouring tile.
    Tile {
        /// Column offset of the neighbouring cell.
        dx: i32,
        /// Row offset of the neighbouring cell.
        dy: i32,
        /// Compass point of the neighbour the mover re-enters through.
        entry: Direction,
    },
    /// Leaves through a cell corner onto a diagonal connector.
    Corner {
        /// Column offset from the cell to the anchoring vertex.
        dx: i32,
        /// Row offset from the cell to the anchoring vertex.
        dy: i32,
        /// Diagonal heading while on the connector.
        heading: Direction,
    },
}

/// Destination reached when a diagonal connector ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerExit {
    /// Column offset from the vertex's cell to the target cell.
    pub dx: i32,
    /// Row offset from the vertex's cell to the target cell.
    pub dy: i32,
    /// Compass point of the target tile the mover re-enters through.
    pub entry: Direction,
}

const TILE_EXITS: [TileExit; 8] = [
    TileExit::Tile {
        dx: 1,
        dy: 0,
        entry: Direction::West,
    },
    TileExit::Corner {
        dx: 1,
        dy: 1,
        heading: Direction::SouthEast,
    },
    TileExit::Tile {
        dx: 0,
        dy: 1,
        entry: Direction::North,
    },
    TileExit::Corner {
        dx: 0,
        dy: 1,
        heading: Direction::SouthWest,
    },
    TileExit::Tile {
        dx: -1,
        dy: 0,
        entry: Direction::East,
    },
    TileExit::Corner {
        dx: 0,
        dy: 0,
        heading: Direction::NorthWest,
    },
    TileExit::Tile {
        dx: 0,
        dy: -1,
        entry: Direction::South,
    },
    TileExit::Corner {
        dx: 1,
        dy: 0,
        heading: Direction::NorthEast,
    },
];

const CORNER_EXITS: [Option<CornerExit>; 8] = [
    None,
    Some(CornerExit {
        dx: 0,
        dy: 0,
        entry: Direction::NorthWest,
    }),
    None,
    Some(CornerExit {
        dx: -1,
        dy: 0,
        entry: Direction::NorthEast,
    }),
    None,
    Some(CornerExit {
        dx: -1,
        dy: -1,
        entry: Direction::SouthEast,
    }),
    None,
    Some(CornerExit {
        dx: 0,
        dy: -1,
        entry: Direction::SouthWest,
    }),
];

/// Looks up where a mover leaving a tile through `exit` travels next.
#[must_use]
pub const fn tile_exit(exit: Direction) -> TileExit {
    TILE_EXITS[exit.index() as usize]
}

/// Looks up the tile a corner connector heading along `heading` ends in.
///
/// Cardinal headings never occur on corner connectors and yield `None`.
#[must_use]
pub const fn corner_exit(heading: Direction) -> Option<CornerExit> {
    CORNER_EXITS[heading.index() as usize]
}

/// Reports whether a corner connector may be anchored at `vertex`.
///
/// Only interior intersections qualify: vertices on the outer boundary would
/// route the mover off the board.
#[must_use]
pub const fn vertex_in_play(vertex: VertexCoord, width: u32, height: u32) -> bool {
    vertex.column() >= 1
        && vertex.row() >= 1
        && vertex.column() < width
        && vertex.row() < height
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_trail_core::CellCoord;

    #[test]
    fn cardinal_exits_re_enter_through_the_opposite_point() {
        for direction in Direction::CARDINALS {
            match tile_exit(direction) {
                TileExit::Tile { entry, .. } => assert_eq!(entry, direction.opposite()),
                TileExit::Corner { .. } => panic!("{direction:?} should cross an edge"),
            }
        }
    }

    #[test]
    fn diagonal_exits_keep_their_heading() {
        for direction in Direction::DIAGONALS {
            match tile_exit(direction) {
                TileExit::Corner { heading, .. } => assert_eq!(heading, direction),
                TileExit::Tile { .. } => panic!("{direction:?} should reach a corner"),
            }
        }
    }

    #[test]
    fn corner_exits_exist_only_for_diagonals() {
        for direction in Direction::ALL {
            assert_eq!(
                corner_exit(direction).is_some(),
                direction.is_diagonal(),
                "{direction:?}"
            );
        }
    }

    #[test]
    fn corner_connector_lands_diagonally_adjacent_to_its_origin() {
        // Leaving (1, 1) through each corner must land in the diagonal
        // neighbour and re-enter through the point facing back at the vertex.
        let origin = CellCoord::new(1, 1);
        for direction in Direction::DIAGONALS {
            let TileExit::Corner { dx, dy, heading } = tile_exit(direction) else {
                panic!("{direction:?} should reach a corner");
            };
            let vertex = VertexCoord::from_cell(origin, dx, dy).expect("vertex in range");
            let exit = corner_exit(heading).expect("diagonal heading");
            let target = vertex.cell_offset(exit.dx, exit.dy).expect("cell in range");

            let expected = match direction {
                Direction::SouthEast => CellCoord::new(2, 2),
                Direction::SouthWest => CellCoord::new(0, 2),
                Direction::NorthWest => CellCoord::new(0, 0),
                Direction::NorthEast => CellCoord::new(2, 0),
                _ => unreachable!(),
            };
            assert_eq!(target, expected, "{direction:?}");
            assert_eq!(exit.entry, direction.opposite());
        }
    }

    #[test]
    fn only_interior_vertices_are_in_play() {
        assert!(vertex_in_play(VertexCoord::new(1, 1), 2, 2));
        assert!(!vertex_in_play(VertexCoord::new(0, 1), 2, 2));
        assert!(!vertex_in_play(VertexCoord::new(1, 0), 2, 2));
        assert!(!vertex_in_play(VertexCoord::new(2, 1), 2, 2));
        assert!(!vertex_in_play(VertexCoord::new(1, 2), 2, 2));
        assert!(!vertex_in_play(VertexCoord::new(1, 1), 2, 1));
    }
}

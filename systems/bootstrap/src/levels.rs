//! Compiled-in level catalogue.

use tile_trail_core::{CellCoord, Direction, MoverColour, Path, Tile};
use tile_trail_world::{Grid, GridError};

use Direction::{East, North, NorthWest, South, SouthEast, SouthWest, West};

/// Colour of the single mover travelling every level.
pub const PLAYER_COLOUR: MoverColour = MoverColour::from_rgb(0xe5, 0x39, 0x35);

/// Authoring description of one tile.
#[derive(Clone, Copy, Debug)]
enum Piece {
    Plain {
        rotation: Direction,
        paths: &'static [(Direction, Direction)],
    },
    Start {
        rotation: Direction,
    },
    End {
        rotation: Direction,
    },
}

impl Piece {
    fn to_tile(self) -> Tile {
        match self {
            Self::Plain { rotation, paths } => Tile::new(
                rotation,
                paths
                    .iter()
                    .map(|(start, end)| Path::new(*start, *end))
                    .collect(),
            ),
            Self::Start { rotation } => Tile::start(rotation, PLAYER_COLOUR),
            Self::End { rotation } => Tile::end(rotation, PLAYER_COLOUR),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Placement {
    column: u32,
    row: u32,
    piece: Piece,
}

const fn plain(
    column: u32,
    row: u32,
    rotation: Direction,
    paths: &'static [(Direction, Direction)],
) -> Placement {
    Placement {
        column,
        row,
        piece: Piece::Plain { rotation, paths },
    }
}

const fn start(column: u32, row: u32, rotation: Direction) -> Placement {
    Placement {
        column,
        row,
        piece: Piece::Start { rotation },
    }
}

const fn end(column: u32, row: u32, rotation: Direction) -> Placement {
    Placement {
        column,
        row,
        piece: Piece::End { rotation },
    }
}

/// Static description of a playable board.
#[derive(Clone, Copy, Debug)]
pub struct Level {
    name: &'static str,
    summary: &'static str,
    width: u32,
    height: u32,
    placements: &'static [Placement],
}

impl Level {
    /// Name used to select the level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description shown when listing levels.
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        self.summary
    }

    /// Number of board columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of board rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Builds the board holding the level's tiles.
    pub fn board(&self) -> Result<Grid<Tile>, GridError> {
        let mut board = Grid::try_new(self.width, self.height)?;
        for placement in self.placements {
            let cell = CellCoord::new(placement.column, placement.row);
            let _ = board.set(cell, placement.piece.to_tile())?;
        }
        Ok(board)
    }
}

/// Every level shipped with the game, in presentation order.
pub const LEVELS: [Level; 4] = [
    Level {
        name: "straight",
        summary: "Two straight tiles between start and end.",
        width: 4,
        height: 1,
        placements: &[
            start(0, 0, East),
            plain(1, 0, East, &[(West, East)]),
            plain(2, 0, East, &[(West, East)]),
            end(3, 0, West),
        ],
    },
    Level {
        name: "diagonal",
        summary: "Corner connectors carry the mover across the board.",
        width: 3,
        height: 3,
        placements: &[
            start(0, 0, SouthEast),
            plain(1, 1, East, &[(NorthWest, SouthEast)]),
            end(2, 2, NorthWest),
        ],
    },
    Level {
        name: "knot",
        summary: "A looping knot of tiles that unwinds into a corner.",
        width: 3,
        height: 3,
        placements: &[
            start(1, 0, South),
            plain(1, 1, East, &[(South, North), (NorthWest, East)]),
            plain(2, 1, SouthEast, &[(SouthWest, SouthEast)]),
            plain(1, 2, East, &[(East, North)]),
            plain(2, 2, West, &[(South, East)]),
            end(0, 0, NorthWest),
        ],
    },
    Level {
        name: "switchback",
        summary: "Rotate two tiles to turn the route back toward the end.",
        width: 2,
        height: 2,
        placements: &[
            start(0, 0, East),
            plain(1, 0, North, &[(West, South)]),
            plain(1, 1, South, &[(North, West)]),
            end(0, 1, West),
        ],
    },
];

/// Looks up a level by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Level> {
    LEVELS.iter().find(|level| level.name == name)
}

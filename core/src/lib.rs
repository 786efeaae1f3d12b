#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Trail engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. The tile model ([`Direction`], [`Path`], [`Tile`]) lives here so
//! that level authoring, rendering and simulation agree on one topology.

use std::{f32::consts::FRAC_PI_4, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tile Trail.";

/// Top-level mode of a puzzle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Tiles may be rotated and the mover rests on its start tile.
    Edit,
    /// The mover is travelling along the board.
    Running,
    /// The mover stopped on the midpoint of its matching end tile.
    Win,
    /// The mover left the board or ran out of connected path.
    Lose,
}

impl GameMode {
    /// Reports whether the mode is a finished outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Sets the time needed to cross one full tile connector.
    ConfigureAnimationRate {
        /// Duration of a full tile connector traversal.
        rate: Duration,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Leaves edit mode and sets the mover in motion.
    Start,
    /// Returns to edit mode and re-seeds the mover on its start tile.
    Reset,
    /// Rotates the tile occupying the cell while editing.
    RotateTile {
        /// Cell holding the tile to rotate.
        cell: CellCoord,
        /// Number of 45° steps to rotate clockwise; negative values turn counter-clockwise.
        amount: i32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new mode.
    GameModeChanged {
        /// Mode that became active after processing the command.
        mode: GameMode,
    },
    /// Confirms a new connector traversal rate.
    AnimationRateConfigured {
        /// Rate now used for tile connectors.
        rate: Duration,
    },
    /// Reports that a traversal rate could not be applied.
    AnimationRateRejected {
        /// Rate supplied by the rejected command.
        rate: Duration,
    },
    /// The mover crossed into a tile connector.
    MoverEnteredTile {
        /// Cell holding the entered tile.
        cell: CellCoord,
        /// Index of the path being followed within the tile.
        path_index: usize,
        /// Whether the path is followed from its start toward its end.
        forward: bool,
        /// Progress carried over from the previous connector.
        progress: f64,
    },
    /// The mover crossed onto a corner connector.
    MoverEnteredCorner {
        /// Vertex anchoring the connector.
        vertex: VertexCoord,
        /// Diagonal heading of the mover while on the connector.
        direction: Direction,
        /// Progress carried over from the previous connector.
        progress: f64,
    },
    /// The mover reached a terminal outcome.
    MoverStopped {
        /// Final outcome of the run.
        outcome: Outcome,
        /// Topological reason for stopping.
        cause: StopCause,
    },
    /// Confirms that a tile was rotated.
    TileRotated {
        /// Cell holding the rotated tile.
        cell: CellCoord,
        /// Rotation of the tile after the command.
        rotation: Direction,
    },
    /// Reports that a rotation request was rejected.
    TileRotationRejected {
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Specific reason the rotation failed.
        reason: RotationError,
    },
}

/// One of the eight compass points, spaced 45° apart and numbered clockwise from east.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Direction {
    /// Toward increasing column indices.
    East = 0,
    /// Between east and south.
    SouthEast = 1,
    /// Toward increasing row indices.
    South = 2,
    /// Between south and west.
    SouthWest = 3,
    /// Toward decreasing column indices.
    West = 4,
    /// Between west and north.
    NorthWest = 5,
    /// Toward decreasing row indices.
    North = 6,
    /// Between north and east.
    NorthEast = 7,
}

impl Direction {
    /// Every direction in clockwise order starting at east.
    pub const ALL: [Self; 8] = [
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
    ];

    /// The four directions along the grid axes.
    pub const CARDINALS: [Self; 4] = [Self::East, Self::South, Self::West, Self::North];

    /// The four directions pointing at grid vertices.
    pub const DIAGONALS: [Self; 4] = [
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthWest,
        Self::NorthEast,
    ];

    /// Numeric index of the direction in `0..8`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Maps any integer onto a direction, wrapping modulo eight.
    #[must_use]
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(8) as usize]
    }

    /// Rotates the direction clockwise by `amount` 45° steps.
    ///
    /// Negative amounts rotate counter-clockwise. The result is always one of
    /// the eight directions, whatever the magnitude of `amount`.
    #[must_use]
    pub const fn rotate(self, amount: i32) -> Self {
        Self::from_index(self as i64 + amount as i64)
    }

    /// Rotates the direction by another direction's clockwise offset from east.
    #[must_use]
    pub const fn rotate_by(self, rotation: Direction) -> Self {
        self.rotate(rotation as i32)
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.rotate(4)
    }

    /// Reports whether the direction runs along a grid axis.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        self as u8 % 2 == 0
    }

    /// Reports whether the direction points at a grid vertex.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        !self.is_cardinal()
    }

    /// Angle of the direction in radians, measured clockwise from east in screen space.
    #[must_use]
    pub fn angle_radians(self) -> f32 {
        f32::from(self.index()) * FRAC_PI_4
    }
}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 8 {
            Ok(Self::from_index(i64::from(value)))
        } else {
            Err(DirectionError::OutOfRange(value))
        }
    }
}

/// Rotates `direction` clockwise by `amount` 45° steps.
#[must_use]
pub const fn rotate(direction: Direction, amount: i32) -> Direction {
    direction.rotate(amount)
}

/// Errors raised when decoding directions from raw indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// The index does not name one of the eight directions.
    #[error("direction index {0} is outside 0..8")]
    OutOfRange(u8),
}

/// Connection between two compass points inside a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    /// First endpoint of the connection.
    pub start: Direction,
    /// Second endpoint of the connection.
    pub end: Direction,
}

impl Path {
    /// Creates a path joining the two compass points.
    #[must_use]
    pub const fn new(start: Direction, end: Direction) -> Self {
        Self { start, end }
    }

    /// Returns the path with both endpoints rotated by the tile rotation.
    #[must_use]
    pub const fn rotated(self, rotation: Direction) -> Self {
        Self {
            start: self.start.rotate_by(rotation),
            end: self.end.rotate_by(rotation),
        }
    }

    /// Reports whether either endpoint sits at the provided compass point.
    #[must_use]
    pub fn touches(self, direction: Direction) -> bool {
        self.start == direction || self.end == direction
    }

    /// Endpoint the mover leaves through when travelling in the given sense.
    #[must_use]
    pub const fn exit(self, forward: bool) -> Direction {
        if forward {
            self.end
        } else {
            self.start
        }
    }
}

/// Identity of a mover, doubling as its drawing colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoverColour {
    red: u8,
    green: u8,
    blue: u8,
}

impl MoverColour {
    /// Creates a new mover colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Role a tile plays on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Ordinary tile carrying any number of paths.
    Plain,
    /// Origin of the mover owning the colour.
    Start {
        /// Mover that begins on this tile.
        owner: MoverColour,
    },
    /// Destination of the mover owning the colour.
    End {
        /// Mover that must stop on this tile.
        owner: MoverColour,
    },
}

/// Local path carried by every start tile.
pub const START_PATH: Path = Path::new(Direction::West, Direction::East);

/// Local path carried by every end tile.
pub const END_PATH: Path = Path::new(Direction::East, Direction::West);

/// Board piece holding a rotation and a set of internal paths.
///
/// Paths are stored in the tile's unrotated frame. [`Tile::paths`] applies
/// the current rotation on every read so callers always observe the latest
/// orientation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    rotation: Direction,
    paths: Vec<Path>,
    kind: TileKind,
}

impl Tile {
    /// Creates a plain tile from its rotation and local paths.
    #[must_use]
    pub fn new(rotation: Direction, paths: Vec<Path>) -> Self {
        Self {
            rotation,
            paths,
            kind: TileKind::Plain,
        }
    }

    /// Creates the start tile for the mover owning `owner`.
    #[must_use]
    pub fn start(rotation: Direction, owner: MoverColour) -> Self {
        Self {
            rotation,
            paths: vec![START_PATH],
            kind: TileKind::Start { owner },
        }
    }

    /// Creates the end tile for the mover owning `owner`.
    #[must_use]
    pub fn end(rotation: Direction, owner: MoverColour) -> Self {
        Self {
            rotation,
            paths: vec![END_PATH],
            kind: TileKind::End { owner },
        }
    }

    /// World-space paths: every local path rotated by the current rotation.
    #[must_use]
    pub fn paths(&self) -> Vec<Path> {
        self.paths
            .iter()
            .map(|path| path.rotated(self.rotation))
            .collect()
    }

    /// World-space path at the provided index, if present.
    #[must_use]
    pub fn path(&self, index: usize) -> Option<Path> {
        self.paths
            .get(index)
            .map(|path| path.rotated(self.rotation))
    }

    /// Paths in the tile's unrotated frame.
    #[must_use]
    pub fn local_paths(&self) -> &[Path] {
        &self.paths
    }

    /// Rotates the tile clockwise by `amount` 45° steps.
    pub fn rotate(&mut self, amount: i32) {
        self.rotation = self.rotation.rotate(amount);
    }

    /// Current rotation of the tile.
    #[must_use]
    pub const fn rotation(&self) -> Direction {
        self.rotation
    }

    /// Role of the tile on the board.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Mover colour owning a start or end tile.
    #[must_use]
    pub const fn owner(&self) -> Option<MoverColour> {
        match self.kind {
            TileKind::Plain => None,
            TileKind::Start { owner } | TileKind::End { owner } => Some(owner),
        }
    }

    /// Reports whether this is the start tile of the provided mover.
    #[must_use]
    pub fn is_start_for(&self, colour: MoverColour) -> bool {
        matches!(self.kind, TileKind::Start { owner } if owner == colour)
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Shifts the coordinate, returning `None` when either axis would underflow.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            column: self.column.checked_add_signed(dx)?,
            row: self.row.checked_add_signed(dy)?,
        })
    }
}

/// Grid intersection; vertex `(x, y)` is the north-west corner of cell `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexCoord {
    column: u32,
    row: u32,
}

impl VertexCoord {
    /// Creates a new vertex coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Column of the vertex, counted along cell boundaries.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Row of the vertex, counted along cell boundaries.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Vertex reached by shifting from the north-west corner of `cell`.
    #[must_use]
    pub fn from_cell(cell: CellCoord, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            column: cell.column().checked_add_signed(dx)?,
            row: cell.row().checked_add_signed(dy)?,
        })
    }

    /// Cell reached by shifting from the cell whose north-west corner is this vertex.
    #[must_use]
    pub fn cell_offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        CellCoord::new(self.column, self.row).offset(dx, dy)
    }
}

/// Where the mover currently travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoverLocation {
    /// Following one of a tile's paths.
    Tile {
        /// Cell holding the tile.
        cell: CellCoord,
        /// Index of the followed path within [`Tile::paths`].
        path_index: usize,
        /// `true` when travelling from the path's start toward its end.
        forward: bool,
    },
    /// Crossing a diagonal connector between two tiles.
    Corner {
        /// Vertex anchoring the connector.
        vertex: VertexCoord,
        /// Diagonal heading toward the tile about to be entered.
        direction: Direction,
    },
}

/// Final outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The mover rests on its matching end tile.
    Win,
    /// The mover could not continue.
    Lose,
}

/// Topological reason the mover stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopCause {
    /// Reached the midpoint of its own end tile.
    ReachedEnd,
    /// Reached the midpoint of an end tile owned by another colour.
    ForeignEnd,
    /// Crossed the board boundary.
    LeftBoard,
    /// Attempted to enter a cell holding no tile.
    EmptyCell,
    /// The entered tile offers no path at the entry point.
    NoConnector,
    /// The followed path no longer exists on its tile.
    MissingPath,
}

impl StopCause {
    /// Outcome implied by the cause.
    #[must_use]
    pub const fn outcome(self) -> Outcome {
        match self {
            Self::ReachedEnd => Outcome::Win,
            Self::ForeignEnd
            | Self::LeftBoard
            | Self::EmptyCell
            | Self::NoConnector
            | Self::MissingPath => Outcome::Lose,
        }
    }
}

/// Coarse state of the mover state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoverPhase {
    /// Advancing along a tile path.
    MovingOnTile,
    /// Advancing along a corner connector.
    MovingOnCorner,
    /// Not advancing.
    Stopped(Rest),
}

/// Why a mover is not advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rest {
    /// Waiting in edit mode.
    Idle,
    /// Finished on its end tile.
    Win,
    /// Finished without reaching its end tile.
    Lose,
}

/// Immutable representation of the mover's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoverSnapshot {
    /// Identity of the mover.
    pub colour: MoverColour,
    /// Whether ticks currently advance the mover.
    pub is_moving: bool,
    /// Fractional advance along the current connector in `[0, 1)`, or exactly
    /// `1.0` when the mover lost while trying to leave the connector.
    pub progress: f64,
    /// Connector the mover occupies.
    pub location: MoverLocation,
}

/// Anchor of the connector a mover occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    /// A path inside the tile at the cell.
    Tile {
        /// Cell holding the tile.
        cell: CellCoord,
    },
    /// A diagonal connector through the vertex.
    Corner {
        /// Vertex anchoring the connector.
        vertex: VertexCoord,
    },
}

/// Geometric description of the mover's current connector.
///
/// `forward_progress` always runs from `start` toward `end`, so renderers can
/// project it onto the connector curve without knowing the travel sense.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorView {
    /// Anchoring cell or vertex.
    pub kind: ConnectorKind,
    /// Compass point where the connector curve begins.
    pub start: Direction,
    /// Compass point where the connector curve ends.
    pub end: Direction,
    /// Normalised position along the curve from `start` to `end`.
    pub forward_progress: f64,
}

/// Reasons a rotation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RotationError {
    /// The session is not in edit mode.
    #[error("tiles can only be rotated while editing")]
    NotEditing,
    /// The targeted cell holds no tile.
    #[error("no tile occupies the cell")]
    EmptyCell,
}

//! Mover state machine advancing the token across tile and corner connectors.

use std::{f64::consts::FRAC_1_SQRT_2, time::Duration};

use log::{debug, warn};
use tile_trail_core::{
    CellCoord, ConnectorKind, ConnectorView, Direction, Event, GameMode, MoverColour, MoverLocation,
    MoverPhase, MoverSnapshot, Rest, StopCause, Tile, TileKind, VertexCoord,
};

use crate::{
    grid::Grid,
    transitions::{corner_exit, tile_exit, vertex_in_play, TileExit},
};

/// Length of a corner connector relative to a tile connector.
///
/// Derived from the chord of a 45° arc, `(1 - cos 45°) / 2`.
pub const CORNER_LENGTH: f64 = (1.0 - FRAC_1_SQRT_2) / 2.0;

/// Most connectors a mover may complete during a single tick.
///
/// Progress beyond the last allowed crossing is discarded.
pub const MAX_CROSSINGS_PER_TICK: usize = 64;

const MIDPOINT: f64 = 0.5;

#[derive(Clone, Debug)]
pub(crate) struct Mover {
    colour: MoverColour,
    is_moving: bool,
    progress: f64,
    location: MoverLocation,
}

impl Mover {
    /// Mover resting on the midpoint of the start tile at `cell`.
    pub(crate) const fn at_start(colour: MoverColour, cell: CellCoord) -> Self {
        Self {
            colour,
            is_moving: false,
            progress: MIDPOINT,
            location: MoverLocation::Tile {
                cell,
                path_index: 0,
                forward: true,
            },
        }
    }

    pub(crate) fn set_moving(&mut self) {
        self.is_moving = true;
    }

    pub(crate) const fn colour(&self) -> MoverColour {
        self.colour
    }

    pub(crate) const fn snapshot(&self) -> MoverSnapshot {
        MoverSnapshot {
            colour: self.colour,
            is_moving: self.is_moving,
            progress: self.progress,
            location: self.location,
        }
    }

    pub(crate) const fn phase(&self, mode: GameMode) -> MoverPhase {
        if self.is_moving {
            return match self.location {
                MoverLocation::Tile { .. } => MoverPhase::MovingOnTile,
                MoverLocation::Corner { .. } => MoverPhase::MovingOnCorner,
            };
        }

        match mode {
            GameMode::Win => MoverPhase::Stopped(Rest::Win),
            GameMode::Lose => MoverPhase::Stopped(Rest::Lose),
            GameMode::Edit | GameMode::Running => MoverPhase::Stopped(Rest::Idle),
        }
    }

    /// Describes the connector currently occupied by the mover.
    pub(crate) fn connector(&self, board: &Grid<Tile>) -> Option<ConnectorView> {
        match self.location {
            MoverLocation::Tile {
                cell,
                path_index,
                forward,
            } => {
                let path = board.get(cell)?.path(path_index)?;
                let forward_progress = if forward {
                    self.progress
                } else {
                    1.0 - self.progress
                };
                Some(ConnectorView {
                    kind: ConnectorKind::Tile { cell },
                    start: path.start,
                    end: path.end,
                    forward_progress,
                })
            }
            MoverLocation::Corner { vertex, direction } => Some(ConnectorView {
                kind: ConnectorKind::Corner { vertex },
                start: direction.opposite(),
                end: direction,
                forward_progress: self.progress,
            }),
        }
    }

    /// Advances the mover by `dt`, returning the cause when it stops.
    ///
    /// `rate` is the time needed to traverse a full tile connector. Every
    /// completed connector consumes exactly one unit of progress, so large
    /// deltas may carry the mover across up to [`MAX_CROSSINGS_PER_TICK`]
    /// connectors in one call. A failed crossing freezes the mover at the
    /// exit end of the connector it could not leave.
    pub(crate) fn advance(
        &mut self,
        board: &Grid<Tile>,
        dt: Duration,
        rate: Duration,
        out_events: &mut Vec<Event>,
    ) -> Option<StopCause> {
        if !self.is_moving || rate.is_zero() {
            return None;
        }

        let tile_rate = rate.as_secs_f64();
        let connector_rate = match self.location {
            MoverLocation::Tile { .. } => tile_rate,
            MoverLocation::Corner { .. } => tile_rate * (1.0 - CORNER_LENGTH) / 2.0,
        };
        self.progress += dt.as_secs_f64() / connector_rate;

        let mut crossings = 0;
        loop {
            if let Some(cause) = self.end_reached(board) {
                self.progress = MIDPOINT;
                self.is_moving = false;
                return Some(cause);
            }

            if self.progress < 1.0 {
                return None;
            }

            if crossings == MAX_CROSSINGS_PER_TICK {
                warn!(
                    "mover crossed {crossings} connectors in one tick; dropping {:.0} connectors of backlog",
                    self.progress.trunc()
                );
                self.progress = self.progress.fract();
                continue;
            }

            crossings += 1;
            self.progress -= 1.0;
            if let Err(cause) = self.cross(board, out_events) {
                self.progress = 1.0;
                self.is_moving = false;
                return Some(cause);
            }
        }
    }

    fn end_reached(&self, board: &Grid<Tile>) -> Option<StopCause> {
        if self.progress < MIDPOINT {
            return None;
        }
        let MoverLocation::Tile { cell, .. } = self.location else {
            return None;
        };
        match board.get(cell)?.kind() {
            TileKind::End { owner } if owner == self.colour => Some(StopCause::ReachedEnd),
            TileKind::End { .. } => Some(StopCause::ForeignEnd),
            TileKind::Plain | TileKind::Start { .. } => None,
        }
    }

    fn cross(&mut self, board: &Grid<Tile>, out_events: &mut Vec<Event>) -> Result<(), StopCause> {
        match self.location {
            MoverLocation::Tile {
                cell,
                path_index,
                forward,
            } => {
                let path = board
                    .get(cell)
                    .and_then(|tile| tile.path(path_index))
                    .ok_or(StopCause::MissingPath)?;

                match tile_exit(path.exit(forward)) {
                    TileExit::Tile { dx, dy, entry } => {
                        let target = cell
                            .offset(dx, dy)
                            .filter(|target| board.contains(*target))
                            .ok_or(StopCause::LeftBoard)?;
                        self.enter_tile(board, target, entry, out_events)
                    }
                    TileExit::Corner { dx, dy, heading } => {
                        let vertex = VertexCoord::from_cell(cell, dx, dy)
                            .filter(|vertex| {
                                vertex_in_play(*vertex, board.width(), board.height())
                            })
                            .ok_or(StopCause::LeftBoard)?;
                        self.location = MoverLocation::Corner {
                            vertex,
                            direction: heading,
                        };
                        debug!(
                            "mover entered corner at vertex ({}, {}) heading {heading:?}",
                            vertex.column(),
                            vertex.row()
                        );
                        out_events.push(Event::MoverEnteredCorner {
                            vertex,
                            direction: heading,
                            progress: self.progress,
                        });
                        Ok(())
                    }
                }
            }
            MoverLocation::Corner { vertex, direction } => {
                let exit = corner_exit(direction).ok_or(StopCause::MissingPath)?;
                let target = vertex
                    .cell_offset(exit.dx, exit.dy)
                    .filter(|target| board.contains(*target))
                    .ok_or(StopCause::LeftBoard)?;
                self.enter_tile(board, target, exit.entry, out_events)
            }
        }
    }

    fn enter_tile(
        &mut self,
        board: &Grid<Tile>,
        cell: CellCoord,
        entry: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), StopCause> {
        let tile = board.get(cell).ok_or(StopCause::EmptyCell)?;

        // Boards are validated against shared connectors; should one slip
        // through, the last matching path is followed.
        let (path_index, path) = tile
            .paths()
            .into_iter()
            .enumerate()
            .filter(|(_, path)| path.touches(entry))
            .last()
            .ok_or(StopCause::NoConnector)?;
        let forward = path.start == entry;

        self.location = MoverLocation::Tile {
            cell,
            path_index,
            forward,
        };
        debug!(
            "mover entered tile ({}, {}) path {path_index} at {entry:?}",
            cell.column(),
            cell.row()
        );
        out_events.push(Event::MoverEnteredTile {
            cell,
            path_index,
            forward,
            progress: self.progress,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_trail_core::Path;

    const RED: MoverColour = MoverColour::from_rgb(0xe0, 0x40, 0x40);
    const RATE: Duration = Duration::from_millis(1000);

    fn straight() -> Tile {
        Tile::new(
            Direction::East,
            vec![Path::new(Direction::West, Direction::East)],
        )
    }

    fn corridor(length: u32) -> Grid<Tile> {
        let mut board = Grid::new(length, 1);
        let _ = board
            .set(CellCoord::new(0, 0), Tile::start(Direction::East, RED))
            .expect("in bounds");
        for column in 1..length {
            let _ = board
                .set(CellCoord::new(column, 0), straight())
                .expect("in bounds");
        }
        board
    }

    fn running_mover() -> Mover {
        let mut mover = Mover::at_start(RED, CellCoord::new(0, 0));
        mover.set_moving();
        mover
    }

    #[test]
    fn resting_mover_ignores_time() {
        let board = corridor(3);
        let mut mover = Mover::at_start(RED, CellCoord::new(0, 0));
        let mut events = Vec::new();

        assert_eq!(
            mover.advance(&board, Duration::from_secs(5), RATE, &mut events),
            None
        );
        assert_eq!(mover.snapshot().progress, 0.5);
        assert!(events.is_empty());
        assert_eq!(
            mover.phase(GameMode::Edit),
            MoverPhase::Stopped(Rest::Idle)
        );
    }

    #[test]
    fn crossing_carries_the_overshoot() {
        let board = corridor(4);
        let mut mover = running_mover();
        let mut events = Vec::new();

        assert_eq!(
            mover.advance(&board, Duration::from_millis(750), RATE, &mut events),
            None
        );
        let snapshot = mover.snapshot();
        assert_eq!(snapshot.progress, 0.25);
        assert_eq!(
            snapshot.location,
            MoverLocation::Tile {
                cell: CellCoord::new(1, 0),
                path_index: 0,
                forward: true,
            }
        );
        assert_eq!(
            events,
            vec![Event::MoverEnteredTile {
                cell: CellCoord::new(1, 0),
                path_index: 0,
                forward: true,
                progress: 0.25,
            }]
        );
    }

    #[test]
    fn one_large_delta_crosses_several_tiles() {
        let board = corridor(5);
        let mut mover = running_mover();
        let mut events = Vec::new();

        let _ = mover.advance(&board, Duration::from_millis(2750), RATE, &mut events);

        let snapshot = mover.snapshot();
        assert_eq!(snapshot.progress, 0.25);
        assert!(matches!(
            snapshot.location,
            MoverLocation::Tile { cell, .. } if cell == CellCoord::new(3, 0)
        ));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn leaving_the_board_stops_the_mover() {
        let board = corridor(2);
        let mut mover = running_mover();
        let mut events = Vec::new();

        let cause = mover.advance(&board, Duration::from_secs(2), RATE, &mut events);

        assert_eq!(cause, Some(StopCause::LeftBoard));
        assert!(!mover.snapshot().is_moving);
        assert_eq!(mover.phase(GameMode::Lose), MoverPhase::Stopped(Rest::Lose));

        let snapshot = mover.snapshot();
        assert_eq!(
            snapshot.location,
            MoverLocation::Tile {
                cell: CellCoord::new(1, 0),
                path_index: 0,
                forward: true,
            }
        );
        assert_eq!(snapshot.progress, 1.0);
        let connector = mover.connector(&board).expect("mover is on a tile");
        assert_eq!(connector.end, Direction::East);
        assert_eq!(connector.forward_progress, 1.0);
    }

    #[test]
    fn last_matching_path_wins_on_ambiguous_entry() {
        let mut board = corridor(2);
        let _ = board
            .set(
                CellCoord::new(1, 0),
                Tile::new(
                    Direction::East,
                    vec![
                        Path::new(Direction::West, Direction::East),
                        Path::new(Direction::North, Direction::West),
                    ],
                ),
            )
            .expect("in bounds");
        let mut mover = running_mover();
        let mut events = Vec::new();

        let _ = mover.advance(&board, Duration::from_millis(500), RATE, &mut events);

        assert_eq!(
            mover.snapshot().location,
            MoverLocation::Tile {
                cell: CellCoord::new(1, 0),
                path_index: 1,
                forward: false,
            }
        );
        let view = mover.connector(&board).expect("tile connector");
        assert_eq!(view.start, Direction::North);
        assert_eq!(view.end, Direction::West);
        assert_eq!(view.forward_progress, 1.0);
    }

    #[test]
    fn corners_are_traversed_faster_than_tiles() {
        let mut board = Grid::new(2, 2);
        let _ = board
            .set(CellCoord::new(0, 0), Tile::start(Direction::SouthEast, RED))
            .expect("in bounds");
        let _ = board
            .set(CellCoord::new(1, 1), straight())
            .expect("in bounds");
        let mut mover = running_mover();
        let mut events = Vec::new();

        let _ = mover.advance(&board, Duration::from_millis(500), RATE, &mut events);
        assert_eq!(
            mover.phase(GameMode::Running),
            MoverPhase::MovingOnCorner
        );
        let view = mover.connector(&board).expect("corner connector");
        assert_eq!(
            view.kind,
            ConnectorKind::Corner {
                vertex: VertexCoord::new(1, 1)
            }
        );
        assert_eq!(view.start, Direction::NorthWest);
        assert_eq!(view.end, Direction::SouthEast);

        let corner_time = RATE.mul_f64((1.0 - CORNER_LENGTH) / 2.0) + Duration::from_millis(1);
        let cause = mover.advance(&board, corner_time, RATE, &mut events);

        // The straight tile only connects west and east, so the north-west
        // entry finds no connector.
        assert_eq!(cause, Some(StopCause::NoConnector));
        assert_eq!(events.len(), 1);
        assert!(!mover.snapshot().is_moving);
    }

    #[test]
    fn empty_target_cell_stops_the_mover() {
        let mut board = corridor(3);
        let _ = board.remove(CellCoord::new(1, 0));
        let mut mover = running_mover();
        let mut events = Vec::new();

        let cause = mover.advance(&board, Duration::from_millis(600), RATE, &mut events);

        assert_eq!(cause, Some(StopCause::EmptyCell));
        assert!(events.is_empty());
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tile Trail.

pub mod board;
pub mod grid;
mod mover;
pub mod transitions;

use std::time::Duration;

use log::{info, warn};
use tile_trail_core::{
    Command, Event, GameMode, MoverColour, Outcome, RotationError, Tile, WELCOME_BANNER,
};

pub use board::BoardError;
pub use grid::{Grid, GridError};
pub use mover::{CORNER_LENGTH, MAX_CROSSINGS_PER_TICK};

use mover::Mover;

/// Time needed to traverse a full tile connector unless configured otherwise.
pub const DEFAULT_ANIMATION_RATE: Duration = Duration::from_millis(1500);

/// Represents the authoritative Tile Trail world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Grid<Tile>,
    mover: Mover,
    mode: GameMode,
    animation_rate: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a world in edit mode with the mover resting on its start tile.
    ///
    /// The board must hold exactly one start tile and at least one end tile
    /// for `colour`, and no tile may expose two connectors at one compass point.
    pub fn new(board: Grid<Tile>, colour: MoverColour) -> Result<Self, BoardError> {
        let start = board::validate(&board, colour)?;
        Ok(Self {
            banner: WELCOME_BANNER,
            mover: Mover::at_start(colour, start),
            board,
            mode: GameMode::Edit,
            animation_rate: DEFAULT_ANIMATION_RATE,
            tick_index: 0,
        })
    }

    fn enter_mode(&mut self, mode: GameMode, out_events: &mut Vec<Event>) {
        if self.mode == mode {
            return;
        }
        info!("game mode changed from {:?} to {mode:?}", self.mode);
        self.mode = mode;
        out_events.push(Event::GameModeChanged { mode });
    }

    fn reseed_mover(&mut self) {
        let colour = self.mover.colour();
        if let Some(start) = board::find_start(&self.board, colour) {
            self.mover = Mover::at_start(colour, start);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureAnimationRate { rate } => {
            if rate.is_zero() {
                warn!("rejected zero animation rate");
                out_events.push(Event::AnimationRateRejected { rate });
                return;
            }
            world.animation_rate = rate;
            out_events.push(Event::AnimationRateConfigured { rate });
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            if world.mode != GameMode::Running {
                return;
            }

            let Some(cause) =
                world
                    .mover
                    .advance(&world.board, dt, world.animation_rate, out_events)
            else {
                return;
            };

            let outcome = cause.outcome();
            info!(
                "mover stopped on tick {} with {outcome:?} ({cause:?})",
                world.tick_index
            );
            out_events.push(Event::MoverStopped { outcome, cause });
            let mode = match outcome {
                Outcome::Win => GameMode::Win,
                Outcome::Lose => GameMode::Lose,
            };
            world.enter_mode(mode, out_events);
        }
        Command::Start => {
            if world.mode != GameMode::Edit {
                warn!("ignored start request while in {:?}", world.mode);
                return;
            }
            world.mover.set_moving();
            world.enter_mode(GameMode::Running, out_events);
        }
        Command::Reset => {
            world.reseed_mover();
            world.enter_mode(GameMode::Edit, out_events);
        }
        Command::RotateTile { cell, amount } => {
            if world.mode != GameMode::Edit {
                warn!(
                    "rejected rotation of ({}, {}) while in {:?}",
                    cell.column(),
                    cell.row(),
                    world.mode
                );
                out_events.push(Event::TileRotationRejected {
                    cell,
                    reason: RotationError::NotEditing,
                });
                return;
            }

            let Some(tile) = world.board.get_mut(cell) else {
                warn!(
                    "rejected rotation of empty cell ({}, {})",
                    cell.column(),
                    cell.row()
                );
                out_events.push(Event::TileRotationRejected {
                    cell,
                    reason: RotationError::EmptyCell,
                });
                return;
            };

            tile.rotate(amount);
            out_events.push(Event::TileRotated {
                cell,
                rotation: tile.rotation(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, World};
    use tile_trail_core::{
        CellCoord, ConnectorView, GameMode, MoverPhase, MoverSnapshot, Tile,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board and its tiles.
    #[must_use]
    pub fn board(world: &World) -> &Grid<Tile> {
        &world.board
    }

    /// Tile occupying the provided cell, if any.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<&Tile> {
        world.board.get(cell)
    }

    /// Mode the session is currently in.
    #[must_use]
    pub fn game_mode(world: &World) -> GameMode {
        world.mode
    }

    /// Captures a read-only snapshot of the mover.
    #[must_use]
    pub fn mover(world: &World) -> MoverSnapshot {
        world.mover.snapshot()
    }

    /// Coarse state of the mover state machine.
    #[must_use]
    pub fn mover_phase(world: &World) -> MoverPhase {
        world.mover.phase(world.mode)
    }

    /// Geometric description of the connector the mover occupies.
    #[must_use]
    pub fn connector(world: &World) -> Option<ConnectorView> {
        world.mover.connector(&world.board)
    }

    /// Time needed to traverse a full tile connector.
    #[must_use]
    pub fn animation_rate(world: &World) -> Duration {
        world.animation_rate
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_trail_core::{CellCoord, Direction, MoverPhase, Path, Rest};

    const RED: MoverColour = MoverColour::from_rgb(0xe5, 0x39, 0x35);

    fn corridor() -> World {
        let mut board = Grid::new(3, 1);
        let _ = board
            .set(CellCoord::new(0, 0), Tile::start(Direction::East, RED))
            .expect("in bounds");
        let _ = board
            .set(
                CellCoord::new(1, 0),
                Tile::new(
                    Direction::East,
                    vec![Path::new(Direction::West, Direction::East)],
                ),
            )
            .expect("in bounds");
        let _ = board
            .set(CellCoord::new(2, 0), Tile::end(Direction::West, RED))
            .expect("in bounds");
        World::new(board, RED).expect("valid board")
    }

    #[test]
    fn new_world_waits_in_edit_mode() {
        let world = corridor();

        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::game_mode(&world), GameMode::Edit);
        assert_eq!(query::animation_rate(&world), DEFAULT_ANIMATION_RATE);
        assert_eq!(
            query::mover_phase(&world),
            MoverPhase::Stopped(Rest::Idle)
        );
        let mover = query::mover(&world);
        assert_eq!(mover.progress, 0.5);
        assert!(!mover.is_moving);
    }

    #[test]
    fn new_world_rejects_board_without_start() {
        let board: Grid<Tile> = Grid::new(2, 2);
        assert_eq!(
            World::new(board, RED).err(),
            Some(BoardError::MissingStartTile { colour: RED })
        );
    }

    #[test]
    fn ticks_do_not_move_the_mover_while_editing() {
        let mut world = corridor();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(10),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_secs(10)
            }]
        );
        assert_eq!(query::mover(&world).progress, 0.5);
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn start_switches_to_running_once() {
        let mut world = corridor();
        let mut events = Vec::new();

        apply(&mut world, Command::Start, &mut events);
        apply(&mut world, Command::Start, &mut events);

        assert_eq!(
            events,
            vec![Event::GameModeChanged {
                mode: GameMode::Running
            }]
        );
        assert_eq!(query::mover_phase(&world), MoverPhase::MovingOnTile);
    }

    #[test]
    fn zero_animation_rate_is_rejected() {
        let mut world = corridor();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ConfigureAnimationRate {
                rate: Duration::ZERO,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ConfigureAnimationRate {
                rate: Duration::from_millis(400),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::AnimationRateRejected {
                    rate: Duration::ZERO
                },
                Event::AnimationRateConfigured {
                    rate: Duration::from_millis(400)
                },
            ]
        );
        assert_eq!(query::animation_rate(&world), Duration::from_millis(400));
    }

    #[test]
    fn rotation_is_rejected_outside_edit_mode() {
        let mut world = corridor();
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::RotateTile {
                cell: CellCoord::new(1, 0),
                amount: 2,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TileRotationRejected {
                cell: CellCoord::new(1, 0),
                reason: RotationError::NotEditing,
            }]
        );
        assert_eq!(
            query::tile_at(&world, CellCoord::new(1, 0)).map(Tile::rotation),
            Some(Direction::East)
        );
    }

    #[test]
    fn rotation_of_empty_cell_is_rejected() {
        let mut world = corridor();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::RotateTile {
                cell: CellCoord::new(7, 7),
                amount: 1,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TileRotationRejected {
                cell: CellCoord::new(7, 7),
                reason: RotationError::EmptyCell,
            }]
        );
    }

    #[test]
    fn connector_reports_start_tile_path() {
        let world = corridor();
        let view = query::connector(&world).expect("mover sits on a tile");

        assert_eq!(view.start, Direction::West);
        assert_eq!(view.end, Direction::East);
        assert_eq!(view.forward_progress, 0.5);
    }
}

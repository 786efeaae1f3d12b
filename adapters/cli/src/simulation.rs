use std::time::Duration;

use anyhow::{bail, Result};
use log::{debug, info};
use tile_trail_core::{CellCoord, Command, Event, GameMode};
use tile_trail_rendering::{
    Color, FrameInput, MoverPresentation, Scene, TileGridPresentation, TilePresentation,
};
use tile_trail_system_control::{Control, ControlInput, RotateRequest};
use tile_trail_world::{self as world, query, World};

/// Drives one puzzle session: routes input through the control system and
/// feeds the resulting commands to the world.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    control: Control,
    events: Vec<Event>,
    commands: Vec<Command>,
}

/// Summary printed after a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessReport {
    pub(crate) mode: GameMode,
    pub(crate) frames: u32,
}

impl Simulation {
    /// Wraps `world` and applies the configured animation rate.
    pub(crate) fn new(world: World, animation_rate: Duration) -> Self {
        let mut simulation = Self {
            world,
            control: Control::new(),
            events: Vec::new(),
            commands: Vec::new(),
        };
        world::apply(
            &mut simulation.world,
            Command::ConfigureAnimationRate {
                rate: animation_rate,
            },
            &mut simulation.events,
        );
        simulation
    }

    /// Borrows the simulated world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Rotates a tile before the run starts, failing when the world refuses.
    pub(crate) fn rotate(&mut self, request: RotateRequest) -> Result<()> {
        self.submit(ControlInput {
            rotate: Some(request),
            ..ControlInput::default()
        });

        let rejection = self.events.iter().find_map(|event| match event {
            Event::TileRotationRejected { cell, reason } if *cell == request.cell => Some(*reason),
            _ => None,
        });
        if let Some(reason) = rejection {
            bail!(
                "cannot rotate tile at ({}, {}): {reason}",
                request.cell.column(),
                request.cell.row()
            );
        }
        if query::game_mode(&self.world) != GameMode::Edit {
            bail!("tiles can only be rotated before the mover starts");
        }
        Ok(())
    }

    /// Routes player input through the control system and applies the resulting commands.
    pub(crate) fn submit(&mut self, input: ControlInput) {
        self.control.handle(&self.events, input, &mut self.commands);
        self.events.clear();
        for command in self.commands.drain(..) {
            debug!("applying {command:?}");
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Advances the world clock by `dt`.
    pub(crate) fn advance(&mut self, dt: Duration) {
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);
    }

    /// Handles one frame: input first, then the clock.
    pub(crate) fn step(&mut self, dt: Duration, input: ControlInput) {
        self.submit(input);
        self.advance(dt);
    }

    /// Starts the mover and ticks with a fixed step until the run ends or `max_frames` elapse.
    pub(crate) fn run_headless(&mut self, max_frames: u32, frame: Duration) -> HeadlessReport {
        self.submit(ControlInput {
            start_action: true,
            ..ControlInput::default()
        });

        let mut frames = 0;
        while frames < max_frames && !query::game_mode(&self.world).is_terminal() {
            self.step(frame, ControlInput::default());
            frames += 1;
        }

        let mode = query::game_mode(&self.world);
        info!("headless run finished in {mode:?} after {frames} frames");
        HeadlessReport { mode, frames }
    }

    /// Builds a scene describing the current world state.
    pub(crate) fn scene(&self, tile_grid: TileGridPresentation) -> Scene {
        let mut scene = Scene::new(tile_grid, Vec::new(), None, GameMode::Edit);
        self.populate_scene(&mut scene);
        scene
    }

    /// Refreshes tiles, mover and mode in `scene`.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        scene.tiles.clear();
        scene.tiles.extend(
            query::board(&self.world)
                .iter()
                .map(|(cell, tile)| TilePresentation::new(cell, tile.kind(), tile.paths())),
        );

        let colour = query::mover(&self.world).colour;
        scene.mover = query::connector(&self.world).map(|connector| MoverPresentation {
            color: Color::from(colour),
            connector,
        });
        scene.mode = query::game_mode(&self.world);
    }
}

/// Translates adapter input into the control system's vocabulary.
///
/// Clockwise and counter-clockwise requests on the same frame cancel out.
pub(crate) fn control_input(tile_grid: &TileGridPresentation, input: &FrameInput) -> ControlInput {
    let amount = i32::from(input.rotate_clockwise) - i32::from(input.rotate_counter_clockwise);
    let rotate = if amount == 0 {
        None
    } else {
        hovered_cell(tile_grid, input).map(|cell| RotateRequest::new(cell, amount))
    };

    ControlInput {
        start_action: input.start_action,
        reset_action: input.reset_action,
        rotate,
    }
}

/// Cell under the cursor, if the cursor is over the board.
pub(crate) fn hovered_cell(
    tile_grid: &TileGridPresentation,
    input: &FrameInput,
) -> Option<CellCoord> {
    input
        .cursor_world_space
        .and_then(|position| tile_grid.cell_at(position))
}

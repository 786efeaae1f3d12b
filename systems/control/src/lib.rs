#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control system translating player input into session commands.

use tile_trail_core::{CellCoord, Command, Event, GameMode};

/// Request to turn the tile at a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotateRequest {
    /// Cell holding the tile to rotate.
    pub cell: CellCoord,
    /// Number of 45° steps clockwise; negative values turn counter-clockwise.
    pub amount: i32,
}

impl RotateRequest {
    /// Creates a new rotation request.
    #[must_use]
    pub const fn new(cell: CellCoord, amount: i32) -> Self {
        Self { cell, amount }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Indicates whether the player asked to start the mover on this frame.
    pub start_action: bool,
    /// Indicates whether the player asked to return to editing on this frame.
    pub reset_action: bool,
    /// Tile the player asked to rotate on this frame, if any.
    pub rotate: Option<RotateRequest>,
}

/// Control system that gates input on the session mode observed from events.
#[derive(Debug, Clone)]
pub struct Control {
    mode: GameMode,
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}

impl Control {
    /// Creates a control system assuming the session starts in edit mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: GameMode::Edit,
        }
    }

    /// Mode most recently observed through [`Event::GameModeChanged`].
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Consumes world events and adapter input to emit session commands.
    ///
    /// Rotations are only forwarded while editing. Starting from a finished
    /// run first resets the session so the player can replay immediately.
    pub fn handle(&mut self, events: &[Event], input: ControlInput, out: &mut Vec<Command>) {
        for event in events {
            if let Event::GameModeChanged { mode } = event {
                self.mode = *mode;
            }
        }

        if let Some(request) = input.rotate {
            if self.mode == GameMode::Edit {
                out.push(Command::RotateTile {
                    cell: request.cell,
                    amount: request.amount,
                });
            }
        }

        let mut resets = input.reset_action && self.mode != GameMode::Edit;
        if input.start_action && self.mode.is_terminal() {
            resets = true;
        }
        if resets {
            out.push(Command::Reset);
        }

        if input.start_action && (self.mode == GameMode::Edit || resets) {
            out.push(Command::Start);
        }
    }
}

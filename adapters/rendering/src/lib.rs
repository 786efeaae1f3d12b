#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Trail adapters.

pub mod geometry;

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;
use tile_trail_core::{
    CellCoord, ConnectorView, Direction, GameMode, MoverColour, Path, TileKind, VertexCoord,
};

/// Linear RGBA colour with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel.
    pub red: f32,
    /// Green channel.
    pub green: f32,
    /// Blue channel.
    pub blue: f32,
    /// Opacity.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Builds a colour from its four channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Builds an opaque colour from 8-bit channels.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        const fn unit(channel: u8) -> f32 {
            channel as f32 / 255.0
        }
        Self::new(unit(red), unit(green), unit(blue), 1.0)
    }

    /// Blends the colour channels toward `target`; `amount` is clamped to `0.0..=1.0`.
    ///
    /// Alpha is left untouched.
    #[must_use]
    pub fn mix(self, target: Self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let blend = |from: f32, to: f32| from + (to - from) * amount;
        Self::new(
            blend(self.red, target.red),
            blend(self.green, target.green),
            blend(self.blue, target.blue),
            self.alpha,
        )
    }

    /// Blends the colour toward white.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        self.mix(Self::WHITE, amount)
    }
}

impl From<MoverColour> for Color {
    fn from(colour: MoverColour) -> Self {
        Self::from_rgb_u8(colour.red(), colour.green(), colour.blue())
    }
}

/// Player input sampled by a backend for one frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the adapter detected a start request on this frame.
    pub start_action: bool,
    /// Whether the adapter detected a reset request on this frame.
    pub reset_action: bool,
    /// Whether the hovered tile should turn clockwise on this frame.
    pub rotate_clockwise: bool,
    /// Whether the hovered tile should turn counter-clockwise on this frame.
    pub rotate_counter_clockwise: bool,
    /// Cursor position expressed in world units relative to the board origin.
    pub cursor_world_space: Option<Vec2>,
}

/// Describes the square tile board that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the board.
    pub columns: u32,
    /// Number of rows contained in the board.
    pub rows: u32,
    /// Edge length of one square tile in world units.
    pub tile_length: f32,
    /// Color used when drawing the board backdrop connectors.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when `tile_length` is not a positive finite number.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        line_color: Color,
    ) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            line_color,
        })
    }

    /// Calculates the total width of the board.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the board.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Centre of the tile occupying `cell`.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5) * self.tile_length
    }

    /// Point where a path leaves the tile through `direction`.
    ///
    /// Offsets lie on the circle inscribed in the tile.
    #[must_use]
    pub fn tile_offset(&self, cell: CellCoord, direction: Direction) -> Vec2 {
        self.tile_center(cell) + geometry::unit(direction) * (self.tile_length / 2.0)
    }

    /// Position of a grid intersection.
    #[must_use]
    pub fn vertex_position(&self, vertex: VertexCoord) -> Vec2 {
        Vec2::new(vertex.column() as f32, vertex.row() as f32) * self.tile_length
    }

    /// Cell under a world-space position, if it lies on the board.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / self.tile_length).floor() as u32;
        let row = (position.y / self.tile_length).floor() as u32;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }

    /// Interior grid intersections where corner connectors may run.
    pub fn interior_vertices(&self) -> impl Iterator<Item = VertexCoord> + '_ {
        (1..self.columns)
            .flat_map(move |column| (1..self.rows).map(move |row| VertexCoord::new(column, row)))
    }
}

/// Tile drawn on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePresentation {
    /// Cell occupied by the tile.
    pub cell: CellCoord,
    /// Role of the tile, used to pick markers and colours.
    pub kind: TileKind,
    /// World-space paths carried by the tile.
    pub paths: Vec<Path>,
}

impl TilePresentation {
    /// Creates a new tile descriptor.
    #[must_use]
    pub fn new(cell: CellCoord, kind: TileKind, paths: Vec<Path>) -> Self {
        Self { cell, kind, paths }
    }
}

/// Mover drawn on top of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoverPresentation {
    /// Fill colour of the mover.
    pub color: Color,
    /// Connector the mover occupies and its progress along it.
    pub connector: ConnectorView,
}

/// Scene description combining the board, its tiles and the mover.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Tiles currently placed on the board.
    pub tiles: Vec<TilePresentation>,
    /// Mover visible on the board, if its connector is known.
    pub mover: Option<MoverPresentation>,
    /// Mode of the running session.
    pub mode: GameMode,
    /// Cell currently under the cursor, if any.
    pub hovered_cell: Option<CellCoord>,
}

impl Scene {
    /// Creates a scene with nothing hovered.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        tiles: Vec<TilePresentation>,
        mover: Option<MoverPresentation>,
        mode: GameMode,
    ) -> Self {
        Self {
            tile_grid,
            tiles,
            mover,
            mode,
            hovered_cell: None,
        }
    }

    /// Short status line describing the session mode.
    #[must_use]
    pub const fn status_line(&self) -> &'static str {
        match self.mode {
            GameMode::Edit => "Editing: rotate tiles, then press Space to start",
            GameMode::Running => "Running: press R to reset",
            GameMode::Win => "You win! Press R to edit or Space to replay",
            GameMode::Lose => "The mover was lost. Press R to edit or Space to retry",
        }
    }
}

/// Everything a backend needs to open its window and draw the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Window title.
    pub window_title: String,
    /// Background colour painted before each frame.
    pub clear_color: Color,
    /// Initial scene.
    pub scene: Scene,
}

impl Presentation {
    /// Bundles a title, background and initial scene.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tile Trail scenes.
pub trait RenderingBackend {
    /// Opens the window and loops until the player quits.
    ///
    /// Each frame calls `update_scene` with the elapsed time and sampled input,
    /// then draws whatever the closure left in the scene.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors raised while describing a board for rendering.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Tiles must have a positive size.
    #[error("tile_length must be positive (received {tile_length})")]
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

//! Curve geometry for tile paths, corner connectors and the mover.

use std::f32::consts::SQRT_2;

use glam::Vec2;
use tile_trail_core::{CellCoord, ConnectorKind, ConnectorView, Direction, Path, VertexCoord};

use crate::TileGridPresentation;

/// Quadratic bezier curve described by its three control points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezier {
    /// Point where the curve begins.
    pub start: Vec2,
    /// Control point pulling the curve.
    pub control: Vec2,
    /// Point where the curve ends.
    pub end: Vec2,
}

impl QuadraticBezier {
    /// Creates a curve from its control points.
    #[must_use]
    pub const fn new(start: Vec2, control: Vec2, end: Vec2) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Point on the curve at parameter `t`, clamped into `0.0..=1.0`.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Samples `segments + 1` evenly spaced points along the curve.
    #[must_use]
    pub fn sample(&self, segments: u32) -> Vec<Vec2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|step| self.point_at(step as f32 / segments as f32))
            .collect()
    }
}

/// Unit vector pointing along `direction` in screen space, with y growing downward.
#[must_use]
pub fn unit(direction: Direction) -> Vec2 {
    Vec2::from_angle(direction.angle_radians())
}

/// Curve of a world-space tile path through the tile centre.
#[must_use]
pub fn tile_bezier(
    grid: &TileGridPresentation,
    cell: CellCoord,
    path: Path,
) -> QuadraticBezier {
    QuadraticBezier::new(
        grid.tile_offset(cell, path.start),
        grid.tile_center(cell),
        grid.tile_offset(cell, path.end),
    )
}

/// Straight connector crossing `vertex` along the diagonal `heading`.
///
/// Both ends touch the inscribed circles of the two tiles sharing the vertex.
#[must_use]
pub fn corner_bezier(
    grid: &TileGridPresentation,
    vertex: VertexCoord,
    heading: Direction,
) -> QuadraticBezier {
    let anchor = grid.vertex_position(vertex);
    let reach = grid.tile_length * (SQRT_2 - 1.0) / 2.0;
    QuadraticBezier::new(
        anchor + unit(heading.opposite()) * reach,
        anchor,
        anchor + unit(heading) * reach,
    )
}

/// Curve of the connector described by `view`, oriented from its start to its end.
#[must_use]
pub fn connector_bezier(grid: &TileGridPresentation, view: &ConnectorView) -> QuadraticBezier {
    match view.kind {
        ConnectorKind::Tile { cell } => tile_bezier(grid, cell, Path::new(view.start, view.end)),
        ConnectorKind::Corner { vertex } => corner_bezier(grid, vertex, view.end),
    }
}

/// Screen position of a mover travelling along `view`.
#[must_use]
pub fn mover_position(grid: &TileGridPresentation, view: &ConnectorView) -> Vec2 {
    connector_bezier(grid, view).point_at(view.forward_progress as f32)
}

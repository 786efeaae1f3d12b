#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Tile Trail.
//!
//! The `audio` feature of macroquad stays disabled: the game is silent and
//! the feature pulls in ALSA headers that CI machines lack.

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::BLACK,
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tile_trail_core::{CellCoord, Direction, GameMode, TileKind};
use tile_trail_rendering::{
    geometry::{corner_bezier, mover_position, tile_bezier},
    Color, FrameInput, Presentation, RenderingBackend, Scene, TileGridPresentation,
};

/// Screen pixels kept free around the board.
const MARGIN: f32 = 24.0;
/// Height of the status bar drawn below the board.
const STATUS_BAR_HEIGHT: f32 = 48.0;
/// Segments used when flattening a curve into line strips.
const CURVE_SEGMENTS: u32 = 16;
/// Font size of the status line.
const STATUS_FONT_SIZE: f32 = 24.0;

const PLAIN_TILE_FILL: Color = Color::new(0.93, 0.93, 0.9, 1.0);
const PATH_COLOR: Color = Color::new(0.2, 0.2, 0.24, 1.0);
const HOVER_COLOR: Color = Color::new(0.98, 0.75, 0.15, 1.0);

/// Keyboard shortcuts polled once per frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` closes the window.
    quit_requested: bool,
    /// `Space` starts the mover.
    start: bool,
    /// `R` returns the session to editing.
    reset: bool,
    /// `E` turns the hovered tile clockwise.
    rotate_clockwise: bool,
    /// `Q` turns the hovered tile counter-clockwise.
    rotate_counter_clockwise: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            start: is_key_pressed(KeyCode::Space),
            reset: is_key_pressed(KeyCode::R),
            rotate_clockwise: is_key_pressed(KeyCode::E),
            rotate_counter_clockwise: is_key_pressed(KeyCode::Q),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Timing of one presented frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameSample {
    frame: Duration,
    render: Duration,
}

/// Frame rate summary reported once per second of wall time.
#[derive(Clone, Copy, Debug)]
struct FrameRate {
    last_second: f32,
    last_ten_seconds: f32,
    mean_render: Duration,
}

/// Rolling frame statistics backing the `--show-fps` output.
#[derive(Debug, Default)]
struct FrameStats {
    history: VecDeque<Duration>,
    history_span: Duration,
    second: Vec<FrameSample>,
    second_span: Duration,
}

impl FrameStats {
    const HISTORY: Duration = Duration::from_secs(10);
    const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    fn push(&mut self, sample: FrameSample) -> Option<FrameRate> {
        self.history.push_back(sample.frame);
        self.history_span += sample.frame;
        while self.history_span > Self::HISTORY {
            let Some(oldest) = self.history.pop_front() else {
                break;
            };
            self.history_span = self.history_span.saturating_sub(oldest);
        }

        self.second.push(sample);
        self.second_span += sample.frame;
        if self.second_span < Self::REPORT_INTERVAL {
            return None;
        }

        let span = std::mem::take(&mut self.second_span).as_secs_f32();
        let samples = std::mem::take(&mut self.second);
        let count = u32::try_from(samples.len()).unwrap_or(u32::MAX);
        if span <= f32::EPSILON || count == 0 {
            return None;
        }

        let last_second = count as f32 / span;
        let history_seconds = self.history_span.as_secs_f32();
        let last_ten_seconds = if history_seconds > f32::EPSILON {
            self.history.len() as f32 / history_seconds
        } else {
            last_second
        };
        let render_total: Duration = samples.iter().map(|sample| sample.render).sum();

        Some(FrameRate {
            last_second,
            last_ten_seconds,
            mean_render: render_total / count,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 800,
            window_height: 800,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut frame_stats = FrameStats::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before =
                    SceneMetrics::from_grid(&scene.tile_grid, screen_width, screen_height);
                let frame_input = gather_frame_input(&metrics_before, keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_grid(&scene.tile_grid, screen_width, screen_height);

                let render_start = Instant::now();
                draw_backdrop(&scene.tile_grid, &metrics);
                draw_tiles(&scene, &metrics);
                draw_hover(&scene, &metrics);
                draw_mover(&scene, &metrics);
                draw_status(&scene, screen_height);

                let frame_rate = frame_stats.push(FrameSample {
                    frame: frame_dt,
                    render: render_start.elapsed(),
                });
                if let Some(rate) = frame_rate.filter(|_| show_fps) {
                    println!(
                        "{:.1} fps (10s: {:.1}), render {:.2}ms",
                        rate.last_second,
                        rate.last_ten_seconds,
                        rate.mean_render.as_secs_f64() * 1_000.0,
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping between board world units and screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_grid(tile_grid: &TileGridPresentation, screen_width: f32, screen_height: f32) -> Self {
        let world_width = tile_grid.width();
        let world_height = tile_grid.height();
        let available_width = (screen_width - 2.0 * MARGIN).max(0.0);
        let available_height = (screen_height - STATUS_BAR_HEIGHT - 2.0 * MARGIN).max(0.0);

        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (available_width / world_width).min(available_height / world_height)
        };

        let offset = Vec2::new(
            (screen_width - world_width * scale) * 0.5,
            MARGIN + (available_height - world_height * scale) * 0.5,
        );

        Self { scale, offset }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some((screen - self.offset) / self.scale)
    }
}

fn gather_frame_input(metrics: &SceneMetrics, keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    gather_frame_input_from_observations(
        metrics,
        Vec2::new(cursor_x, cursor_y),
        keyboard,
        is_mouse_button_pressed(MouseButton::Left),
        is_mouse_button_pressed(MouseButton::Right),
    )
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    keyboard: KeyboardShortcuts,
    left_click: bool,
    right_click: bool,
) -> FrameInput {
    FrameInput {
        start_action: keyboard.start,
        reset_action: keyboard.reset,
        rotate_clockwise: left_click || keyboard.rotate_clockwise,
        rotate_counter_clockwise: right_click || keyboard.rotate_counter_clockwise,
        cursor_world_space: metrics.to_world(cursor_position),
    }
}

fn draw_backdrop(tile_grid: &TileGridPresentation, metrics: &SceneMetrics) {
    let backdrop = to_macroquad_color(tile_grid.line_color.lighten(0.7));
    let radius = tile_grid.tile_length * 0.5 * metrics.scale;

    for column in 0..tile_grid.columns {
        for row in 0..tile_grid.rows {
            let center = metrics.to_screen(tile_grid.tile_center(CellCoord::new(column, row)));
            macroquad::shapes::draw_circle_lines(center.x, center.y, radius, 1.0, backdrop);
        }
    }

    for vertex in tile_grid.interior_vertices() {
        for heading in [Direction::SouthEast, Direction::NorthEast] {
            let connector = corner_bezier(tile_grid, vertex, heading);
            draw_segment(
                metrics.to_screen(connector.start),
                metrics.to_screen(connector.end),
                1.0,
                backdrop,
            );
        }
    }
}

fn tile_fill(kind: TileKind) -> Color {
    match kind {
        TileKind::Plain => PLAIN_TILE_FILL,
        TileKind::Start { owner } => Color::from(owner).lighten(0.75),
        TileKind::End { owner } => Color::from(owner).lighten(0.5),
    }
}

fn draw_tiles(scene: &Scene, metrics: &SceneMetrics) {
    let tile_grid = &scene.tile_grid;
    let radius = tile_grid.tile_length * 0.5 * metrics.scale;
    let outline = to_macroquad_color(tile_grid.line_color);
    let path_color = to_macroquad_color(PATH_COLOR);
    let path_thickness = (tile_grid.tile_length * 0.04 * metrics.scale).max(1.0);

    for tile in &scene.tiles {
        let center = metrics.to_screen(tile_grid.tile_center(tile.cell));
        let fill = to_macroquad_color(tile_fill(tile.kind));
        macroquad::shapes::draw_circle(center.x, center.y, radius, fill);
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, 2.0, outline);

        for path in &tile.paths {
            let points: Vec<Vec2> = tile_bezier(tile_grid, tile.cell, *path)
                .sample(CURVE_SEGMENTS)
                .into_iter()
                .map(|point| metrics.to_screen(point))
                .collect();
            draw_polyline(&points, path_thickness, path_color);
        }

        if let TileKind::End { owner } = tile.kind {
            macroquad::shapes::draw_circle_lines(
                center.x,
                center.y,
                radius * 0.3,
                path_thickness,
                to_macroquad_color(Color::from(owner)),
            );
        }
    }
}

fn draw_hover(scene: &Scene, metrics: &SceneMetrics) {
    if scene.mode != GameMode::Edit {
        return;
    }
    let Some(cell) = scene.hovered_cell else {
        return;
    };

    let center = metrics.to_screen(scene.tile_grid.tile_center(cell));
    let radius = scene.tile_grid.tile_length * 0.5 * metrics.scale;
    macroquad::shapes::draw_circle_lines(
        center.x,
        center.y,
        radius,
        3.0,
        to_macroquad_color(HOVER_COLOR),
    );
}

fn draw_mover(scene: &Scene, metrics: &SceneMetrics) {
    let Some(mover) = scene.mover else {
        return;
    };

    let position = metrics.to_screen(mover_position(&scene.tile_grid, &mover.connector));
    let radius = scene.tile_grid.tile_length * 0.12 * metrics.scale;
    let fill = to_macroquad_color(mover.color);
    macroquad::shapes::draw_circle(position.x, position.y, radius, fill);
    macroquad::shapes::draw_circle_lines(position.x, position.y, radius, 1.5, BLACK);
}

fn draw_status(scene: &Scene, screen_height: f32) {
    let baseline = screen_height - STATUS_BAR_HEIGHT * 0.5 + STATUS_FONT_SIZE * 0.3;
    let _ = macroquad::text::draw_text(
        scene.status_line(),
        MARGIN,
        baseline,
        STATUS_FONT_SIZE,
        BLACK,
    );
}

fn draw_polyline(points: &[Vec2], thickness: f32, color: macroquad::color::Color) {
    for pair in points.windows(2) {
        draw_segment(pair[0], pair[1], thickness, color);
    }
}

fn draw_segment(from: Vec2, to: Vec2, thickness: f32, color: macroquad::color::Color) {
    macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tile Trail experience.

mod config;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tile_trail_core::CellCoord;
use tile_trail_rendering::{Color, Presentation, RenderingBackend, TileGridPresentation};
use tile_trail_rendering_macroquad::MacroquadBackend;
use tile_trail_system_bootstrap::Bootstrap;
use tile_trail_system_control::RotateRequest;
use tile_trail_world::query;

use self::{
    config::{FileConfig, Overrides, Settings},
    simulation::{control_input, hovered_cell, Simulation},
};

/// Guide the mover from its start tile to its end tile by rotating the tiles between them.
#[derive(Debug, Parser)]
#[command(name = "tile-trail", version, about)]
struct Args {
    /// Level to load.
    #[arg(long)]
    level: Option<String>,

    /// Print the available levels and exit.
    #[arg(long)]
    list_levels: bool,

    /// TOML file with default settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a window using a fixed time step.
    #[arg(long)]
    headless: bool,

    /// Frame limit for headless runs.
    #[arg(long, default_value_t = 10_000)]
    frames: u32,

    /// Length of a headless frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Rotate the tile at a cell before starting; the amount counts 45° steps clockwise.
    #[arg(long = "rotate", value_name = "X,Y[,AMOUNT]", value_parser = parse_rotation)]
    rotations: Vec<RotateRequest>,

    /// Time in milliseconds needed to cross one tile.
    #[arg(long, value_name = "MS")]
    animation_rate_ms: Option<u64>,

    /// Side length of a tile in world units.
    #[arg(long)]
    tile_length: Option<f32>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Increase log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Silence all log output.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            level: self.level.clone(),
            animation_rate_ms: self.animation_rate_ms,
            tile_length: self.tile_length,
            vsync: self.vsync,
            show_fps: self.show_fps,
        }
    }
}

fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Off;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn parse_rotation(value: &str) -> Result<RotateRequest, String> {
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let (column, row, amount) = match fields.as_slice() {
        [column, row] => (*column, *row, "1"),
        [column, row, amount] => (*column, *row, *amount),
        _ => return Err(format!("expected X,Y or X,Y,AMOUNT but got `{value}`")),
    };

    let column = column
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    let amount = amount
        .parse::<i32>()
        .map_err(|error| format!("invalid amount `{amount}`: {error}"))?;

    Ok(RotateRequest::new(CellCoord::new(column, row), amount))
}

fn list_levels(bootstrap: &Bootstrap) {
    for level in bootstrap.levels() {
        println!(
            "{:<12} {}x{}  {}",
            level.name(),
            level.width(),
            level.height(),
            level.summary()
        );
    }
}

/// Entry point for the Tile Trail command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    TermLogger::init(
        level_filter(args.verbose, args.quiet),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("failed to install the terminal logger")?;

    let bootstrap = Bootstrap;
    if args.list_levels {
        list_levels(&bootstrap);
        return Ok(());
    }

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, args.overrides())?;

    let world = bootstrap
        .level(&settings.level)
        .with_context(|| format!("failed to load level `{}`", settings.level))?;
    info!("{}", bootstrap.welcome_banner(&world));

    let mut simulation = Simulation::new(world, settings.animation_rate);
    for request in &args.rotations {
        simulation.rotate(*request)?;
    }

    if args.headless {
        let report = simulation.run_headless(args.frames, Duration::from_millis(args.frame_ms));
        println!(
            "level {}: {:?} after {} frames",
            settings.level, report.mode, report.frames
        );
        return Ok(());
    }

    let board = query::board(simulation.world());
    let tile_grid = TileGridPresentation::new(
        board.width(),
        board.height(),
        settings.tile_length,
        Color::from_rgb_u8(0x30, 0x30, 0x38),
    )?;
    let scene = simulation.scene(tile_grid);
    let presentation = Presentation::new(
        format!("Tile Trail: {}", settings.level),
        Color::from_rgb_u8(0xfa, 0xf7, 0xf0),
        scene,
    );

    let backend = MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        scene.hovered_cell = hovered_cell(&scene.tile_grid, &input);
        simulation.step(dt, control_input(&scene.tile_grid, &input));
        simulation.populate_scene(scene);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn argument_definitions_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn rotation_amount_defaults_to_one_step() {
        assert_eq!(
            parse_rotation("2, 3"),
            Ok(RotateRequest::new(CellCoord::new(2, 3), 1))
        );
        assert_eq!(
            parse_rotation("0,1,-2"),
            Ok(RotateRequest::new(CellCoord::new(0, 1), -2))
        );
    }

    #[test]
    fn malformed_rotations_are_rejected() {
        for value in ["", "1", "1,2,3,4", "a,1", "1,-1", "1,1,x"] {
            assert!(parse_rotation(value).is_err(), "{value}");
        }
    }

    #[test]
    fn verbosity_flags_pick_level_filter() {
        assert_eq!(level_filter(0, false), LevelFilter::Warn);
        assert_eq!(level_filter(1, false), LevelFilter::Info);
        assert_eq!(level_filter(2, false), LevelFilter::Debug);
        assert_eq!(level_filter(5, false), LevelFilter::Trace);
        assert_eq!(level_filter(0, true), LevelFilter::Off);
    }

    #[test]
    fn repeated_rotate_flags_accumulate() {
        let args = Args::try_parse_from([
            "tile-trail",
            "--level",
            "switchback",
            "--rotate",
            "1,0,2",
            "--rotate",
            "1,1,-2",
            "-vv",
        ])
        .expect("arguments parse");
        assert_eq!(args.rotations.len(), 2);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.overrides().level.as_deref(), Some("switchback"));
    }
}

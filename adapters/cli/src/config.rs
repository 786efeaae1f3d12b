use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tile_trail_world::DEFAULT_ANIMATION_RATE;

/// Level loaded when neither the command line nor the config file names one.
pub(crate) const DEFAULT_LEVEL: &str = "straight";
/// Tile side length in world units used when none is configured.
pub(crate) const DEFAULT_TILE_LENGTH: f32 = 96.0;

/// Values read from an optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) animation_rate_ms: Option<u64>,
    pub(crate) tile_length: Option<f32>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: Option<bool>,
    pub(crate) level: Option<String>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Settings supplied on the command line; each one wins over the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) level: Option<String>,
    pub(crate) animation_rate_ms: Option<u64>,
    pub(crate) tile_length: Option<f32>,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

/// Fully resolved runtime settings.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) level: String,
    pub(crate) animation_rate: Duration,
    pub(crate) tile_length: f32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Merges file values with command-line overrides and validates the result.
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let animation_rate = match overrides.animation_rate_ms.or(file.animation_rate_ms) {
            Some(0) => bail!("animation rate must be at least one millisecond"),
            Some(millis) => Duration::from_millis(millis),
            None => DEFAULT_ANIMATION_RATE,
        };

        let tile_length = overrides
            .tile_length
            .or(file.tile_length)
            .unwrap_or(DEFAULT_TILE_LENGTH);
        if !tile_length.is_finite() || tile_length <= 0.0 {
            bail!("tile length must be a positive number (received {tile_length})");
        }

        Ok(Self {
            level: overrides
                .level
                .or(file.level)
                .unwrap_or_else(|| DEFAULT_LEVEL.to_owned()),
            animation_rate,
            tile_length,
            vsync: overrides.vsync || file.vsync.unwrap_or(false),
            show_fps: overrides.show_fps || file.show_fps.unwrap_or(false),
        })
    }
}

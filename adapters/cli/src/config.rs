//! TOML configuration for the command-line driver.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use gridpaint_system_painter::Config as PainterConfig;
use serde::Deserialize;

/// File read from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "gridpaint.toml";

/// Contents of a `gridpaint.toml` file. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) world: WorldSection,
    pub(crate) painter: PainterConfig,
    pub(crate) render: RenderSection,
}

/// `[world]`: where the grid comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldSection {
    pub(crate) grid: Option<PathBuf>,
    pub(crate) empty_size: Option<u32>,
}

/// `[render]`: whether intermediate frames are shown and how fast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderSection {
    pub(crate) show_frames: bool,
    pub(crate) frame_delay_ms: u64,
}

impl RenderSection {
    pub(crate) const fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

impl FileConfig {
    /// Loads `explicit` when given, otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, otherwise defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::read(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

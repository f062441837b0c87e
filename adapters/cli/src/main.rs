#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a grid, places a painter and runs a
//! script of painter actions against it.

mod config;
mod script;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use gridpaint_core::Direction;
use gridpaint_rendering::{Frame, RenderingObserver, WriterSink};
use gridpaint_system_painter::{Config as PainterConfig, Painter};
use gridpaint_world::{World, WorldSource};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::FileConfig;

/// Drive a painter over a tile grid.
///
/// Actions: move, turn-left, paint:<color>, scrape, take, set-paint:<n>,
/// can-move[:left|right|forward|backward], report.
#[derive(Debug, Parser)]
#[command(name = "gridpaint", version, about)]
struct CliArgs {
    /// Configuration file (defaults to ./gridpaint.toml when present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid description file.
    #[arg(long, value_name = "FILE", conflicts_with = "empty")]
    grid: Option<PathBuf>,

    /// Use an empty open grid of this size instead of a description.
    #[arg(long, value_name = "N")]
    empty: Option<u32>,

    /// Starting column of the painter.
    #[arg(long, allow_negative_numbers = true, conflicts_with = "default_painter")]
    x: Option<i32>,

    /// Starting row of the painter.
    #[arg(long, allow_negative_numbers = true, conflicts_with = "default_painter")]
    y: Option<i32>,

    /// Starting facing of the painter (north, east, south or west).
    #[arg(long, conflicts_with = "default_painter")]
    facing: Option<String>,

    /// Starting paint in the painter's bucket.
    #[arg(long, conflicts_with = "default_painter")]
    paint: Option<u32>,

    /// Use the default painter: top-left corner, facing east, no paint,
    /// unlimited paint on large grids.
    #[arg(long)]
    default_painter: bool,

    /// Print a frame after every state change.
    #[arg(long)]
    show_frames: bool,

    /// Delay after each printed frame, in milliseconds.
    #[arg(long, value_name = "MS")]
    frame_delay_ms: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Actions to run, in order.
    #[arg(value_name = "ACTION")]
    actions: Vec<String>,
}

impl CliArgs {
    fn world_source(&self, config: &FileConfig) -> Result<WorldSource> {
        if let Some(path) = &self.grid {
            return Ok(WorldSource::Path(path.clone()));
        }
        if let Some(size) = self.empty {
            return Ok(WorldSource::Empty(size));
        }
        if let Some(path) = &config.world.grid {
            return Ok(WorldSource::Path(path.clone()));
        }
        if let Some(size) = config.world.empty_size {
            return Ok(WorldSource::Empty(size));
        }
        bail!("no grid given; pass --grid or --empty, or set [world] in the config file")
    }

    fn uses_default_painter(&self) -> bool {
        self.default_painter
            || (self.x.is_none() && self.y.is_none() && self.facing.is_none() && self.paint.is_none())
    }

    fn spawn_painter(&self, world: &mut World, config: &PainterConfig) -> Result<Painter> {
        if self.uses_default_painter() {
            return Painter::spawn_default(world, config).context("failed to place default painter");
        }

        let facing = match &self.facing {
            Some(facing) => facing.parse()?,
            None => Direction::East,
        };
        let x = self.x.unwrap_or(0);
        let y = self.y.unwrap_or(0);
        Painter::spawn_with(world, x, y, facing, self.paint.unwrap_or(0), config)
            .with_context(|| format!("failed to place painter at ({x}, {y})"))
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}

/// Entry point for the gridpaint command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose)?;

    let config = FileConfig::load(args.config.as_deref())?;
    let actions = script::parse_all(&args.actions)?;

    let source = args.world_source(&config)?;
    let mut world = World::load(source).context("failed to load grid")?;

    let render = config.render;
    if args.show_frames || render.show_frames {
        let delay = args
            .frame_delay_ms
            .map_or_else(|| render.frame_delay(), std::time::Duration::from_millis);
        let sink = WriterSink::new(io::stdout()).with_delay(delay);
        world.register_observer(RenderingObserver::new(world.grid(), sink));
    }

    let mut painter = args.spawn_painter(&mut world, &config.painter)?;
    info!(painter = %painter.id(), actions = actions.len(), "running script");

    let mut stdout = io::stdout().lock();
    script::run(&mut painter, &actions, &mut stdout)?;

    let frame = Frame::render(&painter.grid().borrow(), &[painter.snapshot()]);
    write!(stdout, "{frame}").context("failed to print final frame")?;
    Ok(())
}

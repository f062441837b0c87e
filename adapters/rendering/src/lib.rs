#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering contracts for gridpaint adapters.
//!
//! The simulation never draws or sleeps. Adapters register a
//! [`RenderingObserver`] with the world; it mirrors painter state from the
//! event stream, renders a [`Frame`] after every event and hands it to a
//! [`FrameSink`]. Any pacing between frames belongs to the sink.

use std::{collections::BTreeMap, fmt, io::Write, thread, time::Duration};

use anyhow::{Context, Result as AnyResult};
use gridpaint_core::{Direction, Event, PainterId, PainterObserver, PainterSnapshot};
use gridpaint_world::{Grid, SharedGrid, Tile};
use tracing::warn;

/// Glyph drawn for a square that blocks painting.
pub const IMPASSABLE_GLYPH: char = 'x';
/// Glyph drawn for a painted square.
pub const PAINTED_GLYPH: char = '#';
/// Glyph drawn for an open square without paint.
pub const EMPTY_GLYPH: char = '.';
/// Glyph drawn for a square holding more than nine units of paint.
pub const FULL_BUCKET_GLYPH: char = '+';

/// Glyph used to draw a painter facing `direction`.
#[must_use]
pub const fn painter_glyph(direction: Direction) -> char {
    match direction {
        Direction::North => '^',
        Direction::East => '>',
        Direction::South => 'v',
        Direction::West => '<',
    }
}

fn tile_glyph(tile: &Tile) -> char {
    if !tile.is_passable() {
        IMPASSABLE_GLYPH
    } else if tile.has_color() {
        PAINTED_GLYPH
    } else {
        match tile.paint_count() {
            0 => EMPTY_GLYPH,
            count => char::from_digit(count, 10).unwrap_or(FULL_BUCKET_GLYPH),
        }
    }
}

/// Text picture of a grid with the painters standing on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<String>,
    status: Vec<String>,
}

impl Frame {
    /// Renders `grid` with `painters` drawn on top of their squares.
    ///
    /// When several painters share a square the last one in `painters`
    /// is drawn.
    #[must_use]
    pub fn render(grid: &Grid, painters: &[PainterSnapshot]) -> Self {
        let size = grid.size() as usize;
        let mut cells: Vec<Vec<char>> = vec![Vec::with_capacity(size); size];
        for (cell, tile) in grid.tiles() {
            cells[cell.row() as usize].push(tile_glyph(tile));
        }

        for painter in painters {
            let row = cells.get_mut(painter.cell.row() as usize);
            if let Some(glyph) = row.and_then(|row| row.get_mut(painter.cell.column() as usize)) {
                *glyph = painter_glyph(painter.facing);
            }
        }

        Self {
            rows: cells.into_iter().map(String::from_iter).collect(),
            status: painters.iter().map(status_line).collect(),
        }
    }

    /// Grid lines, top row first.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// One line per painter summarising its state.
    #[must_use]
    pub fn status(&self) -> &[String] {
        &self.status
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        for line in &self.status {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn status_line(painter: &PainterSnapshot) -> String {
    let paint = if painter.infinite_paint {
        "unlimited".to_owned()
    } else {
        painter.paint.to_string()
    };
    format!(
        "{} at {} facing {}, paint {paint}",
        painter.id, painter.cell, painter.facing
    )
}

/// Space-separated printable description of every square, one line per row.
///
/// Each token is `x` for impassable squares, the overlay colour once
/// painted, and the collectible paint count otherwise.
#[must_use]
pub fn describe(grid: &Grid) -> String {
    let mut lines: Vec<Vec<String>> = vec![Vec::new(); grid.size() as usize];
    for (cell, tile) in grid.tiles() {
        lines[cell.row() as usize].push(tile.printable());
    }
    lines
        .into_iter()
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Destination for rendered frames.
pub trait FrameSink {
    /// Presents one frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&Frame) -> AnyResult<()>,
{
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        self(frame)
    }
}

/// Writes frames to any [`Write`] target, optionally pausing after each one.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    frame_delay: Duration,
}

impl<W: Write> WriterSink<W> {
    /// Creates a sink that writes frames back to back.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frame_delay: Duration::ZERO,
        }
    }

    /// Pauses for `frame_delay` after each presented frame.
    #[must_use]
    pub fn with_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// Delay applied after each frame.
    #[must_use]
    pub const fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for WriterSink<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        writeln!(self.writer, "{frame}").context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")?;
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
        Ok(())
    }
}

/// Observer that re-renders the grid after every painter event.
pub struct RenderingObserver<S> {
    grid: SharedGrid,
    painters: BTreeMap<PainterId, PainterSnapshot>,
    sink: S,
    frames: u64,
}

impl<S: FrameSink> RenderingObserver<S> {
    /// Creates an observer drawing `grid` into `sink`.
    pub fn new(grid: SharedGrid, sink: S) -> Self {
        Self {
            grid,
            painters: BTreeMap::new(),
            sink,
            frames: 0,
        }
    }

    /// Number of frames handed to the sink, including failed ones.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Painter state as mirrored from the events seen so far.
    pub fn painters(&self) -> impl Iterator<Item = &PainterSnapshot> + '_ {
        self.painters.values()
    }

    fn apply(&mut self, event: &Event) {
        match *event {
            Event::PainterAdded { painter } => {
                let _ = self.painters.insert(painter.id, painter);
            }
            Event::PainterTurned { painter, facing } => {
                self.update(painter, |snapshot| snapshot.facing = facing);
            }
            Event::PainterMoved { painter, to, .. } => {
                self.update(painter, |snapshot| snapshot.cell = to);
            }
            Event::TilePainted {
                painter, remaining, ..
            }
            | Event::PaintSpilled {
                painter, remaining, ..
            } => {
                self.update(painter, |snapshot| snapshot.paint = remaining);
            }
            Event::PaintTaken {
                painter, inventory, ..
            } => {
                self.update(painter, |snapshot| snapshot.paint = inventory);
            }
            Event::PaintAmountSet { painter, amount } => {
                self.update(painter, |snapshot| snapshot.paint = amount);
            }
            Event::PaintScraped { .. } => {}
        }
    }

    fn update(&mut self, painter: PainterId, change: impl FnOnce(&mut PainterSnapshot)) {
        match self.painters.get_mut(&painter) {
            Some(snapshot) => change(snapshot),
            None => warn!(%painter, "event for a painter created before the renderer"),
        }
    }
}

impl<S: FrameSink> PainterObserver for RenderingObserver<S> {
    fn notify(&mut self, event: &Event) {
        self.apply(event);

        let frame = match self.grid.try_borrow() {
            Ok(grid) => {
                let painters: Vec<PainterSnapshot> = self.painters.values().copied().collect();
                Frame::render(&grid, &painters)
            }
            Err(_) => {
                warn!(?event, "grid busy while rendering, frame skipped");
                return;
            }
        };

        self.frames += 1;
        if let Err(error) = self.sink.present(&frame) {
            warn!(frame = self.frames, "frame sink failed: {error:#}");
        }
    }
}

impl<S> fmt::Debug for RenderingObserver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderingObserver")
            .field("painters", &self.painters)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

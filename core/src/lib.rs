#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridpaint simulation.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the painter agent and the adapters. The world owns tiles and validates
//! loaded grids, painters mutate tiles through discrete actions, and every
//! state-changing action is announced as an [`Event`] to registered
//! [`PainterObserver`]s. Nothing in here draws, sleeps or touches the
//! filesystem.

use std::{fmt, io, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod palette;

pub use palette::{ColorLookup, StandardPalette};

/// Result alias used by every fallible simulation operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Cardinal compass directions a painter can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Facing toward decreasing row indices.
    North,
    /// Facing toward increasing column indices.
    East,
    /// Facing toward increasing row indices.
    South,
    /// Facing toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction obtained by rotating a quarter turn counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// Direction obtained by rotating a quarter turn clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Same rotation as [`Direction::left`].
    #[must_use]
    pub const fn turn_left(self) -> Self {
        self.left()
    }

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Lowercase display name, the inverse of [`Direction::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Reports whether the direction is north.
    #[must_use]
    pub fn is_north(self) -> bool {
        self == Self::North
    }

    /// Reports whether the direction is east.
    #[must_use]
    pub fn is_east(self) -> bool {
        self == Self::East
    }

    /// Reports whether the direction is south.
    #[must_use]
    pub fn is_south(self) -> bool {
        self == Self::South
    }

    /// Reports whether the direction is west.
    #[must_use]
    pub fn is_west(self) -> bool {
        self == Self::West
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::InvalidDirection(value.to_owned()))
    }
}

/// Direction expressed relative to the way a painter currently faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelativeDirection {
    /// A quarter turn counter-clockwise.
    Left,
    /// A quarter turn clockwise.
    Right,
    /// The current facing.
    Forward,
    /// The opposite of the current facing.
    Backward,
}

impl RelativeDirection {
    const ALL: [RelativeDirection; 4] = [
        RelativeDirection::Left,
        RelativeDirection::Right,
        RelativeDirection::Forward,
        RelativeDirection::Backward,
    ];

    /// Converts the relative direction into an absolute one for `facing`.
    #[must_use]
    pub const fn resolve(self, facing: Direction) -> Direction {
        match self {
            Self::Left => facing.left(),
            Self::Right => facing.right(),
            Self::Forward => facing,
            Self::Backward => facing.opposite(),
        }
    }

    /// Lowercase token accepted by [`RelativeDirection::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for RelativeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelativeDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|relative| relative.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown relative direction `{value}`")))
    }
}

/// Kind of a grid square as encoded in grid descriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Solid wall, code `0`.
    Wall,
    /// Plain walkable floor, code `1`.
    Open,
    /// Walkable start square, code `2`.
    Start,
    /// Walkable finish square, code `3`.
    Finish,
    /// Blocking obstacle, code `4`.
    Obstacle,
    /// Walkable square that is both start and finish, code `5`.
    StartAndFinish,
    /// Any other code; treated as blocking.
    Unknown,
}

impl TileType {
    /// Maps a description code onto a tile type. Unrecognized codes map to
    /// [`TileType::Unknown`].
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Wall,
            1 => Self::Open,
            2 => Self::Start,
            3 => Self::Finish,
            4 => Self::Obstacle,
            5 => Self::StartAndFinish,
            _ => Self::Unknown,
        }
    }

    /// Whether a square of this type can hold a painter's paint.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall | Self::Obstacle | Self::Unknown)
    }
}

/// Location of a single grid square expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step toward `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant;
    /// upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Some(Self {
            column: self.column.checked_add_signed(dx)?,
            row: self.row.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Paint colour applied to a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaintColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PaintColor {
    /// Creates a new paint colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for PaintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Unique identifier assigned to a painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PainterId(u32);

impl PainterId {
    /// Creates a new painter identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PainterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "painter-{}", self.0)
    }
}

/// Immutable representation of a single painter's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainterSnapshot {
    /// Unique identifier assigned to the painter.
    pub id: PainterId,
    /// Grid cell currently occupied by the painter.
    pub cell: CellCoord,
    /// Direction the painter faces.
    pub facing: Direction,
    /// Units of paint in the painter's bucket.
    pub paint: u32,
    /// Whether the painter never runs out of paint.
    pub infinite_paint: bool,
}

/// Events broadcast after a painter action changed simulation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A painter joined the world.
    PainterAdded {
        /// State of the painter right after construction.
        painter: PainterSnapshot,
    },
    /// A painter rotated in place.
    PainterTurned {
        /// Painter that turned.
        painter: PainterId,
        /// Facing after the turn.
        facing: Direction,
    },
    /// A painter stepped to a neighbouring square.
    PainterMoved {
        /// Painter that moved.
        painter: PainterId,
        /// Square left behind.
        from: CellCoord,
        /// Square now occupied.
        to: CellCoord,
    },
    /// A painter laid paint on its square.
    TilePainted {
        /// Painter that painted.
        painter: PainterId,
        /// Square that was painted.
        cell: CellCoord,
        /// Colour applied.
        color: PaintColor,
        /// Paint left in the painter's bucket.
        remaining: u32,
    },
    /// A painter spent paint on an impassable square, which keeps no overlay.
    PaintSpilled {
        /// Painter that spent the paint.
        painter: PainterId,
        /// Square that refused the overlay.
        cell: CellCoord,
        /// Paint left in the painter's bucket.
        remaining: u32,
    },
    /// A painter scraped the overlay off its square.
    PaintScraped {
        /// Painter that scraped.
        painter: PainterId,
        /// Square that was scraped.
        cell: CellCoord,
    },
    /// A painter collected a unit of paint from a bucket square.
    PaintTaken {
        /// Painter that collected the paint.
        painter: PainterId,
        /// Square the paint came from.
        cell: CellCoord,
        /// Units still collectible on the square.
        left_on_tile: u32,
        /// Paint now in the painter's bucket.
        inventory: u32,
    },
    /// A painter's bucket was overwritten.
    PaintAmountSet {
        /// Painter whose bucket changed.
        painter: PainterId,
        /// New amount in the bucket.
        amount: u32,
    },
}

/// Receives notifications after every state-changing painter action.
///
/// Renderers implement this to redraw and pace themselves; the simulation
/// never waits on them.
pub trait PainterObserver {
    /// Handles a single event.
    fn notify(&mut self, event: &Event);
}

impl<F> PainterObserver for F
where
    F: FnMut(&Event),
{
    fn notify(&mut self, event: &Event) {
        self(event);
    }
}

/// Reasons a grid description failed to load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The description contained no rows.
    #[error("grid description contains no rows")]
    Empty,
    /// A synthesized grid was requested with zero size.
    #[error("grid size must be positive")]
    ZeroSize,
    /// The first row length differs from the row count.
    #[error("grid must be square but has {rows} rows of {columns} columns")]
    NotSquare {
        /// Number of rows in the description.
        rows: usize,
        /// Number of cells in the first row.
        columns: usize,
    },
    /// The description has more rows than coordinates can address.
    #[error("grid with {rows} rows exceeds the supported size")]
    TooLarge {
        /// Number of rows in the description.
        rows: usize,
    },
    /// A later row length differs from the first.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length every row must have.
        expected: usize,
        /// Length actually found.
        actual: usize,
    },
    /// The description is not an array of arrays.
    #[error("grid description is malformed")]
    Malformed(#[source] serde_json::Error),
    /// A cell object could not be parsed.
    #[error("cell ({column}, {row}) is malformed")]
    MalformedCell {
        /// Column of the offending cell.
        column: usize,
        /// Row of the offending cell.
        row: usize,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The external resource could not be read.
    #[error("could not read grid resource `{locator}`")]
    Unreadable {
        /// Locator handed to the reader.
        locator: String,
        /// Underlying read failure.
        #[source]
        source: io::Error,
    },
}

/// Uniform error taxonomy of the simulation.
///
/// Every variant leaves simulation state exactly as it was before the
/// failed call.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, empty, non-square or unreadable grid description.
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] LoadError),
    /// A painter would reside outside the grid.
    #[error("location ({x}, {y}) lies outside the grid")]
    InvalidLocation {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
    },
    /// A movement step would leave the grid.
    #[error("cannot move {facing} from {from}")]
    InvalidMove {
        /// Square the painter occupies.
        from: CellCoord,
        /// Direction of the rejected step.
        facing: Direction,
    },
    /// Unparseable direction name.
    #[error("unrecognized direction `{0}`")]
    InvalidDirection(String),
    /// Unrecognized relative direction token or colour.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Painting attempted with an empty bucket.
    #[error("painter is out of paint")]
    OutOfPaint,
    /// Painting attempted on a square that still holds collectible paint.
    #[error("cannot paint a square holding {paint_count} units of collectible paint")]
    InvalidPaintLocation {
        /// Collectible units still on the square.
        paint_count: u32,
    },
    /// Direct square access with invalid coordinates.
    #[error("square ({x}, {y}) is out of bounds")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
    },
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Painter agent that walks a shared grid, collects paint and paints squares.
//!
//! Every action is a synchronous step: it borrows the grid once, validates
//! its precondition, mutates, releases the grid and then notifies the
//! world's observers. A failed action returns an error and leaves both the
//! painter and the grid untouched.
//!
//! Actions must not run while the caller still holds a borrow of the
//! [`SharedGrid`]; see its documentation.

use gridpaint_core::{
    CellCoord, ColorLookup, Direction, Error, Event, PaintColor, PainterId, PainterSnapshot,
    RelativeDirection, Result, StandardPalette,
};
use gridpaint_world::{Grid, ObserverRegistry, SharedGrid, Tile, World};
use serde::Deserialize;
use tracing::{debug, info};

/// Grid size from which the default painter may receive unlimited paint.
pub const DEFAULT_LARGE_GRID_THRESHOLD: u32 = 20;

/// Rule deciding which neighbouring squares a painter may step onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementRule {
    /// Any square inside the grid, regardless of its type.
    #[default]
    BoundsOnly,
    /// Squares inside the grid that are also passable.
    Passable,
}

impl MovementRule {
    fn permits(self, grid: &Grid, cell: CellCoord) -> bool {
        match self {
            Self::BoundsOnly => grid.contains(cell),
            Self::Passable => grid.tile(cell).is_some_and(|tile| tile.is_passable()),
        }
    }
}

/// Configuration parameters applied when constructing painters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid size from which the default painter never runs out of paint.
    pub large_grid_threshold: u32,
    /// Movement validity rule.
    pub movement: MovementRule,
}

impl Config {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(large_grid_threshold: u32, movement: MovementRule) -> Self {
        Self {
            large_grid_threshold,
            movement,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_LARGE_GRID_THRESHOLD, MovementRule::BoundsOnly)
    }
}

/// Agent that moves over a world's grid and paints it.
#[derive(Debug)]
pub struct Painter {
    id: PainterId,
    cell: CellCoord,
    facing: Direction,
    paint: u32,
    infinite_paint: bool,
    movement: MovementRule,
    grid: SharedGrid,
    observers: ObserverRegistry,
}

impl Painter {
    /// Creates a painter at `(x, y)` with default configuration.
    pub fn spawn(
        world: &mut World,
        x: i32,
        y: i32,
        facing: Direction,
        paint: u32,
    ) -> Result<Self> {
        Self::spawn_with(world, x, y, facing, paint, &Config::default())
    }

    /// Creates a painter at `(x, y)` using `config`. Never grants unlimited
    /// paint.
    pub fn spawn_with(
        world: &mut World,
        x: i32,
        y: i32,
        facing: Direction,
        paint: u32,
        config: &Config,
    ) -> Result<Self> {
        Self::build(world, x, y, facing, paint, false, config)
    }

    /// Creates the default painter: top-left corner, facing east, no paint.
    ///
    /// This is the only constructor that may grant unlimited paint, and it
    /// does so only when the grid is at least
    /// [`Config::large_grid_threshold`] squares wide.
    pub fn spawn_default(world: &mut World, config: &Config) -> Result<Self> {
        Self::build(world, 0, 0, Direction::East, 0, true, config)
    }

    fn build(
        world: &mut World,
        x: i32,
        y: i32,
        facing: Direction,
        paint: u32,
        may_have_infinite_paint: bool,
        config: &Config,
    ) -> Result<Self> {
        let grid = world.grid();
        let (cell, size) = {
            let grid = grid.borrow();
            if !grid.valid_location(x, y) {
                return Err(Error::InvalidLocation { x, y });
            }
            (CellCoord::new(x as u32, y as u32), grid.size())
        };

        let painter = Self {
            id: world.next_painter_id(),
            cell,
            facing,
            paint,
            infinite_paint: may_have_infinite_paint && size >= config.large_grid_threshold,
            movement: config.movement,
            grid,
            observers: world.observers(),
        };
        info!(
            painter = %painter.id,
            paint = painter.paint,
            infinite = painter.infinite_paint,
            "painter created"
        );
        painter.observers.notify(&Event::PainterAdded {
            painter: painter.snapshot(),
        });
        Ok(painter)
    }

    /// Identifier assigned by the world.
    #[must_use]
    pub const fn id(&self) -> PainterId {
        self.id
    }

    /// Current column.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.cell.column()
    }

    /// Current row.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.cell.row()
    }

    /// Current square.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Direction the painter faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Units of paint in the painter's own bucket.
    #[must_use]
    pub const fn paint_remaining(&self) -> u32 {
        self.paint
    }

    /// Whether painting never consumes paint.
    #[must_use]
    pub const fn has_infinite_paint(&self) -> bool {
        self.infinite_paint
    }

    /// Handle to the grid the painter walks on.
    #[must_use]
    pub fn grid(&self) -> SharedGrid {
        SharedGrid::clone(&self.grid)
    }

    /// Read-only view of the painter for renderers.
    #[must_use]
    pub const fn snapshot(&self) -> PainterSnapshot {
        PainterSnapshot {
            id: self.id,
            cell: self.cell,
            facing: self.facing,
            paint: self.paint,
            infinite_paint: self.infinite_paint,
        }
    }

    /// Rotates a quarter turn counter-clockwise.
    pub fn turn_left(&mut self) {
        self.facing = self.facing.turn_left();
        debug!(painter = %self.id, facing = %self.facing, "turned");
        self.observers.notify(&Event::PainterTurned {
            painter: self.id,
            facing: self.facing,
        });
    }

    /// Steps one square forward.
    ///
    /// Fails with [`Error::InvalidMove`] when the step would leave the grid
    /// (or, under [`MovementRule::Passable`], enter an impassable square).
    pub fn move_forward(&mut self) -> Result<()> {
        let from = self.cell;
        let to = self.target(self.facing).ok_or(Error::InvalidMove {
            from,
            facing: self.facing,
        })?;
        self.cell = to;
        debug!(painter = %self.id, %from, %to, "moved");
        self.observers.notify(&Event::PainterMoved {
            painter: self.id,
            from,
            to,
        });
        Ok(())
    }

    /// Whether one step toward `relative` would be accepted.
    #[must_use]
    pub fn can_move(&self, relative: RelativeDirection) -> bool {
        self.target(relative.resolve(self.facing)).is_some()
    }

    /// Parses `relative` (`left`, `right`, `forward`, `backward`) and checks
    /// the step.
    pub fn can_move_named(&self, relative: &str) -> Result<bool> {
        relative
            .parse::<RelativeDirection>()
            .map(|relative| self.can_move(relative))
    }

    /// Whether the square ahead would accept a step.
    #[must_use]
    pub fn can_move_forward(&self) -> bool {
        self.can_move(RelativeDirection::Forward)
    }

    /// Paints the current square with `color`.
    ///
    /// Fails with [`Error::OutOfPaint`] when the bucket is empty and with
    /// [`Error::InvalidPaintLocation`] when the square still holds
    /// collectible paint. An impassable square keeps no overlay but the
    /// paint is spent all the same.
    pub fn paint(&mut self, color: PaintColor) -> Result<()> {
        if !self.has_paint() {
            return Err(Error::OutOfPaint);
        }

        let applied = {
            let mut grid = self.grid.borrow_mut();
            let tile = grid
                .tile_mut(self.cell)
                .ok_or(Error::InvalidLocation {
                    x: self.cell.column() as i32,
                    y: self.cell.row() as i32,
                })?;
            tile.set_color(color)?;
            tile.is_passable()
        };

        if !self.infinite_paint {
            self.paint -= 1;
        }

        if applied {
            debug!(painter = %self.id, %color, remaining = self.paint, "painted");
            self.observers.notify(&Event::TilePainted {
                painter: self.id,
                cell: self.cell,
                color,
                remaining: self.paint,
            });
        } else {
            debug!(painter = %self.id, cell = %self.cell, "paint spilled on impassable square");
            self.observers.notify(&Event::PaintSpilled {
                painter: self.id,
                cell: self.cell,
                remaining: self.paint,
            });
        }
        Ok(())
    }

    /// Paints the current square with a colour from the standard palette.
    pub fn paint_named(&mut self, name: &str) -> Result<()> {
        self.paint_with(name, &StandardPalette)
    }

    /// Paints the current square with the colour `lookup` resolves for
    /// `name`. Unknown names fail with [`Error::InvalidArgument`].
    pub fn paint_with(&mut self, name: &str, lookup: &impl ColorLookup) -> Result<()> {
        let color = lookup
            .lookup(name)
            .ok_or_else(|| Error::InvalidArgument(format!("unrecognized color `{name}`")))?;
        self.paint(color)
    }

    /// Removes any paint from the current square.
    pub fn scrape_paint(&mut self) {
        let removed = self
            .grid
            .borrow_mut()
            .tile_mut(self.cell)
            .and_then(|tile| tile.remove_paint());
        if removed.is_some() {
            self.observers.notify(&Event::PaintScraped {
                painter: self.id,
                cell: self.cell,
            });
        }
    }

    /// Moves one unit of paint from the current square into the bucket.
    ///
    /// Emptying the square resets its asset id to `0`. Standing on a square
    /// without paint does nothing.
    pub fn take_paint(&mut self) {
        let left_on_tile = {
            let mut grid = self.grid.borrow_mut();
            let Some(tile) = grid.tile_mut(self.cell) else {
                return;
            };
            if !tile.contains_paint() {
                debug!(painter = %self.id, cell = %self.cell, "no paint to collect here");
                return;
            }
            let left = tile.collect_paint();
            if left == 0 {
                tile.set_asset_id(0);
            }
            left
        };

        self.paint = self.paint.saturating_add(1);
        debug!(painter = %self.id, inventory = self.paint, "took paint");
        self.observers.notify(&Event::PaintTaken {
            painter: self.id,
            cell: self.cell,
            left_on_tile,
            inventory: self.paint,
        });
    }

    /// Whether the painter can paint right now.
    #[must_use]
    pub const fn has_paint(&self) -> bool {
        self.infinite_paint || self.paint > 0
    }

    /// Whether the current square has been painted.
    #[must_use]
    pub fn is_on_paint(&self) -> bool {
        self.with_tile(|tile| tile.has_color())
    }

    /// Whether the current square holds collectible paint.
    #[must_use]
    pub fn is_on_bucket(&self) -> bool {
        self.with_tile(|tile| tile.contains_paint())
    }

    /// Overlay colour of the current square.
    #[must_use]
    pub fn color(&self) -> Option<PaintColor> {
        self.grid
            .borrow()
            .tile(self.cell)
            .and_then(|tile| tile.color())
    }

    /// Overwrites the bucket. Negative amounts and painters with unlimited
    /// paint are left unchanged.
    pub fn set_paint(&mut self, amount: i64) {
        if amount < 0 {
            debug!(painter = %self.id, amount, "paint amount must not be negative");
            return;
        }
        if self.infinite_paint {
            return;
        }

        self.paint = u32::try_from(amount).unwrap_or(u32::MAX);
        self.observers.notify(&Event::PaintAmountSet {
            painter: self.id,
            amount: self.paint,
        });
    }

    /// Whether the painter faces north.
    #[must_use]
    pub fn is_facing_north(&self) -> bool {
        self.facing.is_north()
    }

    /// Whether the painter faces east.
    #[must_use]
    pub fn is_facing_east(&self) -> bool {
        self.facing.is_east()
    }

    /// Whether the painter faces south.
    #[must_use]
    pub fn is_facing_south(&self) -> bool {
        self.facing.is_south()
    }

    /// Whether the painter faces west.
    #[must_use]
    pub fn is_facing_west(&self) -> bool {
        self.facing.is_west()
    }

    fn target(&self, direction: Direction) -> Option<CellCoord> {
        let grid = self.grid.borrow();
        self.cell
            .step(direction)
            .filter(|cell| self.movement.permits(&grid, *cell))
    }

    fn with_tile(&self, query: impl FnOnce(&Tile) -> bool) -> bool {
        self.grid.borrow().tile(self.cell).is_some_and(query)
    }
}

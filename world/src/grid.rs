//! Tile storage and bounds-checked access.

use gridpaint_core::{CellCoord, Error, PaintColor, Result, StandardPalette, TileType};
use tracing::debug;

/// State of a single grid square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    tile_type: TileType,
    asset_id: i32,
    paint_count: u32,
    color: Option<PaintColor>,
}

impl Tile {
    pub(crate) const fn new(tile_type: TileType, asset_id: i32, paint_count: u32) -> Self {
        Self {
            tile_type,
            asset_id,
            paint_count,
            color: None,
        }
    }

    /// Kind of square this tile was loaded as.
    #[must_use]
    pub const fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Whether the square can receive paint. Derived from the tile type.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.tile_type.is_passable()
    }

    /// Units of paint that can still be collected from the square.
    #[must_use]
    pub const fn paint_count(&self) -> u32 {
        self.paint_count
    }

    /// Decorative hint for renderers.
    #[must_use]
    pub const fn asset_id(&self) -> i32 {
        self.asset_id
    }

    /// Replaces the decorative hint.
    pub fn set_asset_id(&mut self, asset_id: i32) {
        self.asset_id = asset_id;
    }

    /// Overlay colour laid down by a painter, if any.
    #[must_use]
    pub const fn color(&self) -> Option<PaintColor> {
        self.color
    }

    /// Whether a painter has painted the square.
    #[must_use]
    pub const fn has_color(&self) -> bool {
        self.color.is_some()
    }

    /// Whether the square still holds collectible paint.
    #[must_use]
    pub const fn contains_paint(&self) -> bool {
        self.paint_count > 0
    }

    /// Paints the square, overwriting any previous overlay.
    ///
    /// A square that still holds collectible paint rejects the overlay with
    /// [`Error::InvalidPaintLocation`]. Impassable squares silently keep no
    /// overlay.
    pub fn set_color(&mut self, color: PaintColor) -> Result<()> {
        if self.contains_paint() {
            return Err(Error::InvalidPaintLocation {
                paint_count: self.paint_count,
            });
        }
        if self.is_passable() {
            self.color = Some(color);
        }
        Ok(())
    }

    /// Takes one unit of paint from the square and returns what is left.
    pub fn collect_paint(&mut self) -> u32 {
        if self.contains_paint() {
            self.paint_count -= 1;
        } else {
            debug!("no paint to collect on this square");
        }
        self.paint_count
    }

    /// Clears the overlay, returning the colour that was removed.
    pub fn remove_paint(&mut self) -> Option<PaintColor> {
        let removed = self.color.take();
        if removed.is_none() {
            debug!("no paint to remove on this square");
        }
        removed
    }

    /// Single-token description: `x` for impassable squares, the overlay
    /// colour once painted (its standard name, or `#rrggbb`), otherwise the
    /// collectible paint count.
    #[must_use]
    pub fn printable(&self) -> String {
        if !self.is_passable() {
            "x".to_owned()
        } else if let Some(color) = self.color {
            StandardPalette
                .name_of(color)
                .map_or_else(|| color.to_string(), str::to_owned)
        } else {
            self.paint_count.to_string()
        }
    }
}

/// Square matrix of tiles stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// `tiles` must hold exactly `size * size` entries in row-major order.
    pub(crate) fn from_tiles(size: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), (size as usize) * (size as usize));
        Self { size, tiles }
    }

    /// Number of rows, which equals the number of columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether `(x, y)` addresses a square of this grid.
    #[must_use]
    pub fn valid_location(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y).is_some()
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Square at `(x, y)`.
    pub fn square_at(&self, x: i32, y: i32) -> Result<&Tile> {
        self.cell_at(x, y)
            .and_then(|cell| self.tile(cell))
            .ok_or(Error::OutOfBounds { x, y })
    }

    /// Mutable square at `(x, y)`. Changes are visible to every holder of
    /// the grid.
    pub fn square_at_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile> {
        match self.cell_at(x, y) {
            Some(cell) => self.tile_mut(cell).ok_or(Error::OutOfBounds { x, y }),
            None => Err(Error::OutOfBounds { x, y }),
        }
    }

    /// Square at `cell`, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index))
    }

    /// Mutable square at `cell`, if it lies inside the grid.
    pub fn tile_mut(&mut self, cell: CellCoord) -> Option<&mut Tile> {
        self.index(cell).and_then(|index| self.tiles.get_mut(index))
    }

    /// Iterates every square with its coordinate, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, &Tile)> + '_ {
        let size = self.size;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % size, index / size), tile)
        })
    }

    fn cell_at(&self, x: i32, y: i32) -> Option<CellCoord> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        let cell = CellCoord::new(column, row);
        self.contains(cell).then_some(cell)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

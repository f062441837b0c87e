//! Turns serialized grid descriptions into validated grids.
//!
//! A description is a JSON array of rows, each row an array of cell objects:
//!
//! ```json
//! [[{"tileType": 1}, {"tileType": 0}],
//!  [{"tileType": 1, "value": 3}, {"tileType": 2, "assetId": 7}]]
//! ```
//!
//! `tileType` is required; `assetId` and `value` (collectible paint) default
//! to zero. Rows are `y`, cells within a row are `x`.

use std::{fs, io, path::Path};

use gridpaint_core::{LoadError, Result, TileType};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::grid::{Grid, Tile};

#[derive(Debug, Deserialize)]
struct CellDescriptor {
    #[serde(rename = "tileType")]
    tile_type: i64,
    #[serde(rename = "assetId", default)]
    asset_id: i32,
    #[serde(default)]
    value: u32,
}

impl CellDescriptor {
    fn into_tile(self) -> Tile {
        Tile::new(TileType::from_code(self.tile_type), self.asset_id, self.value)
    }
}

/// Parses a grid description.
///
/// Fails with [`LoadError::Empty`] when there are no rows,
/// [`LoadError::NotSquare`] when the first row length differs from the row
/// count, [`LoadError::RaggedRow`] when any row differs from the first, and
/// [`LoadError::Malformed`]/[`LoadError::MalformedCell`] on any parse failure.
/// All of them surface as [`gridpaint_core::Error::InvalidGrid`].
pub fn from_description(description: &str) -> Result<Grid> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(description).map_err(LoadError::Malformed)?;

    let height = rows.len();
    if height == 0 {
        return Err(LoadError::Empty.into());
    }

    let width = rows[0].len();
    if width != height {
        return Err(LoadError::NotSquare {
            rows: height,
            columns: width,
        }
        .into());
    }

    let size = u32::try_from(height).map_err(|_| LoadError::TooLarge { rows: height })?;

    if let Some((row, line)) = rows.iter().enumerate().find(|(_, line)| line.len() != width) {
        return Err(LoadError::RaggedRow {
            row,
            expected: width,
            actual: line.len(),
        }
        .into());
    }

    // All rows are `width` long here.
    let mut tiles = Vec::with_capacity(width * height);
    for (y, line) in rows.into_iter().enumerate() {
        for (x, cell) in line.into_iter().enumerate() {
            let descriptor = CellDescriptor::deserialize(cell).map_err(|source| {
                LoadError::MalformedCell {
                    column: x,
                    row: y,
                    source,
                }
            })?;
            tiles.push(descriptor.into_tile());
        }
    }

    info!(size, "loaded grid description");
    Ok(Grid::from_tiles(size, tiles))
}

/// Reads a description through `read` and parses it.
///
/// `read` is the external resolver for `locator`; any failure it reports is
/// wrapped as [`LoadError::Unreadable`].
pub fn from_resource<R>(locator: &str, read: R) -> Result<Grid>
where
    R: FnOnce(&str) -> io::Result<String>,
{
    let description = read(locator).map_err(|source| LoadError::Unreadable {
        locator: locator.to_owned(),
        source,
    })?;
    from_description(&description)
}

/// Reads a description from the filesystem and parses it.
pub fn from_path(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    from_resource(&path.display().to_string(), |_| fs::read_to_string(path))
}

/// Builds a `size x size` grid of open squares without paint.
pub fn empty(size: u32) -> Result<Grid> {
    if size == 0 {
        return Err(LoadError::ZeroSize.into());
    }

    let count = (size as usize) * (size as usize);
    let tiles = vec![Tile::new(TileType::Open, 0, 0); count];
    info!(size, "synthesized empty grid");
    Ok(Grid::from_tiles(size, tiles))
}

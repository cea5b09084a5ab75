use glam::Vec2;

use crate::api::TileSource;
use crate::error::ConfigError;
use crate::tile::Tile;
use crate::tileset::Tileset;

/// Rectangular tile map, row 0 at the bottom.
///
/// Built once per stage load and then shared read-only (usually behind an
/// `Arc`); a reload builds a new grid rather than editing this one.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    tile_size: u32,
    cols: usize,
    rows: usize,
    // Row-major from the bottom row: index = y * cols + x.
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Empty grid of `cols × rows` cells.
    pub fn new(tile_size: u32, cols: usize, rows: usize) -> Self {
        debug_assert!(tile_size > 0, "tile size must be positive");
        Self { tile_size, cols, rows, cells: vec![None; cols * rows] }
    }

    /// Build from level-file order (first row is the top of the map).
    /// Each cell is an index into `tileset` or `None` for empty.
    pub fn from_rows_top_down(tileset: &Tileset, rows: &[Vec<Option<usize>>]) -> Result<Self, ConfigError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let mut grid = Self::new(tileset.tile_size, cols, rows.len());
        for (file_row, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ConfigError::RaggedGrid { row: file_row, expected: cols, found: row.len() });
            }
            let y = rows.len() - 1 - file_row;
            for (x, cell) in row.iter().enumerate() {
                let tile = match cell {
                    None => None,
                    Some(index) => Some(
                        *tileset
                            .get(*index)
                            .ok_or(ConfigError::UnknownTile { x, y, index: *index })?,
                    ),
                };
                grid.cells[y * cols + x] = tile;
            }
        }
        Ok(grid)
    }

    /// Place or clear a tile while the grid is still being built.
    pub fn set(&mut self, x: usize, y: usize, tile: Option<Tile>) {
        debug_assert!(x < self.cols && y < self.rows, "tile ({x}, {y}) outside grid");
        if x < self.cols && y < self.rows {
            self.cells[y * self.cols + x] = tile;
        }
    }

    /// Fill the inclusive rectangle `[x0, x1] × [y0, y1]` with `tile`.
    pub fn fill(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, tile: Tile) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, Some(tile));
            }
        }
    }

    /// World position of a tile's bottom-left corner.
    pub fn tile_origin(&self, x: i32, y: i32) -> Vec2 {
        let ts = self.tile_size as f32;
        Vec2::new(x as f32 * ts, y as f32 * ts)
    }

    /// World-space size of the whole map in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        let ts = self.tile_size as f32;
        Vec2::new(self.cols as f32 * ts, self.rows as f32 * ts)
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().flatten().filter(|t| t.is_collidable).count()
    }
}

impl TileSource for TileGrid {
    fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        self.cells[y as usize * self.cols + x as usize].as_ref()
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

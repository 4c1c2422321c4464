//! Block geometry of a sprite sheet.
//! Mixing up pixels and cell indices is a no no, so every conversion lives here.
//!
//! Units used in this crate:
//!
//! Pixel x/y position/length: u32
//! Cell (raster order) index/count: usize
//! Frame (sequence position) index/count: usize
//! Column/row position/count: u32
//! Scaled pixel coordinates (pointer input): f32

/// The fixed pixel size of one block, i.e. of one cell of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
}

impl BlockSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero. Such a block cannot partition an image.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::new(16, 16)
    }
}

/// A pixel rectangle on the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The top-left corner of the rectangle.
    pub const fn origin(self) -> (u32, u32) {
        (self.x, self.y)
    }
}

/// How an image is partitioned into whole blocks. Partial blocks at the right and bottom
/// edges are not cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    /// Computes the grid of an `image_width` by `image_height` image cut into `block`s.
    /// An empty block yields an empty grid.
    pub const fn new(image_width: u32, image_height: u32, block: BlockSize) -> Self {
        if block.is_empty() {
            Self {
                columns: 0,
                rows: 0,
            }
        } else {
            Self {
                columns: image_width / block.width,
                rows: image_height / block.height,
            }
        }
    }

    /// Total number of cells in the grid.
    pub const fn cell_count(self) -> usize {
        (self.columns as u64 * self.rows as u64) as usize
    }

    /// Converts a raster index to its `(column, row)` position.
    pub const fn position(self, index: usize) -> (u32, u32) {
        if self.columns == 0 {
            return (0, 0);
        }
        (
            (index as u64 % self.columns as u64) as u32,
            (index as u64 / self.columns as u64) as u32,
        )
    }

    /// Converts a `(column, row)` position to its raster index.
    pub const fn index(self, column: u32, row: u32) -> usize {
        (row as u64 * self.columns as u64 + column as u64) as usize
    }

    /// The source rectangle of the cell at raster `index`.
    pub const fn cell_rect(self, index: usize, block: BlockSize) -> Rect {
        let (column, row) = self.position(index);
        Rect::new(
            column * block.width,
            row * block.height,
            block.width,
            block.height,
        )
    }
}

/// Moves `index` by `delta` inside `[0, count)`, wrapping around at both ends.
///
/// Returns `index` unchanged when `count` is zero.
pub const fn wrap(index: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return index;
    }
    let count = count as i128;
    ((index as i128 + delta as i128).rem_euclid(count)) as usize
}

/// Scale factors that are not finite and positive fall back to 1.
fn effective_scale(scale: Option<f32>) -> f32 {
    match scale {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => 1.0,
    }
}

/// The `(column, row)` of the block containing a scaled pixel coordinate.
fn block_position(x: f32, y: f32, scale: f32, block: BlockSize) -> Option<(u32, u32)> {
    if block.is_empty() || !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return None;
    }
    let column = (x / (block.width as f32 * scale)).floor();
    let row = (y / (block.height as f32 * scale)).floor();
    if column > u32::MAX as f32 || row > u32::MAX as f32 {
        return None;
    }
    Some((column as u32, row as u32))
}

/// Maps a pixel coordinate on a sheet displayed at `scale` to the raster index of the
/// block under it.
///
/// Returns `None` for negative or non-finite coordinates, and for points right of the
/// last column of a `columns`-wide sheet.
pub fn frame_at(
    x: f32,
    y: f32,
    scale: Option<f32>,
    block: BlockSize,
    columns: u32,
) -> Option<usize> {
    let (column, row) = block_position(x, y, effective_scale(scale), block)?;
    if column >= columns {
        return None;
    }
    Some(Grid { columns, rows: 0 }.index(column, row))
}

/// Maps a pixel coordinate on a sheet displayed at `scale` to the top-left corner of the
/// block containing it, in the same scaled pixel space.
pub fn block_origin(x: f32, y: f32, scale: Option<f32>, block: BlockSize) -> Option<(f32, f32)> {
    let scale = effective_scale(scale);
    let (column, row) = block_position(x, y, scale, block)?;
    Some((
        column as f32 * block.width as f32 * scale,
        row as f32 * block.height as f32 * scale,
    ))
}

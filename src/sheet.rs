//! Module for reading [`SpriteSheet`]s, i.e. images partitioned into equally sized blocks.

use image::RgbaImage;
use log::debug;

use crate::{
    config::ImageSource,
    error::{Error, Result},
    geometry::{BlockSize, Grid, Rect},
};

/// A decoded source image together with the grid its blocks form.
///
/// The grid is derived from the image and block size and is recomputed whenever either
/// changes. A sheet always holds at least one cell.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: RgbaImage,
    block: BlockSize,
    grid: Grid,
}

impl SpriteSheet {
    /// Creates a sheet from decoded RGBA pixels.
    ///
    /// Fails if the block is empty or larger than the image in either dimension.
    pub fn new(image: RgbaImage, block: BlockSize) -> Result<Self> {
        let grid = checked_grid(&image, block)?;
        debug!(
            "sprite sheet {}x{} cut into {}x{} blocks: {} columns, {} rows",
            image.width(),
            image.height(),
            block.width,
            block.height,
            grid.columns,
            grid.rows
        );
        Ok(Self { image, block, grid })
    }

    /// Reads a sheet from the specified file path.
    ///
    /// The file can be in any image format supported by [`image::open()`], decided by the
    /// file extension given.
    pub fn open<P: AsRef<std::path::Path>>(path: P, block: BlockSize) -> Result<Self> {
        let path = path.as_ref();
        debug!("decoding sprite sheet {}", path.display());
        Self::new(image::open(path)?.into_rgba8(), block)
    }

    /// Resolves an [`ImageSource`]: handles are used as they are, paths are decoded.
    pub fn from_source(source: &ImageSource, block: BlockSize) -> Result<Self> {
        match source {
            ImageSource::Path(path) => Self::open(path, block),
            ImageSource::Handle(img) => Self::new(img.to_rgba8(), block),
        }
    }

    /// Cuts the same image into blocks of a different size.
    ///
    /// On error the sheet is left unchanged.
    pub fn set_block_size(&mut self, block: BlockSize) -> Result<()> {
        self.grid = checked_grid(&self.image, block)?;
        self.block = block;
        debug!(
            "sprite sheet re-cut into {}x{} blocks: {} columns, {} rows",
            block.width, block.height, self.grid.columns, self.grid.rows
        );
        Ok(())
    }

    /// The decoded RGBA pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Size of one block in pixels.
    pub fn block(&self) -> BlockSize {
        self.block
    }

    /// Whole blocks per row.
    pub fn columns(&self) -> u32 {
        self.grid.columns
    }

    /// Whole block rows.
    pub fn rows(&self) -> u32 {
        self.grid.rows
    }

    /// Number of whole blocks on the sheet. Never zero.
    pub fn cell_count(&self) -> usize {
        self.grid.cell_count()
    }

    /// The source rectangle of the cell at raster index `cell`.
    pub fn cell_rect(&self, cell: usize) -> Rect {
        self.grid.cell_rect(cell, self.block)
    }

    /// Checks that every entry of a frame sequence names a cell of this sheet.
    pub fn check_frames(&self, frames: &[usize]) -> Result<()> {
        let cell_count = self.cell_count();
        match frames.iter().find(|&&frame| frame >= cell_count) {
            Some(&frame) => Err(Error::FrameOutOfRange { frame, cell_count }),
            None => Ok(()),
        }
    }
}

fn checked_grid(image: &RgbaImage, block: BlockSize) -> Result<Grid> {
    if block.is_empty() {
        return Err(Error::InvalidBlockSize {
            width: block.width,
            height: block.height,
        });
    }
    let grid = Grid::new(image.width(), image.height(), block);
    if grid.cell_count() == 0 {
        return Err(Error::NoCells {
            image_width: image.width(),
            image_height: image.height(),
            block_width: block.width,
            block_height: block.height,
        });
    }
    Ok(grid)
}

//! Error type shared by the whole crate.

use image::ImageError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or driving an [`crate::animator::Animator`].
#[derive(Debug, Error)]
pub enum Error {
    /// The sprite sheet could not be decoded or an exported frame could not be encoded.
    #[error("image error: {0}")]
    Image(#[from] ImageError),
    /// Reading a config file or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A config file is not valid TOML or has fields of the wrong type.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    /// Neither an image path nor an image handle was configured.
    #[error("no sprite sheet image was configured")]
    MissingImage,
    /// Blocks must be at least one pixel in each dimension.
    #[error("block size must be non-zero, got {width}x{height}")]
    InvalidBlockSize { width: u32, height: u32 },
    /// The block is larger than the image, so the sheet holds no complete cell.
    #[error(
        "a {image_width}x{image_height} image holds no {block_width}x{block_height} block"
    )]
    NoCells {
        image_width: u32,
        image_height: u32,
        block_width: u32,
        block_height: u32,
    },
    /// A frame sequence names a cell that the sheet does not have.
    #[error("frame refers to cell {frame}, but the sheet only has {cell_count} cells")]
    FrameOutOfRange { frame: usize, cell_count: usize },
}

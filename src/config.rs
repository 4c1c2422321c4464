//! Construction options for an [`crate::animator::Animator`].
//!
//! [`Options`] starts from sensible defaults and is extended either with the builder
//! methods or by reading a TOML file:
//!
//! ```toml
//! image = "walk.png"
//! frames = [0, 1, 2, 2, 2, 3]
//! block_width = 32
//! block_height = 32
//! delay_ms = 100.0
//! ```
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use image::DynamicImage;
use log::warn;
use serde::{Deserialize, Deserializer};

use crate::{error::Result, geometry::BlockSize};

/// Delay used when none is configured, or when the configured one is not a number.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
/// Smallest delay accepted between two ticks. Smaller positive or non-positive delays
/// are raised to this.
pub const MIN_DELAY: Duration = Duration::from_millis(1);
/// Largest representable delay, a bit over 584 years.
pub const MAX_DELAY: Duration = Duration::from_nanos(u64::MAX);

/// Where the sprite sheet comes from.
#[derive(Clone)]
pub enum ImageSource {
    /// A file to decode with [`image::open`].
    Path(PathBuf),
    /// An image that was already decoded by the caller.
    Handle(Arc<DynamicImage>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Handle(img) => f
                .debug_struct("Handle")
                .field("width", &img.width())
                .field("height", &img.height())
                .finish(),
        }
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        Self::Handle(Arc::new(img))
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

fn image_path<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<ImageSource>, D::Error> {
    Ok(Option::<PathBuf>::deserialize(deserializer)?.map(ImageSource::Path))
}

/// Options an animator is constructed from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// The sprite sheet. Required by [`crate::animator::Animator::new`].
    #[serde(rename = "image", deserialize_with = "image_path")]
    pub source: Option<ImageSource>,
    /// Explicit playback order over raster cell indices. `None` (or an empty sequence)
    /// plays every cell in raster order.
    pub frames: Option<Vec<usize>>,
    /// Width of one block in pixels.
    pub block_width: u32,
    /// Height of one block in pixels.
    pub block_height: u32,
    /// Milliseconds between one tick and the next.
    pub delay_ms: f64,
}

impl Default for Options {
    fn default() -> Self {
        let block = BlockSize::default();
        Self {
            source: None,
            frames: None,
            block_width: block.width,
            block_height: block.height,
            delay_ms: DEFAULT_DELAY.as_millis() as f64,
        }
    }
}

impl Options {
    /// Creates options for the given sprite sheet, with every other field defaulted.
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Parses options from a TOML document. Relative image paths are kept as written.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads options from a TOML file. A relative `image` path is resolved against the
    /// directory containing the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut options = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        if let Some(ImageSource::Path(image)) = &mut options.source {
            if image.is_relative() {
                if let Some(dir) = path.parent() {
                    *image = dir.join(&*image);
                }
            }
        }
        Ok(options)
    }

    /// Uses the image file at `path`.
    pub fn image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(ImageSource::Path(path.into()));
        self
    }

    /// Uses an already decoded image. This replaces any configured path.
    pub fn image_handle(mut self, img: impl Into<Arc<DynamicImage>>) -> Self {
        self.source = Some(ImageSource::Handle(img.into()));
        self
    }

    /// Plays `frames` in order instead of every cell in raster order.
    pub fn frames(mut self, frames: impl Into<Vec<usize>>) -> Self {
        self.frames = Some(frames.into());
        self
    }

    /// Sets the block size in pixels.
    pub fn block_size(mut self, width: u32, height: u32) -> Self {
        self.block_width = width;
        self.block_height = height;
        self
    }

    /// Sets the time between ticks in milliseconds.
    pub fn delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// The configured block size.
    pub fn block(&self) -> BlockSize {
        BlockSize::new(self.block_width, self.block_height)
    }

    /// The configured delay, normalized by [`delay_from_ms`].
    pub fn delay(&self) -> Duration {
        delay_from_ms(self.delay_ms)
    }
}

/// Converts a millisecond delay into a tick period.
///
/// Non-finite values become [`DEFAULT_DELAY`]; anything below [`MIN_DELAY`] is raised to it
/// and anything above [`MAX_DELAY`] is lowered to it.
pub fn delay_from_ms(ms: f64) -> Duration {
    if !ms.is_finite() {
        warn!("delay of {ms} ms is not a number, using {DEFAULT_DELAY:?}");
        return DEFAULT_DELAY;
    }
    let nanos = (ms * 1_000_000.0).round();
    if nanos >= u64::MAX as f64 {
        return MAX_DELAY;
    }
    if nanos < MIN_DELAY.as_nanos() as f64 {
        warn!("delay of {ms} ms is below the minimum, using {MIN_DELAY:?}");
        return MIN_DELAY;
    }
    Duration::from_nanos(nanos as u64)
}

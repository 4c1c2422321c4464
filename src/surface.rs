//! Module for drawing targets.
//! Contains the [`Surface`] trait and the in-memory [`Canvas`] implementing it.

use std::path::Path;

use image::{imageops, imageops::FilterType, GenericImageView, RgbaImage};

use crate::{error::Result, geometry::Rect};

/// Something a block of the sprite sheet can be drawn onto.
///
/// The point (0, 0) is the top left pixel of the surface.
pub trait Surface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Changes the surface size. The contents afterwards are unspecified until the next draw.
    fn resize(&mut self, width: u32, height: u32);

    /// Makes every pixel transparent.
    fn clear(&mut self);

    /// Copies the `src` rectangle of `image` onto the surface at the origin, scaled to the
    /// current surface size.
    ///
    /// # Panics
    /// May panic if `src` is not inside `image`.
    fn draw_region(&mut self, image: &RgbaImage, src: Rect);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn draw_region(&mut self, image: &RgbaImage, src: Rect) {
        (**self).draw_region(image, src)
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn draw_region(&mut self, image: &RgbaImage, src: Rect) {
        (**self).draw_region(image, src)
    }
}

/// An RGBA pixel buffer surface. Scaling uses nearest neighbor sampling, so pixel art
/// stays crisp.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Create a new transparent canvas with the given dimensions in pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// The current contents.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Writes the current contents to an image file, the format being decided by the
    /// file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(self.pixels.save(path)?)
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.pixels.dimensions() != (width, height) {
            self.pixels = RgbaImage::new(width, height);
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn draw_region(&mut self, image: &RgbaImage, src: Rect) {
        let (width, height) = self.pixels.dimensions();
        if width == 0 || height == 0 || src.width == 0 || src.height == 0 {
            return;
        }
        let region = image.view(src.x, src.y, src.width, src.height).to_image();
        if region.dimensions() == (width, height) {
            self.pixels = region;
        } else {
            self.pixels = imageops::resize(&region, width, height, FilterType::Nearest);
        }
    }
}

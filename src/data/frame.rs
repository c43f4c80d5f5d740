//! Working frame: a 3-channel 8-bit image in the analysis coordinate space.

use image::RgbImage;
use ndarray::Array2;

/// A 2D grid of 3-channel pixels, each channel in 0..=255.
///
/// All polygon coordinates are interpreted in this frame's pixel space,
/// i.e. after ingestion resized the source to fit the working box.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    /// Wrap an already decoded RGB image.
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Create a frame filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, image::Rgb(color)),
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Borrow the underlying image.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Mutable access to the underlying image.
    pub fn pixels_mut(&mut self) -> &mut RgbImage {
        &mut self.pixels
    }

    /// Copy one channel out as a `(height, width)` intensity grid.
    ///
    /// Channels above 2 are clamped to the last channel.
    pub fn channel(&self, index: usize) -> Array2<u8> {
        let index = index.min(2);
        let (width, height) = self.dimensions();
        Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            self.pixels.get_pixel(x as u32, y as u32)[index]
        })
    }
}

impl From<RgbImage> for Frame {
    fn from(pixels: RgbImage) -> Self {
        Self::new(pixels)
    }
}

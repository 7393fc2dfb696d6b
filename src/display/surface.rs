//! Raster targets the renderer draws into.

use image::{Rgb, RgbImage};

use crate::options::Color;

/// A 2D raster target that can be cleared and filled with solid rectangles.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color);
}

/// In-memory surface, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copy into an [`image::RgbImage`] for saving or further processing.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let color = self.pixel(x, y).unwrap_or(Color::BLACK);
            Rgb([color.r, color.g, color.b])
        })
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        // clip to the buffer
        let x_end = x.saturating_add(width).min(self.width) as usize;
        let y_end = y.saturating_add(height).min(self.height) as usize;
        let stride = self.width as usize;
        for row in (y as usize)..y_end {
            let start = row * stride + x as usize;
            let end = row * stride + x_end;
            if start < end {
                self.pixels[start..end].fill(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = FrameBuffer::new(4, 4);
        let red = Color::rgb(0xFF, 0, 0);
        fb.fill_rect(2, 2, 10, 10, red);
        assert_eq!(fb.pixel(3, 3), Some(red));
        assert_eq!(fb.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(fb.pixels().iter().filter(|&&c| c == red).count(), 4);
    }

    #[test]
    fn fill_rect_outside_is_noop() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.fill_rect(5, 0, 1, 1, Color::rgb(1, 2, 3));
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn image_copy_keeps_size_and_pixels() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.clear(Color::rgb(1, 2, 3));
        fb.fill_rect(2, 1, 1, 1, Color::rgb(0xAA, 0xBB, 0xCC));

        let img = fb.to_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb([1, 2, 3]));
        assert_eq!(img.get_pixel(2, 1), &Rgb([0xAA, 0xBB, 0xCC]));
    }

    #[test]
    fn image_saves_as_png() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.clear(Color::rgb(0x99, 0x66, 0x00));
        let mut bytes = std::io::Cursor::new(Vec::new());
        fb.to_image()
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        assert!(bytes.get_ref().starts_with(b"\x89PNG"));
    }
}

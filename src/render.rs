//! Tile rendering.
//!
//! Turns a sampled value and its status level into what a key shows: a
//! solid background in the status color and the value as the title.

use promdeck_types::{Rgb, StatusLevel};

/// Edge length of a key image in pixels.
pub const TILE_SIZE: u32 = 72;

/// An RGBA pixel buffer, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// A fully opaque bitmap filled with `color`.
    pub fn solid(width: u32, height: u32, color: Rgb) -> Self {
        let pixels = [color.r, color.g, color.b, 0xff].repeat((width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color of the pixel at `(x, y)`, ignoring alpha.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[offset..offset + 4];
        Some(Rgb::new(p[0], p[1], p[2]))
    }

    /// Iterate over rows of RGBA bytes, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact((self.width * 4) as usize)
    }
}

/// Everything pushed to a key in one render.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub level: StatusLevel,
    pub image: Bitmap,
    pub title: String,
}

impl Tile {
    pub fn render(level: StatusLevel, value: f64) -> Self {
        Self {
            level,
            image: Bitmap::solid(TILE_SIZE, TILE_SIZE, level.color()),
            title: format_title(value),
        }
    }
}

/// Title text for a value: one decimal place.
pub fn format_title(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_tile_is_red() {
        let tile = Tile::render(StatusLevel::Critical, 99.0);
        assert_eq!(tile.image.width(), TILE_SIZE);
        assert_eq!(tile.image.height(), TILE_SIZE);
        assert_eq!(tile.image.pixel(0, 0).unwrap().to_string(), "#E55A4E");
        assert_eq!(tile.image.pixel(71, 71).unwrap().to_string(), "#E55A4E");
        assert!(tile.image.pixel(72, 0).is_none());
    }

    #[test]
    fn tile_colors_follow_level() {
        let normal = Tile::render(StatusLevel::Normal, 0.0);
        let warning = Tile::render(StatusLevel::Warning, 0.0);
        assert_eq!(normal.image.pixel(10, 10), Some(Rgb::new(0x6a, 0xb7, 0x4b)));
        assert_eq!(warning.image.pixel(10, 10), Some(Rgb::new(0xf4, 0x81, 0x18)));
    }

    #[test]
    fn bitmap_is_opaque_rgba() {
        let bitmap = Bitmap::solid(2, 3, Rgb::new(1, 2, 3));
        assert_eq!(bitmap.pixels().len(), 2 * 3 * 4);
        assert_eq!(&bitmap.pixels()[..4], &[1, 2, 3, 0xff]);
        assert_eq!(bitmap.rows().count(), 3);
    }

    #[test]
    fn title_has_one_decimal() {
        assert_eq!(format_title(12.345), "12.3");
        assert_eq!(format_title(0.0), "0.0");
        assert_eq!(format_title(-3.96), "-4.0");
        assert_eq!(format_title(1500.0), "1500.0");
    }
}

// Core value types shared by the trigger, lifecycle and drawing code.

use image::RgbaImage;
use std::sync::Arc;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the window is (pixels)
    pub height: usize,     // how tall the window is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        for p in &mut self.pixels { *p = color; }
    }
}

/// A position in surface coordinates. Recreated on every input event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }

    /// Straight-line distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width/height of the presentation surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// A decoded stamp image. Cheap to clone: every stamp shares the pixels.
#[derive(Clone, Debug)]
pub struct ImageResource {
    name: String,
    pixels: Arc<RgbaImage>,
}

impl ImageResource {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self { name: name.into(), pixels: Arc::new(pixels) }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn pixels(&self) -> &RgbaImage { &self.pixels }
    pub fn width(&self) -> u32 { self.pixels.width() }
    pub fn height(&self) -> u32 { self.pixels.height() }
}

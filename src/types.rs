// Core types shared by the compositor, the presenter and the viewer.

/// Screen-space position in pixels (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Same point moved `dy` pixels up the screen.
    #[inline]
    pub fn raised(self, dy: f32) -> Self {
        Self { x: self.x, y: self.y - dy }
    }
}

/// Opaque scene image the overlay is laid over.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Fill with a two-tone checkerboard of `cell` pixel squares.
    /// Visual: a floor to see the darkness and torchlight against.
    pub fn fill_checker(&mut self, cell: usize, a: u32, b: u32) {
        let cell = cell.max(1);
        for y in 0..self.height {
            for x in 0..self.width {
                let dark = ((x / cell) + (y / cell)) % 2 == 0;
                self.pixels[y * self.width + x] = if dark { a } else { b };
            }
        }
    }
}

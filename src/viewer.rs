// Window + input for the demo map.
// Visual: a window showing the scene with the lighting overlay on top.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::Error;
use crate::types::FrameBuffer;

pub struct Viewer {
    window: Window, // the on-screen window you see
}

impl Viewer {
    /// Create a window sized to the viewport, capped at ~60 fps.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// False once the user closes the window or presses ESC.
    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Current window size; the overlay follows it.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Held arrow keys as a (dx, dy) direction.
    pub fn arrows(&self) -> (f32, f32) {
        let axis = |neg: Key, pos: Key| {
            (self.window.is_key_down(pos) as i32 - self.window.is_key_down(neg) as i32) as f32
        };
        (axis(Key::Left, Key::Right), axis(Key::Up, Key::Down))
    }

    /// L toggles the lantern switch.
    pub fn l_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::L, KeyRepeat::No)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

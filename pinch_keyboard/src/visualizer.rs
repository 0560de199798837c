//! The `minifb` window: shows the annotated frame and reports pointer and
//! quit input back to the frame loop.

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use pinch_core::Point;

use crate::canvas::Canvas;
use crate::detector::PointerInput;
use crate::frame::Frame;
use crate::overlay::{self, OverlayView};

/// Input gathered from the window on one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowInput {
    pub pointer: PointerInput,
    pub quit:    bool,
}

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
}

impl Visualizer {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let (w, h) = (width as usize, height as usize);
        let mut window = Window::new(
            title,
            w, h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("could not open window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer { window, canvas: Canvas::new(w, h) })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn poll_input(&mut self) -> WindowInput {
        let quit = !self.window.is_open()
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No);

        let position = self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x, y));
        let pinch = self.window.get_mouse_down(MouseButton::Left)
            || self.window.is_key_down(Key::Space);

        WindowInput { pointer: PointerInput { position, pinch }, quit }
    }

    /// Draw the frame, the overlay on top, and present.
    pub fn render(&mut self, frame: &Frame, view: &OverlayView<'_>) -> Result<()> {
        self.canvas.blit(frame);
        overlay::draw(&mut self.canvas, view);
        self.window
            .update_with_buffer(self.canvas.buffer(), self.canvas.width(), self.canvas.height())
            .map_err(|e| anyhow!("window update failed: {}", e))
    }
}

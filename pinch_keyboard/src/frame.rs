//! Video frames and the sources that produce them.
//!
//! A [`Frame`] is a packed ARGB (`0xAARRGGBB`) pixel buffer, the layout
//! `minifb` draws directly.  Real capture lives in [`crate::camera`] behind
//! the `camera` feature; simulation mode uses a [`Backdrop`].

use anyhow::Result;

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width:  u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Frame { width, height, pixels: vec![color; (width * height) as usize] }
    }

    /// Build from tightly packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Self {
        let pixels = rgb.chunks_exact(3)
            .map(|p| 0xFF00_0000 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
            .collect();
        Frame { width, height, pixels }
    }

    /// Tightly packed RGB bytes, row-major — what detector processes expect.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
        out
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Flip horizontally in place.
    pub fn mirror(&mut self) {
        let w = self.width as usize;
        if w == 0 { return; }
        for row in self.pixels.chunks_exact_mut(w) {
            row.reverse();
        }
    }

    /// Nearest-neighbour resample to `width` × `height`.  Returns `self`
    /// untouched when the size already matches.
    pub fn fit(self, width: u32, height: u32) -> Frame {
        if self.width == width && self.height == height {
            return self;
        }
        if self.width == 0 || self.height == 0 {
            return Frame::filled(width, height, 0xFF00_0000);
        }
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                pixels.push(self.pixels[(sy * self.width + sx) as usize]);
            }
        }
        Frame { width, height, pixels }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource — camera or stand-in
// ════════════════════════════════════════════════════════════════════════════

pub trait FrameSource {
    /// Block until the next frame is available.
    fn read(&mut self) -> Result<Frame>;
}

/// Plain backdrop with a faint grid, used when there is no camera.
pub struct Backdrop {
    frame: Frame,
}

const BACKDROP_COLOR: u32 = 0xFF1A1A2E;
const GRID_COLOR:     u32 = 0xFF22223A;
const GRID_STEP:      u32 = 40;

impl Backdrop {
    pub fn new(width: u32, height: u32) -> Self {
        let mut frame = Frame::filled(width, height, BACKDROP_COLOR);
        for y in 0..height {
            for x in 0..width {
                if x % GRID_STEP == 0 || y % GRID_STEP == 0 {
                    frame.pixels[(y * width + x) as usize] = GRID_COLOR;
                }
            }
        }
        Backdrop { frame }
    }
}

impl FrameSource for Backdrop {
    fn read(&mut self) -> Result<Frame> { Ok(self.frame.clone()) }
}

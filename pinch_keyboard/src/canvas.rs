//! Software drawing surface: a packed ARGB buffer plus the handful of
//! primitives the overlay needs (rectangles, lines, circles, bitmap text).
//!
//! Coordinates are signed so shapes can hang off the edge of the frame;
//! everything is clipped per pixel.

use crate::frame::Frame;

pub struct Canvas {
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, buf: vec![0xFF00_0000; width * height] }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn buffer(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.buf[y * self.width + x])
        } else {
            None
        }
    }

    /// Copy a frame of matching size in as the background.
    pub fn blit(&mut self, frame: &Frame) {
        if frame.pixels.len() == self.buf.len() {
            self.buf.copy_from_slice(&frame.pixels);
        } else {
            tracing::warn!(
                frame_w = frame.width, frame_h = frame.height,
                canvas_w = self.width, canvas_h = self.height,
                "frame size mismatch, background skipped"
            );
            self.buf.fill(0xFF00_0000);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let i = y as usize * self.width + x as usize;
            self.buf[i] = blend(self.buf[i], color, alpha);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        for row in y..y + h {
            for col in x..x + w {
                self.set_pixel(col, row, color);
            }
        }
    }

    /// Fill with `color` at opacity `alpha` over what is already there.
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, alpha: f32) {
        for row in y..y + h {
            for col in x..x + w {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    /// Outline `thickness` pixels wide, drawn inside the rectangle.
    pub fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
        let t = thickness.min(w).min(h).max(1);
        self.fill_rect(x,         y,         w, t, color);
        self.fill_rect(x,         y + h - t, w, t, color);
        self.fill_rect(x,         y,         t, h, color);
        self.fill_rect(x + w - t, y,         t, h, color);
    }

    /// Bresenham line, `thickness` pixels wide.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32, color: u32) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        let r = (thickness - 1) / 2;
        loop {
            self.fill_rect(x - r, y - r, r * 2 + 1, r * 2 + 1, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Circle outline of radius `r`, `thickness` pixels wide (inward).
    pub fn draw_ring(&mut self, cx: i32, cy: i32, r: i32, thickness: i32, color: u32) {
        let inner = (r - thickness).max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r && d2 > inner * inner {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    // ── Text ──────────────────────────────────────────────────────────────

    /// Render `text` with the 3×5 bitmap font, each font pixel `scale`
    /// screen pixels square.  `(x, y)` is the top-left corner.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3 {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row as i32 * scale, scale, scale, color);
                    }
                }
            }
            cx += GLYPH_ADVANCE * scale;
            if cx >= self.width as i32 { break; }
        }
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * GLYPH_ADVANCE - 1) * scale }
}

/// Height in pixels of one line of text at `scale`.
pub fn text_height(scale: i32) -> i32 { 5 * scale }

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_ADVANCE: i32 = 4; // 3 wide + 1 gap

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints_and_middle() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFF646464, 0.5), 0xFF323232);
    }

    #[test]
    fn drawing_clips_at_edges() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(-5, -5, 8, 8, 0xFFFFFFFF);
        c.fill_circle(9, 9, 4, 0xFF00FF00);
        c.draw_line(-20, 5, 30, 5, 3, 0xFFFF0000);
        assert_eq!(c.pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(9, 9), Some(0xFF00FF00));
        assert_eq!(c.pixel(9, 5), Some(0xFFFF0000));
        assert_eq!(c.pixel(10, 0), None);
        assert_eq!(c.pixel(0, 10), None);
    }

    #[test]
    fn border_leaves_inside_untouched() {
        let mut c = Canvas::new(10, 10);
        c.draw_border(0, 0, 10, 10, 2, 0xFFFFFFFF);
        assert_eq!(c.pixel(1, 5), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(5, 5), Some(0xFF000000));
    }

    #[test]
    fn ring_is_hollow() {
        let mut c = Canvas::new(30, 30);
        c.draw_ring(15, 15, 10, 2, 0xFFFFFFFF);
        assert_eq!(c.pixel(15, 15), Some(0xFF000000));
        assert_eq!(c.pixel(25, 15), Some(0xFFFFFFFF));
    }

    #[test]
    fn text_lands_where_measured() {
        let mut c = Canvas::new(40, 12);
        c.draw_text("HI", 0, 0, 2, 0xFFFFFFFF);
        assert_eq!(text_width("HI", 2), 14);
        // top-left of 'H' is lit, gap column between glyphs is not
        assert_eq!(c.pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(6, 0), Some(0xFF000000));
        assert_eq!(text_width("", 3), 0);
    }

    #[test]
    fn every_letter_has_a_glyph() {
        let fallback = char_glyph('\u{1}');
        for c in 'A'..='Z' {
            assert_ne!(char_glyph(c), fallback, "{} missing", c);
        }
    }
}

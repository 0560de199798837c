//! What gets drawn over each frame.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TYPED TEXT:                                                 │
//! │  HELLO WORLD_                                       (panel)  │
//! │  key: O   chars: 11                                          │
//! │  instructions                                                │
//! │                                                              │
//! │           ● thumb ───── distance ───── ● index               │
//! │                                                              │
//! │   [Q][W][E][R][T][Y][U][I][O][P]                             │
//! │   [A][S][D][F][G][H][J][K][L]                                │
//! │   [Z][X][C][V][B][N][M]                                      │
//! │   [SPACE]                                                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use pinch_core::{FrameReport, Hand, HandLandmark, Keyboard, Point, TypedText};

use crate::canvas::{text_height, text_width, Canvas};

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

pub const KEY_COLOR:        u32 = 0xFF323232;
pub const KEY_BORDER_COLOR: u32 = 0xFFFFFFFF;
pub const KEY_TEXT_COLOR:   u32 = 0xFFFFFFFF;
pub const ACTIVE_KEY_COLOR: u32 = 0xFF00FF00;
pub const KEY_ALPHA:        f32 = 0.3;

const PANEL_ALPHA:     f32 = 0.8;
const TIP_FILL:        u32 = 0xFFFFFF00;  // yellow
const TIP_RING:        u32 = 0xFF0000FF;  // blue
const PALM_COLOR:      u32 = 0xFF00FFFF;  // cyan
const DISTANCE_COLOR:  u32 = 0xFFFF00FF;  // magenta
const POINTER_COLOR:   u32 = 0xFFFF0000;  // red
const FIRED_COLOR:     u32 = 0xFF00FF00;
const TITLE_COLOR:     u32 = 0xFFFFFF00;
const TYPED_COLOR:     u32 = 0xFF00FF00;
const INFO_COLOR:      u32 = 0xFFC8C8C8;

const INSTRUCTIONS: [&str; 4] = [
    "TOUCH INDEX FINGER TO THUMB TO TYPE",
    "YELLOW = FINGERTIPS  CYAN = PALM",
    "MAGENTA LINE = THUMB-INDEX DISTANCE",
    "PRESS Q OR ESC TO QUIT",
];

/// Everything the overlay needs for one frame.
pub struct OverlayView<'a> {
    pub keyboard:  &'a Keyboard,
    pub hands:     &'a [Hand],
    pub report:    &'a FrameReport,
    pub text:      &'a TypedText,
    /// Show the "key fired" ring around the index tip.
    pub flash:     bool,
    /// Short mode banner, e.g. "SIMULATION".
    pub mode:      &'a str,
}

pub fn draw(canvas: &mut Canvas, view: &OverlayView<'_>) {
    if let Some(hand) = view.hands.first() {
        draw_hand(canvas, hand, view.flash);
    }
    draw_keyboard(canvas, view.keyboard, view.report.hovered);
    draw_panel(canvas, view);
}

// ── Keyboard ──────────────────────────────────────────────────────────────

/// Key backgrounds blend over the frame; borders and labels are opaque.
pub fn draw_keyboard(canvas: &mut Canvas, keyboard: &Keyboard, hovered: Option<usize>) {
    for (i, key) in keyboard.keys().iter().enumerate() {
        let r = key.rect;
        let (x, y, w, h) = (r.x as i32, r.y as i32, r.width as i32, r.height as i32);
        let fill = if hovered == Some(i) { ACTIVE_KEY_COLOR } else { KEY_COLOR };

        canvas.blend_rect(x, y, w, h, fill, KEY_ALPHA);
        canvas.draw_border(x, y, w, h, 2, KEY_BORDER_COLOR);

        // Long labels get the smaller font
        let mut scale = if key.label.chars().count() > 1 { 2 } else { 4 };
        while scale > 1 && text_width(&key.label, scale) > w - 4 { scale -= 1; }
        let tx = x + (w - text_width(&key.label, scale)) / 2;
        let ty = y + (h - text_height(scale)) / 2;
        canvas.draw_text(&key.label, tx, ty, scale, KEY_TEXT_COLOR);
    }
}

// ── Hand ──────────────────────────────────────────────────────────────────

fn ipt(p: Point) -> (i32, i32) { (p.x.round() as i32, p.y.round() as i32) }

pub fn draw_hand(canvas: &mut Canvas, hand: &Hand, flash: bool) {
    // Palm points
    for lm in HandLandmark::PALM {
        let (x, y) = ipt(hand.landmark(lm));
        canvas.fill_circle(x, y, 4, PALM_COLOR);
        canvas.draw_text(&format!("P{}:({},{})", lm.index(), x, y), x + 10, y - 14, 1, PALM_COLOR);
    }

    // Fingertips with a leader line and their coordinates
    for lm in HandLandmark::FINGERTIPS {
        let (x, y) = ipt(hand.landmark(lm));
        canvas.fill_circle(x, y, 8, TIP_FILL);
        canvas.draw_ring(x, y, 12, 2, TIP_RING);
        let (ex, ey) = (x + 30, y - 30);
        canvas.draw_line(x, y, ex, ey, 3, TIP_FILL);

        let label = format!("{}: ({},{})", lm.name(), x, y);
        let (lw, lh) = (text_width(&label, 2), text_height(2));
        canvas.fill_rect(ex + 3, ey - lh - 2, lw + 4, lh + 4, 0xFF000000);
        canvas.draw_text(&label, ex + 5, ey - lh, 2, TIP_FILL);
    }

    // Thumb ↔ index distance
    let (thumb, index) = (hand.thumb_tip(), hand.index_tip());
    let ((tx, ty), (ix, iy)) = (ipt(thumb), ipt(index));
    canvas.draw_line(tx, ty, ix, iy, 2, DISTANCE_COLOR);
    let (mx, my) = ipt(thumb.midpoint(index));
    canvas.draw_text(&format!("DISTANCE: {:.1}PX", thumb.distance(index)), mx, my, 2, DISTANCE_COLOR);

    // Pointer
    canvas.draw_ring(ix, iy, 15, 3, POINTER_COLOR);
    if flash {
        canvas.draw_ring(ix, iy, 25, 5, FIRED_COLOR);
    }
}

// ── Text panel ────────────────────────────────────────────────────────────

fn draw_panel(canvas: &mut Canvas, view: &OverlayView<'_>) {
    let w = canvas.width() as i32;
    canvas.blend_rect(30, 10, w - 60, 120, 0xFF000000, PANEL_ALPHA);

    canvas.draw_text("TYPED TEXT:", 50, 24, 3, TITLE_COLOR);
    let shown = if view.text.is_empty() { "..." } else { view.text.as_str() };
    canvas.draw_text(shown, 50, 54, 5, TYPED_COLOR);
    canvas.draw_text(view.mode, w - 50 - text_width(view.mode, 2), 24, 2, POINTER_COLOR);

    let current = view.report.hovered
        .map(|i| view.keyboard.keys()[i].label.as_str())
        .unwrap_or("-");
    canvas.draw_text(
        &format!("CURRENT KEY: {}   CHARACTERS: {}", current, view.text.char_count()),
        50, 96, 2, INFO_COLOR,
    );

    for (i, line) in INSTRUCTIONS.iter().enumerate() {
        canvas.draw_text(line, 50, 140 + i as i32 * 16, 2, 0xFFFFFFFF);
    }
}

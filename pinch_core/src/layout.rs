//! The on-screen keyboard: a fixed QWERTY grid of key rectangles, plus the
//! hit test that maps a fingertip to the key under it.

use serde::{Deserialize, Serialize};

use crate::landmark::Point;

// ════════════════════════════════════════════════════════════════════════════
// Rect
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x:      u32,
    pub y:      u32,
    pub width:  u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self)  -> u32 { self.x.saturating_add(self.width) }
    pub fn bottom(&self) -> u32 { self.y.saturating_add(self.height) }

    /// Inclusive on all four edges: a point on the border is inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x as f32 && p.x <= self.right() as f32
            && p.y >= self.y as f32 && p.y <= self.bottom() as f32
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Key
// ════════════════════════════════════════════════════════════════════════════

/// What pressing a key produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Space,
}

impl KeyAction {
    /// The character appended to the typed text.
    pub fn text(self) -> char {
        match self {
            KeyAction::Char(c) => c,
            KeyAction::Space   => ' ',
        }
    }

    pub fn label(self) -> String {
        match self {
            KeyAction::Char(c) => c.to_string(),
            KeyAction::Space   => "SPACE".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    pub label:  String,
    pub action: KeyAction,
    pub rect:   Rect,
}

// ════════════════════════════════════════════════════════════════════════════
// KeyGeometry — size and placement of the grid
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyGeometry {
    pub key_width:  u32,
    pub key_height: u32,
    /// Gap between neighbouring keys, both directions.
    pub key_margin: u32,
    /// Top-left corner of the first key.
    pub origin_x:   u32,
    pub origin_y:   u32,
}

impl Default for KeyGeometry {
    fn default() -> Self {
        KeyGeometry {
            key_width:  50,
            key_height: 50,
            key_margin: 20,
            origin_x:   150,
            origin_y:   450,
        }
    }
}

impl KeyGeometry {
    /// Rectangle of the cell at `row`, `col`.  Coordinates saturate at
    /// `u32::MAX`; [`KeyGeometry::extent`] tells whether a grid fits.
    pub fn cell(&self, row: usize, col: usize) -> Rect {
        let x = Self::offset(self.origin_x, col, self.key_width, self.key_margin);
        let y = Self::offset(self.origin_y, row, self.key_height, self.key_margin);
        Rect::new(x, y, self.key_width, self.key_height)
    }

    fn offset(origin: u32, n: usize, size: u32, margin: u32) -> u32 {
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        origin.saturating_add(n.saturating_mul(size.saturating_add(margin)))
    }

    /// Bottom-right corner of a `rows` × `cols` grid, or `None` when the
    /// grid is empty or overflows `u32`.
    pub fn extent(&self, rows: usize, cols: usize) -> Option<(u32, u32)> {
        let span = |origin: u32, n: usize, size: u32| -> Option<u32> {
            let steps = u32::try_from(n).ok()?.checked_sub(1)?;
            let pitch = size.checked_add(self.key_margin)?;
            origin.checked_add(steps.checked_mul(pitch)?)?.checked_add(size)
        };
        Some((
            span(self.origin_x, cols, self.key_width)?,
            span(self.origin_y, rows, self.key_height)?,
        ))
    }

    /// [`KeyGeometry::extent`] of the [`Keyboard::qwerty`] grid.
    pub fn qwerty_extent(&self) -> Option<(u32, u32)> {
        let cols = QWERTY_ROWS.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        self.extent(QWERTY_ROWS.len() + 1, cols)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Keyboard
// ════════════════════════════════════════════════════════════════════════════

const QWERTY_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Ordered collection of keys, built once at start-up.
#[derive(Clone, Debug)]
pub struct Keyboard {
    keys: Vec<Key>,
}

impl Keyboard {
    /// The standard grid: three letter rows and a SPACE key below them.
    pub fn qwerty(geometry: &KeyGeometry) -> Self {
        let mut rows: Vec<Vec<KeyAction>> = QWERTY_ROWS.iter()
            .map(|row| row.chars().map(KeyAction::Char).collect())
            .collect();
        rows.push(vec![KeyAction::Space]);
        Keyboard::from_rows(&rows, geometry)
    }

    pub fn from_rows(rows: &[Vec<KeyAction>], geometry: &KeyGeometry) -> Self {
        let keys = rows.iter().enumerate()
            .flat_map(|(r, row)| {
                row.iter().enumerate().map(move |(c, &action)| Key {
                    label: action.label(),
                    action,
                    rect:  geometry.cell(r, c),
                })
            })
            .collect();
        Keyboard { keys }
    }

    pub fn keys(&self) -> &[Key] { &self.keys }
    pub fn len(&self) -> usize { self.keys.len() }
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    /// Index of the first key (layout order) containing `p`.
    pub fn hit_index(&self, p: Point) -> Option<usize> {
        self.keys.iter().position(|k| k.rect.contains(p))
    }

    pub fn hit_test(&self, p: Point) -> Option<&Key> {
        self.hit_index(p).map(|i| &self.keys[i])
    }

    pub fn find(&self, label: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.label == label)
    }
}

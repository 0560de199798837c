//! Pinch detection — thumb tip touching index tip.
//!
//! The detector is fed one pair of fingertip positions per frame and keeps
//! the "currently touching" flag between frames so it can report edges.

use crate::landmark::Point;

/// Default pinch distance in frame pixels.
pub const DEFAULT_TOUCH_THRESHOLD: f32 = 30.0;

// ════════════════════════════════════════════════════════════════════════════
// TouchEdge / TouchReading
// ════════════════════════════════════════════════════════════════════════════

/// How the touch flag changed on this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEdge {
    /// Not touching before, touching now.
    Began,
    /// Touching on both frames.
    Held,
    /// Touching before, not touching now.
    Ended,
    /// Not touching on both frames.
    Idle,
}

impl TouchEdge {
    fn between(was: bool, now: bool) -> Self {
        match (was, now) {
            (false, true)  => TouchEdge::Began,
            (true,  true)  => TouchEdge::Held,
            (true,  false) => TouchEdge::Ended,
            (false, false) => TouchEdge::Idle,
        }
    }
}

/// Result of classifying one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchReading {
    /// Thumb-to-index distance; `None` when no hand was seen.
    pub distance: Option<f32>,
    pub touching: bool,
    pub edge:     TouchEdge,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureDetector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GestureDetector {
    touch_threshold: f32,
    touching:        bool,
}

impl Default for GestureDetector {
    fn default() -> Self { GestureDetector::new(DEFAULT_TOUCH_THRESHOLD) }
}

impl GestureDetector {
    pub fn new(touch_threshold: f32) -> Self {
        GestureDetector { touch_threshold, touching: false }
    }

    pub fn touch_threshold(&self) -> f32 { self.touch_threshold }
    pub fn is_touching(&self) -> bool { self.touching }

    /// Strictly below the threshold counts as a touch.
    pub fn is_touch_distance(&self, distance: f32) -> bool {
        distance < self.touch_threshold
    }

    /// Classify one frame.  A missing tip (no hand) resets to not touching.
    pub fn update(&mut self, thumb_tip: Option<Point>, index_tip: Option<Point>) -> TouchReading {
        let distance = match (thumb_tip, index_tip) {
            (Some(t), Some(i)) => Some(t.distance(i)),
            _                  => None,
        };
        let now = distance.map_or(false, |d| self.is_touch_distance(d));
        let edge = TouchEdge::between(self.touching, now);
        self.touching = now;

        if edge == TouchEdge::Began {
            tracing::debug!(distance = ?distance, "pinch began");
        }
        TouchReading { distance, touching: now, edge }
    }

    /// Forget any touch in progress.
    pub fn reset(&mut self) { self.touching = false; }
}

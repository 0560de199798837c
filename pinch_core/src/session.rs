//! Per-run typing session.
//!
//! `Session` bundles everything that persists across frames — the touch
//! flag, the last press time and the typed text — and is handed to the
//! frame loop by `&mut`.  Nothing here knows about cameras or windows, so
//! whole typing runs can be replayed from synthetic hands.

use std::time::Instant;

use crate::config::Config;
use crate::controller::{KeyPress, KeyPressController, PressState};
use crate::gesture::{GestureDetector, TouchReading};
use crate::inject::{KeyInjector, NullInjector};
use crate::landmark::{Hand, Point};
use crate::layout::{Key, Keyboard};
use crate::text::TypedText;

/// What happened on one frame, for the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub reading: TouchReading,
    /// Index tip of the tracked hand.
    pub pointer: Option<Point>,
    /// Index into [`Keyboard::keys`] of the key under the pointer.
    pub hovered: Option<usize>,
    pub pressed: Option<KeyPress>,
}

pub struct Session {
    detector:   GestureDetector,
    keyboard:   Keyboard,
    controller: KeyPressController,
    injector:   Box<dyn KeyInjector>,
    frames:     u64,
}

impl Session {
    pub fn new(
        detector:   GestureDetector,
        keyboard:   Keyboard,
        controller: KeyPressController,
        injector:   Box<dyn KeyInjector>,
    ) -> Self {
        Session { detector, keyboard, controller, injector, frames: 0 }
    }

    /// QWERTY session with thresholds from `cfg`.  `cfg` is assumed valid.
    pub fn from_config(cfg: &Config, injector: Box<dyn KeyInjector>) -> Self {
        Session::new(
            GestureDetector::new(cfg.gesture.touch_threshold),
            Keyboard::qwerty(&cfg.layout),
            KeyPressController::new(cfg.gesture.key_press_delay()),
            injector,
        )
    }

    /// Process the hands detected in one frame.  Only the first hand types.
    pub fn process_frame(&mut self, hands: &[Hand], now: Instant) -> FrameReport {
        self.frames += 1;
        let hand = hands.first();
        if hands.len() > 1 {
            tracing::trace!(count = hands.len(), "extra hands ignored");
        }

        let reading = self.detector.update(
            hand.map(Hand::thumb_tip),
            hand.map(Hand::index_tip),
        );
        let pointer = hand.map(Hand::index_tip);
        let hovered = pointer.and_then(|p| self.keyboard.hit_index(p));
        let hovered_key: Option<&Key> = hovered.map(|i| &self.keyboard.keys()[i]);

        let pressed = self.controller.step(&reading, hovered_key, now, self.injector.as_mut());

        FrameReport { reading, pointer, hovered, pressed }
    }

    pub fn keyboard(&self)    -> &Keyboard    { &self.keyboard }
    pub fn text(&self)        -> &TypedText   { self.controller.text() }
    pub fn press_state(&self) -> PressState   { self.controller.state() }
    pub fn is_touching(&self) -> bool         { self.detector.is_touching() }
    pub fn frames(&self)      -> u64          { self.frames }
    pub fn touch_threshold(&self) -> f32      { self.detector.touch_threshold() }
}

impl Default for Session {
    fn default() -> Self {
        Session::from_config(&Config::default(), Box::new(NullInjector))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::landmark::LANDMARK_COUNT;

    /// A hand with only the two tips that matter placed.
    fn hand(thumb: Point, index: Point) -> Hand {
        let mut pts = [Point::default(); LANDMARK_COUNT];
        pts[4] = thumb;
        pts[8] = index;
        Hand::new(pts)
    }

    /// Index tip at `at`, thumb `gap` pixels to its left.
    fn hand_at(at: Point, gap: f32) -> Hand {
        hand(Point::new(at.x - gap, at.y), at)
    }

    fn centre_of(session: &Session, label: &str) -> Point {
        session.keyboard().find(label).unwrap().rect.center()
    }

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn pinch_over_a_types_a() {
        let mut s = Session::default();
        let a = s.keyboard().find("A").unwrap().rect;
        // index inside A, thumb ~11px away
        let index = Point::new(a.x as f32 + 20.0, a.y as f32 + 15.0);
        let thumb = Point::new(index.x - 10.0, index.y - 5.0);
        let t0 = Instant::now();

        let r = s.process_frame(&[hand(thumb, index)], t0);
        assert!(r.reading.touching);
        assert_eq!(r.pressed.as_ref().map(|p| p.label.as_str()), Some("A"));
        assert_eq!(s.text().as_str(), "A");
    }

    #[test]
    fn hover_without_pinch_highlights_only() {
        let mut s = Session::default();
        let g = centre_of(&s, "G");
        let r = s.process_frame(&[hand_at(g, 80.0)], Instant::now());
        assert!(!r.reading.touching);
        assert_eq!(r.hovered.map(|i| s.keyboard().keys()[i].label.clone()), Some("G".into()));
        assert!(r.pressed.is_none());
        assert!(s.text().is_empty());
    }

    #[test]
    fn long_pinch_types_once() {
        let mut s = Session::default();
        let k = centre_of(&s, "K");
        let t0 = Instant::now();
        for i in 0..30 {
            s.process_frame(&[hand_at(k, 4.0)], t0 + ms(i * 16));
        }
        assert_eq!(s.text().as_str(), "K");
        assert_eq!(s.press_state(), PressState::Pressed);
    }

    #[test]
    fn quick_double_pinch_types_once() {
        let mut s = Session::default();
        let e = centre_of(&s, "E");
        let t0 = Instant::now();
        s.process_frame(&[hand_at(e, 4.0)],  t0);
        s.process_frame(&[hand_at(e, 60.0)], t0 + ms(100));
        s.process_frame(&[hand_at(e, 4.0)],  t0 + ms(200));
        assert_eq!(s.text().as_str(), "E");
    }

    #[test]
    fn spaced_pinches_type_in_order() {
        let mut s = Session::default();
        let t0 = Instant::now();
        let word = ["H", "I", "SPACE", "O"];
        for (n, label) in word.iter().enumerate() {
            let at = centre_of(&s, label);
            let base = t0 + ms(n as u64 * 800);
            s.process_frame(&[hand_at(at, 60.0)], base);
            s.process_frame(&[hand_at(at, 4.0)],  base + ms(100));
            s.process_frame(&[hand_at(at, 4.0)],  base + ms(150));
            s.process_frame(&[hand_at(at, 60.0)], base + ms(300));
        }
        assert_eq!(s.text().as_str(), "HI O");
        assert_eq!(s.text().char_count(), 4);
    }

    #[test]
    fn ten_empty_frames_change_nothing() {
        let mut s = Session::default();
        let t0 = Instant::now();
        for i in 0..10 {
            let r = s.process_frame(&[], t0 + ms(i * 33));
            assert!(!r.reading.touching);
            assert!(r.pointer.is_none());
            assert!(r.hovered.is_none());
        }
        assert!(!s.is_touching());
        assert!(s.text().is_empty());
        assert_eq!(s.frames(), 10);
    }

    #[test]
    fn losing_the_hand_ends_the_pinch() {
        let mut s = Session::default();
        let q = centre_of(&s, "Q");
        let t0 = Instant::now();
        s.process_frame(&[hand_at(q, 4.0)], t0);
        s.process_frame(&[], t0 + ms(300));
        assert_eq!(s.press_state(), PressState::Idle);
        s.process_frame(&[hand_at(q, 4.0)], t0 + ms(900));
        assert_eq!(s.text().as_str(), "QQ");
    }

    #[test]
    fn pinch_outside_keys_types_nothing() {
        let mut s = Session::default();
        let r = s.process_frame(&[hand_at(Point::new(20.0, 20.0), 3.0)], Instant::now());
        assert!(r.reading.touching);
        assert!(r.hovered.is_none());
        assert!(s.text().is_empty());
    }

    #[test]
    fn only_first_hand_types() {
        let mut s = Session::default();
        let w = centre_of(&s, "W");
        let m = centre_of(&s, "M");
        s.process_frame(&[hand_at(w, 80.0), hand_at(m, 2.0)], Instant::now());
        assert!(s.text().is_empty());
    }
}

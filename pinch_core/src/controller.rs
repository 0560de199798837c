//! Key-press state machine.
//!
//! ```text
//!            touching, key hovered, delay elapsed → fire
//!   ┌──────┐ ─────────────────────────────────────────► ┌─────────┐
//!   │ IDLE │   touching otherwise → no fire               │ PRESSED │
//!   └──────┘ ◄───────────────────────────────────────── └─────────┘
//!                         not touching
//! ```
//!
//! A key fires only on the IDLE → PRESSED transition, so a pinch held over
//! many frames types once.  A second guard rejects presses that come sooner
//! than `key_press_delay` after the previous one.

use std::time::{Duration, Instant};

use crate::gesture::TouchReading;
use crate::inject::KeyInjector;
use crate::layout::{Key, KeyAction};
use crate::text::TypedText;

/// Default minimum gap between two fired presses.
pub const DEFAULT_KEY_PRESS_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressState { Idle, Pressed }

/// A key activation emitted by the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyPress {
    pub label:  String,
    pub action: KeyAction,
    pub at:     Instant,
}

#[derive(Debug)]
pub struct KeyPressController {
    state:           PressState,
    key_press_delay: Duration,
    last_press:      Option<Instant>,
    text:            TypedText,
}

impl Default for KeyPressController {
    fn default() -> Self { KeyPressController::new(DEFAULT_KEY_PRESS_DELAY) }
}

impl KeyPressController {
    pub fn new(key_press_delay: Duration) -> Self {
        KeyPressController {
            state: PressState::Idle,
            key_press_delay,
            last_press: None,
            text: TypedText::new(),
        }
    }

    pub fn state(&self)           -> PressState      { self.state }
    pub fn text(&self)            -> &TypedText      { &self.text }
    pub fn last_press(&self)      -> Option<Instant> { self.last_press }
    pub fn key_press_delay(&self) -> Duration        { self.key_press_delay }

    /// True when enough time has passed since the last fired press.
    pub fn delay_elapsed(&self, now: Instant) -> bool {
        self.last_press
            .map_or(true, |t| now.saturating_duration_since(t) >= self.key_press_delay)
    }

    /// Advance one frame.  Returns the press fired on this frame, if any.
    pub fn step(
        &mut self,
        reading:  &TouchReading,
        hovered:  Option<&Key>,
        now:      Instant,
        injector: &mut dyn KeyInjector,
    ) -> Option<KeyPress> {
        match (self.state, reading.touching) {
            (PressState::Idle, true) => {
                self.state = PressState::Pressed;
                let key = hovered?;
                if !self.delay_elapsed(now) {
                    tracing::debug!(key = %key.label, "press suppressed, inside key_press_delay");
                    return None;
                }
                Some(self.fire(key, now, injector))
            }
            (PressState::Pressed, false) => {
                self.state = PressState::Idle;
                None
            }
            _ => None,
        }
    }

    fn fire(&mut self, key: &Key, now: Instant, injector: &mut dyn KeyInjector) -> KeyPress {
        self.text.push(key.action.text());
        self.last_press = Some(now);
        if let Err(e) = injector.press(key.action) {
            tracing::warn!(key = %key.label, error = %e, "key injection failed");
        }
        tracing::info!(key = %key.label, text = %self.text, "typed");
        KeyPress { label: key.label.clone(), action: key.action, at: now }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::gesture::TouchEdge;
    use crate::inject::NullInjector;
    use crate::layout::Rect;

    fn key(c: char) -> Key {
        Key { label: c.to_string(), action: KeyAction::Char(c), rect: Rect::new(0, 0, 50, 50) }
    }

    fn touch(on: bool) -> TouchReading {
        TouchReading {
            distance: Some(if on { 5.0 } else { 80.0 }),
            touching: on,
            edge:     if on { TouchEdge::Held } else { TouchEdge::Idle },
        }
    }

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn held_pinch_fires_once() {
        let mut c = KeyPressController::default();
        let k = key('A');
        let t0 = Instant::now();
        let fired = (0..20)
            .filter_map(|i| c.step(&touch(true), Some(&k), t0 + ms(i * 33), &mut NullInjector))
            .count();
        assert_eq!(fired, 1);
        assert_eq!(c.text().as_str(), "A");
        assert_eq!(c.state(), PressState::Pressed);
    }

    #[test]
    fn release_returns_to_idle() {
        let mut c = KeyPressController::default();
        let k = key('A');
        let t0 = Instant::now();
        c.step(&touch(true), Some(&k), t0, &mut NullInjector);
        assert!(c.step(&touch(false), Some(&k), t0 + ms(10), &mut NullInjector).is_none());
        assert_eq!(c.state(), PressState::Idle);
    }

    #[test]
    fn second_pinch_inside_delay_is_suppressed() {
        let mut c = KeyPressController::new(ms(500));
        let k = key('A');
        let t0 = Instant::now();
        assert!(c.step(&touch(true),  Some(&k), t0,           &mut NullInjector).is_some());
        c.step(&touch(false), Some(&k), t0 + ms(100), &mut NullInjector);
        assert!(c.step(&touch(true),  Some(&k), t0 + ms(200), &mut NullInjector).is_none());
        assert_eq!(c.text().as_str(), "A");
    }

    #[test]
    fn pinches_beyond_delay_both_fire_in_order() {
        let mut c = KeyPressController::new(ms(500));
        let (a, b) = (key('A'), key('B'));
        let t0 = Instant::now();
        c.step(&touch(true),  Some(&a), t0,           &mut NullInjector);
        c.step(&touch(false), Some(&a), t0 + ms(100), &mut NullInjector);
        c.step(&touch(true),  Some(&b), t0 + ms(700), &mut NullInjector);
        assert_eq!(c.text().as_str(), "AB");
    }

    #[test]
    fn exactly_the_delay_is_allowed() {
        let mut c = KeyPressController::new(ms(500));
        let k = key('A');
        let t0 = Instant::now();
        c.step(&touch(true),  Some(&k), t0,           &mut NullInjector);
        c.step(&touch(false), Some(&k), t0 + ms(250), &mut NullInjector);
        assert!(c.step(&touch(true), Some(&k), t0 + ms(500), &mut NullInjector).is_some());
    }

    #[test]
    fn pinch_with_no_key_does_not_fire_and_sliding_on_does_not_either() {
        let mut c = KeyPressController::default();
        let k = key('A');
        let t0 = Instant::now();
        assert!(c.step(&touch(true), None, t0, &mut NullInjector).is_none());
        assert_eq!(c.state(), PressState::Pressed);
        assert!(c.step(&touch(true), Some(&k), t0 + ms(900), &mut NullInjector).is_none());
        assert!(c.text().is_empty());
    }

    #[test]
    fn zero_delay_leaves_only_edge_detection() {
        let mut c = KeyPressController::new(Duration::ZERO);
        let k = key('Z');
        let t0 = Instant::now();
        for i in 0..3 {
            c.step(&touch(true),  Some(&k), t0 + ms(i * 2),     &mut NullInjector);
            c.step(&touch(false), Some(&k), t0 + ms(i * 2 + 1), &mut NullInjector);
        }
        assert_eq!(c.text().as_str(), "ZZZ");
    }

    struct FailingInjector { calls: usize }

    impl KeyInjector for FailingInjector {
        fn press(&mut self, _action: KeyAction) -> Result<()> {
            self.calls += 1;
            Err(Error::Injection("denied".into()))
        }
    }

    #[test]
    fn injection_failure_keeps_text() {
        let mut c = KeyPressController::default();
        let mut inj = FailingInjector { calls: 0 };
        let k = key('Q');
        assert!(c.step(&touch(true), Some(&k), Instant::now(), &mut inj).is_some());
        assert_eq!(inj.calls, 1);
        assert_eq!(c.text().as_str(), "Q");
    }
}

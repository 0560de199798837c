//! OS-level key injection seam.
//!
//! The controller forwards every fired key to a [`KeyInjector`].  Injection is
//! a best-effort side effect: failures are logged by the caller and never
//! touch the typed text.

use crate::error::Result;
use crate::layout::KeyAction;

pub trait KeyInjector {
    /// Synthesize one keystroke for `action` in whatever window has focus.
    fn press(&mut self, action: KeyAction) -> Result<()>;
}

/// Used when injection is disabled or unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullInjector;

impl KeyInjector for NullInjector {
    fn press(&mut self, _action: KeyAction) -> Result<()> { Ok(()) }
}

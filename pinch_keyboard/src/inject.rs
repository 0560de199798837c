//! Real keystrokes via `enigo`.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use pinch_core::{Error, KeyAction, KeyInjector, NullInjector};

// ── enigo backend ─────────────────────────────────────────────────────────

pub struct EnigoInjector {
    enigo: Enigo,
}

impl EnigoInjector {
    pub fn new() -> pinch_core::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| Error::Injection(format!("cannot connect to input system: {:?}", e)))?;
        Ok(EnigoInjector { enigo })
    }
}

/// Letters go out lower-case, like a plain keypress without Shift.
fn enigo_key(action: KeyAction) -> Key {
    match action {
        KeyAction::Char(c) => Key::Unicode(c.to_ascii_lowercase()),
        KeyAction::Space   => Key::Space,
    }
}

impl KeyInjector for EnigoInjector {
    fn press(&mut self, action: KeyAction) -> pinch_core::Result<()> {
        self.enigo.key(enigo_key(action), Direction::Click)
            .map_err(|e| Error::Injection(format!("{:?}", e)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_injector — enigo when enabled, else null
// ════════════════════════════════════════════════════════════════════════════

/// Falls back to [`NullInjector`] with a warning when the host refuses
/// synthetic input.
pub fn open_injector(enabled: bool) -> Box<dyn KeyInjector> {
    if !enabled {
        return Box::new(NullInjector);
    }
    match EnigoInjector::new() {
        Ok(inj) => {
            tracing::info!("key injection enabled — typed keys go to the focused window");
            Box::new(inj)
        }
        Err(e) => {
            tracing::warn!(error = %e, "key injection unavailable, typing into the overlay only");
            Box::new(NullInjector)
        }
    }
}

/// Input state tracker.
///
/// Drains all pending terminal events once per frame. Facing changes are
/// edge-triggered: a key press this frame steers the player, and the
/// simulation keeps that facing until the next press. Key repeats count
/// as presses too; re-asserting the same facing is harmless.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, poll};

pub struct InputState {
    /// Key codes pressed (or repeated) during the most recent
    /// drain_events() call.
    presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame, before the
    /// simulation tick.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key.code);
                }
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

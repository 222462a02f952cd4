/// Keyboard input adapter.
///
/// Snake steering is a discrete event, not a held state, so the
/// adapter only tracks fresh presses: drain all pending terminal
/// events once per frame and keep the press order. The frame loop
/// replays direction presses in order so the last valid one wins at
/// the next tick.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, poll};

pub struct InputState {
    /// Key presses collected during the most recent drain, in arrival
    /// order. Release and repeat events are dropped.
    presses: Vec<KeyCode>,
    ctrl_c: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            ctrl_c: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                {
                    self.ctrl_c = true;
                    continue;
                }
                self.presses.push(key.code);
            }
        }
    }

    /// Presses from this frame, oldest first.
    pub fn presses(&self) -> &[KeyCode] {
        &self.presses
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }
}

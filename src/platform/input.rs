//! Keyboard input
//!
//! A dedicated thread blocks on `event::read()` and forwards events over a
//! channel so the frame loop never waits on I/O. Steering keys are tracked by
//! the frame they were last seen: terminals without key-release reporting
//! only send repeated presses, so a key counts as held while its last press
//! or repeat is at most `HOLD_WINDOW` frames old.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::{Key, SessionInput};

/// Frames a steering key stays live after its last press or repeat
pub const HOLD_WINDOW: u64 = 8;

/// Collects terminal events into per-frame `SessionInput`
pub struct InputPump {
    rx: mpsc::Receiver<Event>,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl InputPump {
    /// Start the reader thread
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            loop {
                match event::read() {
                    Ok(ev) => {
                        // Receiver gone means the game is exiting
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::error!("Terminal event read failed: {}", e);
                        break;
                    }
                }
            }
        });
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: mpsc::Receiver<Event>) -> Self {
        Self {
            rx,
            key_frame: HashMap::new(),
            frame: 0,
        }
    }

    /// Drain pending events and report this frame's input
    pub fn poll(&mut self) -> SessionInput {
        self.frame += 1;
        let mut input = SessionInput::default();

        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    self.key_frame.insert(code, self.frame);
                    if let Some(key) = translate(code, modifiers) {
                        input.keys.push(key);
                    }
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }

        input.left = self.is_held(&[KeyCode::Left]);
        input.right = self.is_held(&[KeyCode::Right]);
        input
    }

    fn is_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| {
            self.key_frame
                .get(code)
                .is_some_and(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
        })
    }
}

/// Map a terminal key to a session key
fn translate(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    match code {
        KeyCode::Char('c') | KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Key::Quit)
        }
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

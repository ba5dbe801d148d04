use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::FrameStatus;
use crate::error::SurfaceError;
use crate::term::Console;

/// Receives a canonical key token such as `"up"` or `"a"`.
pub type KeyCallback = Box<dyn FnMut(&str)>;

/// Strips the `Arrow` prefix and lowercases, so `"ArrowLeft"` becomes `"left"`.
pub fn normalize_key(raw: &str) -> String {
    raw.replace("Arrow", "").to_lowercase()
}

/// Browser style key name for a terminal key code.
pub fn raw_key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        _ => return None,
    };

    Some(name)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

/// Turns terminal key presses into key-down/key-up callbacks.
///
/// Terminals report presses only. Every key delivered as down is reported up
/// again at the start of the next pump, so a press reads as held for one frame
/// and auto-repeat keeps a held key down.
#[derive(Default)]
pub struct KeyDispatch {
    on_down: Option<KeyCallback>,
    on_up: Option<KeyCallback>,
    held: Vec<String>,
}

impl KeyDispatch {
    pub fn new() -> Self {
        KeyDispatch::default()
    }

    pub fn set_on_down(&mut self, callback: KeyCallback) {
        self.on_down = Some(callback);
    }

    pub fn set_on_up(&mut self, callback: KeyCallback) {
        self.on_up = Some(callback);
    }

    /// Dispatches key events until `deadline`. Reports `Closed` on Ctrl+C.
    pub fn pump_until<C: Console>(
        &mut self,
        console: &mut C,
        deadline: Instant,
    ) -> Result<FrameStatus, SurfaceError> {
        for key in self.held.drain(..) {
            if let Some(on_up) = self.on_up.as_mut() {
                on_up(&key);
            }
        }

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());

            for ev in console.poll_keys(remaining)? {
                if is_ctrl_c(&ev) {
                    return Ok(FrameStatus::Closed);
                }

                if let Some(raw) = raw_key_name(ev.code) {
                    let key = normalize_key(&raw);
                    if let Some(on_down) = self.on_down.as_mut() {
                        on_down(&key);
                    }
                    self.held.push(key);
                }
            }

            if Instant::now() >= deadline {
                return Ok(FrameStatus::Ready);
            }
        }
    }
}

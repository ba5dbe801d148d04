use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::color::Rgb;
use crate::error::SurfaceError;

/// One terminal character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    pub fn blank(bg: Rgb) -> Self {
        Cell { ch: ' ', fg: bg, bg }
    }
}

/// The host side of a render surface: key input in, coloured cells out.
pub trait Console {
    /// Waits up to `timeout` for key presses and returns every one available.
    fn poll_keys(&mut self, timeout: Duration) -> Result<Vec<KeyEvent>, SurfaceError>;

    /// Queues a run of cells starting at `(col, row)`. Nothing shows until `flush`.
    fn put_cells(&mut self, col: u16, row: u16, cells: &[Cell]) -> Result<(), SurfaceError>;

    fn flush(&mut self) -> Result<(), SurfaceError>;
}

/// The real terminal, driven through crossterm.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Result<Self, SurfaceError> {
        let (width, height) = terminal::size().map_err(SurfaceError::terminal)?;
        Ok(TermManager { width, height, stdout: stdout() })
    }

    /// Enters the alternate screen in raw mode. A failed setup leaves the
    /// terminal restored.
    pub fn setup(&mut self) -> Result<(), SurfaceError> {
        let entered = self.enter();
        undo_on_error(entered, || self.restore())
    }

    fn enter(&mut self) -> Result<(), SurfaceError> {
        execute!(self.stdout, EnterAlternateScreen).map_err(SurfaceError::terminal)?;
        terminal::enable_raw_mode().map_err(SurfaceError::terminal)?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
            .map_err(SurfaceError::terminal)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), SurfaceError> {
        terminal::disable_raw_mode().map_err(SurfaceError::terminal)?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .map_err(SurfaceError::terminal)?;
        Ok(())
    }

    pub fn get_terminal_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

impl Console for TermManager {
    fn poll_keys(&mut self, timeout: Duration) -> Result<Vec<KeyEvent>, SurfaceError> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).map_err(SurfaceError::terminal)? {
            match read().map_err(SurfaceError::terminal)? {
                Event::Key(ev) => events.push(ev),
                Event::Resize(width, height) => {
                    self.width = width;
                    self.height = height;
                }
                _ => {}
            }
            // Only the first wait blocks, the rest drains what is already queued
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    fn put_cells(&mut self, col: u16, row: u16, cells: &[Cell]) -> Result<(), SurfaceError> {
        if row >= self.height || col >= self.width {
            return Ok(());
        }

        let visible = cells.len().min((self.width - col) as usize);
        queue!(self.stdout, cursor::MoveTo(col, row)).map_err(SurfaceError::terminal)?;

        let mut colors = None;
        for cell in &cells[..visible] {
            if colors != Some((cell.fg, cell.bg)) {
                queue!(
                    self.stdout,
                    SetForegroundColor(term_color(cell.fg)),
                    SetBackgroundColor(term_color(cell.bg))
                )
                .map_err(SurfaceError::terminal)?;
                colors = Some((cell.fg, cell.bg));
            }
            queue!(self.stdout, Print(cell.ch)).map_err(SurfaceError::terminal)?;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        queue!(self.stdout, ResetColor).map_err(SurfaceError::terminal)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Runs `undo` when `outcome` failed. The original error wins over any error
/// from `undo`.
fn undo_on_error<T, F>(outcome: Result<T, SurfaceError>, undo: F) -> Result<T, SurfaceError>
where
    F: FnOnce() -> Result<(), SurfaceError>,
{
    if outcome.is_err() {
        let _ = undo();
    }
    outcome
}

fn term_color(rgb: Rgb) -> TermColor {
    TermColor::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_step_is_undone() {
        let mut undone = false;
        let outcome: Result<(), _> = undo_on_error(Err(SurfaceError::terminal("raw mode refused")), || {
            undone = true;
            Ok(())
        });

        assert!(undone);
        assert!(matches!(outcome, Err(SurfaceError::Terminal(ref msg)) if msg == "raw mode refused"));
    }

    #[test]
    fn undo_error_does_not_mask_original() {
        let outcome: Result<(), _> = undo_on_error(Err(SurfaceError::terminal("first")), || {
            Err(SurfaceError::terminal("second"))
        });

        assert!(matches!(outcome, Err(SurfaceError::Terminal(ref msg)) if msg == "first"));
    }

    #[test]
    fn successful_step_is_kept() {
        let mut undone = false;
        let outcome = undo_on_error(Ok(5), || {
            undone = true;
            Ok(())
        });

        assert!(!undone);
        assert_eq!(outcome.ok(), Some(5));
    }
}

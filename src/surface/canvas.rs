use std::time::{Duration, Instant};

use super::raster::Raster;
use super::{DrawOptions, FrameStatus, KeyCallback, KeyDispatch, RenderSurface};
use crate::color::Rgb;
use crate::error::SurfaceError;
use crate::geometry::Rect;
use crate::term::Console;

/// Roughly one display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Immediate mode surface. Each `draw_rect` paints straight into the raster and
/// every frame the whole raster is written out, so nothing about earlier draws
/// is remembered apart from the pixels themselves.
pub struct CanvasSurface<C: Console> {
    console: C,
    raster: Raster,
    size: (i32, i32),
    keys: KeyDispatch,
    last_frame: Instant,
}

impl<C: Console> CanvasSurface<C> {
    pub fn new(console: C, cell_px: i32) -> Self {
        CanvasSurface {
            console,
            raster: Raster::new(cell_px),
            size: (0, 0),
            keys: KeyDispatch::new(),
            last_frame: Instant::now(),
        }
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

impl<C: Console> RenderSurface for CanvasSurface<C> {
    fn set_frame_size(&mut self, width: i32, height: i32) {
        self.size = (width, height);
        self.raster.resize(width, height, Rgb::WHITE);
    }

    fn frame_size(&self) -> (i32, i32) {
        self.size
    }

    fn on_key_down(&mut self, callback: KeyCallback) {
        self.keys.set_on_down(callback);
    }

    fn on_key_up(&mut self, callback: KeyCallback) {
        self.keys.set_on_up(callback);
    }

    fn draw_rect(&mut self, rect: Rect, options: &DrawOptions) -> Result<(), SurfaceError> {
        self.raster.fill_rect(rect, options);
        Ok(())
    }

    fn wait_for_frame(&mut self) -> Result<FrameStatus, SurfaceError> {
        let deadline = self.last_frame + FRAME_INTERVAL;
        let status = self.keys.pump_until(&mut self.console, deadline)?;
        self.last_frame = Instant::now();
        Ok(status)
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        for row in 0..self.raster.rows() {
            self.console.put_cells(0, row, self.raster.row(row))?;
        }
        self.console.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::term::testing::MemoryConsole;

    fn surface() -> CanvasSurface<MemoryConsole> {
        let mut surface = CanvasSurface::new(MemoryConsole::new(), 32);
        surface.set_frame_size(96, 64);
        surface
    }

    #[test]
    fn frame_size_sets_raster() {
        let surface = surface();
        assert_eq!(surface.frame_size(), (96, 64));
        assert_eq!(surface.raster().cols(), 6);
        assert_eq!(surface.raster().rows(), 2);
    }

    #[test]
    fn present_writes_every_cell() {
        let mut surface = surface();
        let green = Rgb::new(0, 200, 0);
        surface.draw_rect(Rect::new(0, 0, 96, 64), &DrawOptions::fill(Color::ALICE_BLUE)).unwrap();
        surface.draw_rect(Rect::new(32, 32, 32, 32), &DrawOptions::fill(Color::Rgb(green))).unwrap();
        surface.present().unwrap();

        let console = surface.console_mut();
        assert_eq!(console.cells_written, 12);
        assert_eq!(console.flushes, 1);
        assert_eq!(console.cell(2, 1).map(|c| c.bg), Some(green));
        assert_eq!(console.cell(0, 0).map(|c| c.bg), Some(Rgb::ALICE_BLUE));

        // Unchanged frames are still written in full
        surface.present().unwrap();
        assert_eq!(surface.console_mut().cells_written, 24);
    }

    #[test]
    fn redraw_over_moved_rect_leaves_no_trail() {
        let mut surface = surface();
        let dark = Color::Rgb(Rgb::new(0, 0, 0));
        let field = Rect::new(0, 0, 96, 64);

        surface.draw_rect(field, &DrawOptions::fill(Color::ALICE_BLUE)).unwrap();
        surface.draw_rect(Rect::new(0, 0, 32, 32), &DrawOptions::fill(dark)).unwrap();
        surface.present().unwrap();

        surface.draw_rect(field, &DrawOptions::fill(Color::ALICE_BLUE)).unwrap();
        surface.draw_rect(Rect::new(32, 0, 32, 32), &DrawOptions::fill(dark)).unwrap();
        surface.present().unwrap();

        let console = surface.console_mut();
        assert_eq!(console.cell(0, 0).map(|c| c.bg), Some(Rgb::ALICE_BLUE));
        assert_eq!(console.cell(2, 0).map(|c| c.bg), Some(Rgb::new(0, 0, 0)));
    }
}

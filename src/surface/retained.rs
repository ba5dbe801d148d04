use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::trace;

use super::raster::Raster;
use super::{DrawOptions, FrameStatus, KeyCallback, KeyDispatch, RenderSurface};
use crate::color::Rgb;
use crate::error::SurfaceError;
use crate::geometry::Rect;
use crate::term::{Cell, Console};

/// Timer based scheduling: the next frame runs as soon as the host is idle.
pub const FRAME_DELAY: Duration = Duration::from_millis(4);

const CONTAINER_BG: Rgb = Rgb::WHITE;

#[derive(Debug)]
struct Node {
    rect: Rect,
    options: DrawOptions,
    visible: bool,
}

/// Retained mode surface.
///
/// Every distinct `(x, y, w, h)` ever drawn gets one node, created on first
/// use and kept forever. A node's geometry never changes; only its style and
/// visibility do. All nodes are hidden when a frame begins and `draw_rect`
/// shows the ones touched this frame. Nodes paint in creation order.
///
/// Moving rectangles leave a trail of hidden nodes behind. That is the cost of
/// never touching geometry and it is not bounded.
pub struct RetainedSurface<C: Console> {
    console: C,
    cell_px: i32,
    size: (i32, i32),
    nodes: Vec<Node>,
    by_rect: HashMap<Rect, usize>,
    shown: Option<Raster>,
    keys: KeyDispatch,
    last_frame: Instant,
}

impl<C: Console> RetainedSurface<C> {
    pub fn new(console: C, cell_px: i32) -> Self {
        RetainedSurface {
            console,
            cell_px,
            size: (0, 0),
            nodes: vec![],
            by_rect: HashMap::new(),
            shown: None,
            keys: KeyDispatch::new(),
            last_frame: Instant::now(),
        }
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.visible).count()
    }

    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.by_rect.get(rect).map_or(false, |&idx| self.nodes[idx].visible)
    }

    fn hide_all(&mut self) {
        for node in self.nodes.iter_mut() {
            node.visible = false;
        }
    }

    fn compose(&self) -> Raster {
        let mut raster = Raster::new(self.cell_px);
        raster.resize(self.size.0, self.size.1, CONTAINER_BG);

        for node in self.nodes.iter().filter(|node| node.visible) {
            raster.fill_rect(node.rect, &node.options);
        }

        raster
    }
}

impl<C: Console> RenderSurface for RetainedSurface<C> {
    fn set_frame_size(&mut self, width: i32, height: i32) {
        self.size = (width, height);
        self.shown = None;
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
        let nodes = &mut self.nodes;
        let idx = *self.by_rect.entry(rect).or_insert_with(|| {
            trace!(?rect, count = nodes.len() + 1, "created node");
            nodes.push(Node { rect, options: *options, visible: false });
            nodes.len() - 1
        });

        let node = &mut self.nodes[idx];
        node.visible = true;
        node.options = *options;
        Ok(())
    }

    fn wait_for_frame(&mut self) -> Result<FrameStatus, SurfaceError> {
        let deadline = self.last_frame + FRAME_DELAY;
        let status = self.keys.pump_until(&mut self.console, deadline)?;
        self.last_frame = Instant::now();
        self.hide_all();
        Ok(status)
    }

    /// Writes only the cells that differ from the previous present.
    fn present(&mut self) -> Result<(), SurfaceError> {
        let next = self.compose();

        for row in 0..next.rows() {
            let cells = next.row(row);
            let before = self.shown.as_ref().map(|shown| shown.row(row));
            write_changed(&mut self.console, row, cells, before)?;
        }

        self.shown = Some(next);
        self.console.flush()
    }
}

fn write_changed<C: Console>(
    console: &mut C,
    row: u16,
    cells: &[Cell],
    before: Option<&[Cell]>,
) -> Result<(), SurfaceError> {
    let before = match before {
        Some(before) => before,
        None => return console.put_cells(0, row, cells),
    };

    let mut run_start = None;
    for col in 0..=cells.len() {
        let changed = col < cells.len() && cells[col] != before[col];

        match (changed, run_start) {
            (true, None) => run_start = Some(col),
            (false, Some(start)) => {
                console.put_cells(start as u16, row, &cells[start..col])?;
                run_start = None;
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::term::testing::MemoryConsole;

    fn surface() -> RetainedSurface<MemoryConsole> {
        let mut surface = RetainedSurface::new(MemoryConsole::new(), 32);
        surface.set_frame_size(96, 96);
        surface
    }

    fn block() -> DrawOptions {
        DrawOptions::fill(Color::Rgb(Rgb::new(0, 0, 0)))
    }

    #[test]
    fn same_rect_reuses_node() {
        let mut surface = surface();
        let rect = Rect::new(0, 0, 32, 32);

        surface.draw_rect(rect, &block()).unwrap();
        surface.wait_for_frame().unwrap();
        surface.draw_rect(rect, &DrawOptions::fill(Color::ALICE_BLUE)).unwrap();

        assert_eq!(surface.node_count(), 1);
        assert_eq!(surface.nodes[0].options.fill, Color::ALICE_BLUE);
    }

    #[test]
    fn moving_rect_leaves_hidden_nodes() {
        let mut surface = surface();

        for x in 0..3 {
            surface.wait_for_frame().unwrap();
            surface.draw_rect(Rect::new(x * 32, 0, 32, 32), &block()).unwrap();
        }

        assert_eq!(surface.node_count(), 3);
        assert_eq!(surface.visible_count(), 1);
        assert!(surface.is_visible(&Rect::new(64, 0, 32, 32)));
        assert!(!surface.is_visible(&Rect::new(0, 0, 32, 32)));
    }

    #[test]
    fn frame_start_hides_everything() {
        let mut surface = surface();
        surface.draw_rect(Rect::new(0, 0, 32, 32), &block()).unwrap();
        surface.draw_rect(Rect::new(32, 0, 32, 32), &block()).unwrap();
        assert_eq!(surface.visible_count(), 2);

        surface.wait_for_frame().unwrap();
        assert_eq!(surface.visible_count(), 0);
        assert_eq!(surface.node_count(), 2);
    }

    #[test]
    fn present_writes_only_changes() {
        let mut surface = surface();
        surface.draw_rect(Rect::new(0, 0, 32, 32), &block()).unwrap();
        surface.present().unwrap();
        // First present paints the whole 6x3 container
        assert_eq!(surface.console_mut().cells_written, 18);

        surface.wait_for_frame().unwrap();
        surface.draw_rect(Rect::new(32, 0, 32, 32), &block()).unwrap();
        surface.present().unwrap();

        let console = surface.console_mut();
        assert_eq!(console.cells_written, 18 + 4);
        assert_eq!(console.cell(0, 0).map(|c| c.bg), Some(CONTAINER_BG));
        assert_eq!(console.cell(2, 0).map(|c| c.bg), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn hidden_node_is_not_painted() {
        let mut surface = surface();
        surface.draw_rect(Rect::new(0, 0, 32, 32), &block()).unwrap();
        surface.wait_for_frame().unwrap();
        surface.present().unwrap();

        assert_eq!(surface.console_mut().cell(0, 0).map(|c| c.bg), Some(CONTAINER_BG));
    }
}

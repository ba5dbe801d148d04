use super::DrawOptions;
use crate::color::Rgb;
use crate::geometry::Rect;
use crate::term::Cell;

/// Terminal columns per grid cell; characters are about twice as tall as wide.
pub const COLUMNS_PER_CELL: i32 = 2;

const FULL: char = '█';
const RIGHT_HALF: char = '▐';
const LEFT_HALF: char = '▌';
const LOWER_HALF: char = '▄';
const UPPER_HALF: char = '▀';

/// A pixel field rasterised onto terminal cells: one grid cell is one row by
/// [`COLUMNS_PER_CELL`] columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    cell_px: i32,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Raster {
    pub fn new(cell_px: i32) -> Self {
        Raster { cell_px: cell_px.max(1), cols: 0, rows: 0, cells: vec![] }
    }

    pub fn resize(&mut self, width_px: i32, height_px: i32, bg: Rgb) {
        self.cols = ceil_div(width_px.max(0) * COLUMNS_PER_CELL, self.cell_px) as u16;
        self.rows = ceil_div(height_px.max(0), self.cell_px) as u16;
        self.cells = vec![Cell::blank(bg); self.cols as usize * self.rows as usize];
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(self.index(col, row))
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Paints `rect` over whatever is already there. Parts outside the field are clipped.
    pub fn fill_rect(&mut self, rect: Rect, opts: &DrawOptions) {
        let col0 = floor_div(rect.x * COLUMNS_PER_CELL, self.cell_px);
        let col1 = ceil_div(rect.right() * COLUMNS_PER_CELL, self.cell_px);
        let row0 = floor_div(rect.y, self.cell_px);
        let row1 = ceil_div(rect.bottom(), self.cell_px);

        let fill = opts.fill.to_rgb();
        let stroke = opts.stroke.filter(|s| s.width > 0).map(|s| s.color.to_rgb());
        let corners = opts.radius.corners();

        for row in row0.max(0)..row1.min(self.rows as i32) {
            for col in col0.max(0)..col1.min(self.cols as i32) {
                let ch = glyph(corners, col == col0, col == col1 - 1, row == row0, row == row1 - 1);
                let idx = self.index(col as u16, row as u16);
                let under = self.cells[idx].bg;

                self.cells[idx] = if ch == FULL {
                    Cell { ch, fg: fill, bg: fill }
                } else {
                    Cell { ch, fg: fill, bg: stroke.unwrap_or(under) }
                };
            }
        }
    }

    fn index(&self, col: u16, row: u16) -> usize {
        row as usize * self.cols as usize + col as usize
    }
}

/// Picks a half block for an edge whose two corners are both rounded.
fn glyph(corners: [i32; 4], left: bool, right: bool, top: bool, bottom: bool) -> char {
    let [tl, tr, br, bl] = corners;
    let round_left = left && tl > 0 && bl > 0;
    let round_right = right && tr > 0 && br > 0;
    let round_top = top && tl > 0 && tr > 0;
    let round_bottom = bottom && bl > 0 && br > 0;

    if round_top && !round_bottom {
        LOWER_HALF
    } else if round_bottom && !round_top {
        UPPER_HALF
    } else if round_left {
        RIGHT_HALF
    } else if round_right {
        LEFT_HALF
    } else {
        FULL
    }
}

fn floor_div(value: i32, by: i32) -> i32 {
    value.div_euclid(by)
}

fn ceil_div(value: i32, by: i32) -> i32 {
    -(-value).div_euclid(by)
}

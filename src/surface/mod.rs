//! Rendering backends.
//!
//! Game code only ever talks to [`RenderSurface`]. Two backends implement it:
//! [`canvas::CanvasSurface`] paints every rectangle straight into a cell raster
//! and pushes the whole raster each frame, while [`retained::RetainedSurface`]
//! keeps one node per distinct rectangle and only toggles and restyles them.

pub mod canvas;
pub mod input;
pub mod raster;
pub mod retained;

pub use canvas::CanvasSurface;
pub use input::{normalize_key, KeyCallback, KeyDispatch};
pub use retained::RetainedSurface;

use crate::color::Color;
use crate::error::SurfaceError;
use crate::geometry::Rect;

/// Corner rounding of a rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Radius {
    None,
    All(i32),
    /// Top-left, top-right, bottom-right, bottom-left.
    Corners([i32; 4]),
}

impl Radius {
    pub fn corners(&self) -> [i32; 4] {
        match *self {
            Radius::None => [0; 4],
            Radius::All(r) => [r; 4],
            Radius::Corners(c) => c,
        }
    }

    pub fn is_none(&self) -> bool {
        self.corners().iter().all(|&r| r <= 0)
    }
}

impl Default for Radius {
    fn default() -> Self {
        Radius::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: i32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub fill: Color,
    pub stroke: Option<Stroke>,
    pub radius: Radius,
}

impl DrawOptions {
    pub fn fill(fill: Color) -> Self {
        DrawOptions { fill, stroke: None, radius: Radius::None }
    }

    pub fn with_stroke(mut self, width: i32, color: Color) -> Self {
        self.stroke = Some(Stroke { width, color });
        self
    }

    pub fn with_radius(mut self, radius: Radius) -> Self {
        self.radius = radius;
        self
    }
}

/// What the host said when asked for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Ready,
    /// The host is going away; no more frames will come.
    Closed,
}

/// Drawing, input and frame pacing as seen by the game loop.
///
/// `draw_rect` and `wait_for_frame` default to a `NotImplemented` error so a
/// backend missing either one fails on its first frame instead of quietly
/// drawing nothing.
pub trait RenderSurface {
    fn set_frame_size(&mut self, width: i32, height: i32);

    fn frame_size(&self) -> (i32, i32);

    fn on_key_down(&mut self, callback: KeyCallback);

    fn on_key_up(&mut self, callback: KeyCallback);

    fn draw_rect(&mut self, _rect: Rect, _options: &DrawOptions) -> Result<(), SurfaceError> {
        Err(SurfaceError::not_implemented("draw_rect"))
    }

    /// Blocks until the next frame is due, delivering any key events that
    /// arrived meanwhile.
    fn wait_for_frame(&mut self) -> Result<FrameStatus, SurfaceError> {
        Err(SurfaceError::not_implemented("wait_for_frame"))
    }

    /// Makes everything drawn since the last `wait_for_frame` visible.
    fn present(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

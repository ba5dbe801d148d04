use crate::entity::{EntityId, RectBlock};
use crate::game::KeyState;
use crate::geometry::Point;
use crate::surface::Radius;
use Direction::*;

pub const SNAKE_HUE: f32 = 29.0;
pub const BODY_SATURATION: f32 = 70.0;
pub const HEAD_SATURATION: f32 = 100.0;
pub const DEAD_SATURATION: f32 = -65.0;
pub const SEGMENT_RADIUS: i32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Left | Right)
    }

    /// Displacement of one cell in this direction.
    pub fn delta(self, cell_size: i32) -> (i32, i32) {
        match self {
            Up => (0, -cell_size),
            Down => (0, cell_size),
            Left => (-cell_size, 0),
            Right => (cell_size, 0),
        }
    }

    /// Canonical key token that requests this direction.
    pub fn key(self) -> &'static str {
        match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        }
    }

    /// Rounding for a head moving this way: top-left, top-right, bottom-right, bottom-left.
    fn corner_radii(self) -> Radius {
        let round = |on: bool| if on { SEGMENT_RADIUS } else { 0 };
        Radius::Corners([
            round(self == Down || self == Right),
            round(self == Left || self == Down),
            round(self == Up || self == Left),
            round(self == Up || self == Right),
        ])
    }
}

/// One link of the snake chain.
///
/// A segment moves to its buffered `next_pos` on each tick and then buffers
/// where its predecessor is now, so it always sits where the predecessor was
/// one tick earlier.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub block: RectBlock,
    dead: bool,
    next_pos: Point,
    predecessor: Option<EntityId>,
    successor: Option<EntityId>,
}

impl Segment {
    pub fn new() -> Self {
        Segment::with_saturation(BODY_SATURATION)
    }

    fn with_saturation(saturation: f32) -> Self {
        Segment {
            block: RectBlock::new(SNAKE_HUE, saturation, Radius::All(SEGMENT_RADIUS)),
            dead: false,
            next_pos: Point::default(),
            predecessor: None,
            successor: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn next_pos(&self) -> Point {
        self.next_pos
    }

    pub fn predecessor(&self) -> Option<EntityId> {
        self.predecessor
    }

    pub fn successor(&self) -> Option<EntityId> {
        self.successor
    }

    /// Hooks this segment behind `predecessor`, which currently sits at `lead`.
    pub(crate) fn follow(&mut self, predecessor: EntityId, lead: Point) {
        self.predecessor = Some(predecessor);
        self.next_pos = lead;
    }

    pub(crate) fn set_successor(&mut self, successor: EntityId) {
        self.successor = Some(successor);
    }

    pub fn delta_update(&mut self, pos: &mut Point, lead: Point) {
        if self.dead {
            return;
        }

        *pos = self.next_pos;
        self.next_pos = lead;
    }

    pub(crate) fn die(&mut self) {
        self.block.saturation = DEAD_SATURATION;
        self.dead = true;
    }
}

impl Default for Segment {
    fn default() -> Self {
        Segment::new()
    }
}

/// The front of the chain. Steering requests only take effect on the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Head {
    pub body: Segment,
    direction: Direction,
    last_direction: Option<Direction>,
}

impl Head {
    pub fn new(direction: Direction) -> Self {
        Head { body: Segment::with_saturation(HEAD_SATURATION), direction, last_direction: None }
    }

    /// Pending direction, applied on the next tick.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction applied on the most recent tick, `None` before the first one.
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Accepts `requested` only when it turns across the axis of the last
    /// applied move. Returns whether it was accepted.
    pub fn steer(&mut self, requested: Direction) -> bool {
        match self.last_direction {
            Some(last) if last.is_horizontal() != requested.is_horizontal() => {
                self.direction = requested;
                true
            }
            _ => false,
        }
    }

    /// Reads the held keys. Left wins over right and up over down.
    pub fn update(&mut self, keys: &KeyState) {
        if self.body.is_dead() {
            return;
        }

        for &dir in [Left, Right, Up, Down].iter() {
            if keys.is_pressed(dir.key()) && self.steer(dir) {
                return;
            }
        }
    }

    pub fn delta_update(&mut self, pos: &mut Point, cell_size: i32) {
        if self.body.is_dead() {
            return;
        }

        self.body.block.radius = self.direction.corner_radii();

        let (dx, dy) = self.direction.delta(cell_size);
        *pos = pos.offset(dx, dy);
        self.last_direction = Some(self.direction);
    }
}

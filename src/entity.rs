use crate::color::Color;
use crate::controller::Controller;
use crate::geometry::{Point, Rect};
use crate::snake::{Direction, Head, Segment};
use crate::surface::{DrawOptions, Radius};

pub const FILL_LIGHTNESS: f32 = 49.0;
pub const STROKE_LIGHTNESS: f32 = 38.0;
pub const STROKE_WIDTH: i32 = 4;

pub const FOOD_HUE: f32 = 313.0;
pub const FOOD_SATURATION: f32 = 100.0;

/// Handle of an entity inside its [`Scene`](crate::scene::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The per-frame passes an entity takes part in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Passes {
    pub update: bool,
    pub delta_update: bool,
    pub post_delta_update: bool,
    pub draw: bool,
}

impl Passes {
    const DRAW_ONLY: Passes = Passes { update: false, delta_update: false, post_delta_update: false, draw: true };
}

/// A coloured cell-sized rectangle, styled in HSL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBlock {
    pub hue: f32,
    pub saturation: f32,
    pub radius: Radius,
}

impl RectBlock {
    pub fn new(hue: f32, saturation: f32, radius: Radius) -> Self {
        RectBlock { hue, saturation, radius }
    }

    pub fn options(&self) -> DrawOptions {
        DrawOptions::fill(Color::hsl(self.hue, self.saturation, FILL_LIGHTNESS))
            .with_stroke(STROKE_WIDTH, Color::hsl(self.hue, self.saturation, STROKE_LIGHTNESS))
            .with_radius(self.radius)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Background,
    Block(RectBlock),
    Segment(Segment),
    Head(Head),
    Food(RectBlock),
    Controller(Controller),
}

impl EntityKind {
    pub fn passes(&self) -> Passes {
        match self {
            EntityKind::Background | EntityKind::Block(_) | EntityKind::Food(_) => Passes::DRAW_ONLY,
            EntityKind::Segment(_) => Passes { delta_update: true, draw: true, ..Passes::default() },
            EntityKind::Head(_) => Passes { update: true, delta_update: true, draw: true, ..Passes::default() },
            EntityKind::Controller(_) => Passes { post_delta_update: true, ..Passes::default() },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub pos: Point,
    pub kind: EntityKind,
    id: Option<EntityId>,
}

impl Entity {
    pub fn new(pos: Point, kind: EntityKind) -> Self {
        Entity { pos, kind, id: None }
    }

    pub fn background() -> Self {
        Entity::new(Point::default(), EntityKind::Background)
    }

    pub fn block(pos: Point, block: RectBlock) -> Self {
        Entity::new(pos, EntityKind::Block(block))
    }

    pub fn food(pos: Point) -> Self {
        Entity::new(pos, EntityKind::Food(RectBlock::new(FOOD_HUE, FOOD_SATURATION, Radius::None)))
    }

    pub fn segment(pos: Point) -> Self {
        Entity::new(pos, EntityKind::Segment(Segment::new()))
    }

    pub fn head(pos: Point, direction: Direction) -> Self {
        Entity::new(pos, EntityKind::Head(Head::new(direction)))
    }

    pub fn controller(head: EntityId) -> Self {
        Entity::new(Point::default(), EntityKind::Controller(Controller::new(head)))
    }

    /// Handle given by the scene on `add`; `None` until then.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub(crate) fn attach(&mut self, id: EntityId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    /// The chain link of a head or body segment.
    pub fn as_segment(&self) -> Option<&Segment> {
        match &self.kind {
            EntityKind::Segment(segment) => Some(segment),
            EntityKind::Head(head) => Some(&head.body),
            _ => None,
        }
    }

    pub fn as_segment_mut(&mut self) -> Option<&mut Segment> {
        match &mut self.kind {
            EntityKind::Segment(segment) => Some(segment),
            EntityKind::Head(head) => Some(&mut head.body),
            _ => None,
        }
    }

    pub fn as_head(&self) -> Option<&Head> {
        match &self.kind {
            EntityKind::Head(head) => Some(head),
            _ => None,
        }
    }

    /// The cell this entity occupies.
    pub fn rect(&self, cell_size: i32) -> Rect {
        Rect::square(self.pos, cell_size)
    }

    pub fn collided(&self, cell_size: i32, other: &Rect) -> bool {
        self.rect(cell_size).overlaps(other)
    }
}

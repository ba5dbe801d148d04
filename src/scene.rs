//! The entity arena and the passes that run over it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Color;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::SurfaceError;
use crate::game::KeyState;
use crate::geometry::{Point, Rect};
use crate::snake::Segment;
use crate::surface::{DrawOptions, RenderSurface};

/// Every entity of the game, in update and draw order.
///
/// Links between entities (segment to successor, controller to head and food)
/// are [`EntityId`] handles into this arena. Entities are never removed.
pub struct Scene {
    width: i32,
    height: i32,
    cell_size: i32,
    entities: Vec<Entity>,
    rng: StdRng,
}

impl Scene {
    pub fn new(config: &GameConfig) -> Self {
        Scene::with_rng(config, StdRng::from_entropy())
    }

    /// A scene whose food placement is reproducible.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Scene::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        Scene {
            width: config.width,
            height: config.height,
            cell_size: config.cell_size,
            entities: vec![],
            rng,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn grid_width(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn grid_height(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }

    /// Appends `entity` to the update and draw order and returns its handle.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        entity.attach(id);
        self.entities.push(entity);
        id
    }

    /// `head` followed by every segment linked behind it.
    pub fn chain(&self, head: EntityId) -> Vec<EntityId> {
        let mut ids = vec![head];
        let mut next = self.get(head).as_segment().and_then(Segment::successor);

        while let Some(id) = next {
            ids.push(id);
            next = self.get(id).as_segment().and_then(Segment::successor);
        }

        ids
    }

    /// Adds a new segment at `pos` behind the current tail of `head`'s chain.
    /// Returns `head` so appends can be chained.
    pub fn append_segment(&mut self, head: EntityId, pos: Point) -> EntityId {
        let tail = self.chain(head).last().copied().unwrap_or(head);
        let tail_pos = self.get(tail).pos;

        let mut segment = Entity::segment(pos);
        if let Some(link) = segment.as_segment_mut() {
            link.follow(tail, tail_pos);
        }
        let id = self.add(segment);

        if let Some(tail_segment) = self.get_mut(tail).as_segment_mut() {
            tail_segment.set_successor(id);
        }

        head
    }

    /// Marks `head` and everything behind it dead.
    pub fn kill(&mut self, head: EntityId) {
        for id in self.chain(head) {
            if let Some(segment) = self.get_mut(id).as_segment_mut() {
                segment.die();
            }
        }
    }

    /// Adds `food` and hands it to `controller`, then places it.
    pub fn add_food(&mut self, controller: EntityId, food: Entity) -> EntityId {
        let food = self.add(food);

        if let EntityKind::Controller(ctrl) = &mut self.get_mut(controller).kind {
            ctrl.set_food(food);
            let ctrl = *ctrl;
            ctrl.spawn(self);
        }

        food
    }

    /// A uniformly random grid cell, in pixels.
    pub fn random_cell(&mut self) -> Point {
        let (columns, rows) = (self.grid_width(), self.grid_height());
        let x = self.rng.gen_range(0..columns);
        let y = self.rng.gen_range(0..rows);
        Point::new(x * self.cell_size, y * self.cell_size)
    }

    /// One cell thick strips just outside the left, right, top and bottom edges.
    pub fn boundary_strips(&self) -> [Rect; 4] {
        let (w, h, c) = (self.width, self.height, self.cell_size);
        [
            Rect::new(-c, 0, c, h),
            Rect::new(w, 0, c, h),
            Rect::new(0, -c, w, c),
            Rect::new(0, h, w, c),
        ]
    }

    /// Input pass, every frame.
    pub fn update(&mut self, keys: &KeyState) {
        for entity in self.entities.iter_mut().filter(|e| e.kind.passes().update) {
            if let EntityKind::Head(head) = &mut entity.kind {
                head.update(keys);
            }
        }
    }

    /// Motion pass, once per tick. Entities move in insertion order, so a
    /// segment sees its predecessor already moved.
    pub fn delta_update(&mut self) {
        let cell = self.cell_size;

        for idx in 0..self.entities.len() {
            if !self.entities[idx].kind.passes().delta_update {
                continue;
            }

            let lead = self.entities[idx]
                .as_segment()
                .and_then(Segment::predecessor)
                .map(|p| self.entities[p.0].pos);

            let entity = &mut self.entities[idx];
            match &mut entity.kind {
                EntityKind::Head(head) => head.delta_update(&mut entity.pos, cell),
                EntityKind::Segment(segment) => {
                    if let Some(lead) = lead {
                        segment.delta_update(&mut entity.pos, lead);
                    }
                }
                _ => {}
            }
        }
    }

    /// Consequences pass, once per tick after every entity has moved.
    pub fn post_delta_update(&mut self) {
        for idx in 0..self.entities.len() {
            if !self.entities[idx].kind.passes().post_delta_update {
                continue;
            }

            if let EntityKind::Controller(controller) = self.entities[idx].kind {
                controller.post_delta_update(self);
            }
        }
    }

    /// One simulation step.
    pub fn tick(&mut self) {
        self.delta_update();
        self.post_delta_update();
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) -> Result<(), SurfaceError> {
        for entity in self.entities.iter().filter(|e| e.kind.passes().draw) {
            match &entity.kind {
                EntityKind::Background => {
                    let field = Rect::new(entity.pos.x, entity.pos.y, self.width, self.height);
                    surface.draw_rect(field, &DrawOptions::fill(Color::ALICE_BLUE))?;
                }
                EntityKind::Block(block) | EntityKind::Food(block) => {
                    surface.draw_rect(entity.rect(self.cell_size), &block.options())?;
                }
                EntityKind::Segment(segment) => {
                    surface.draw_rect(entity.rect(self.cell_size), &segment.block.options())?;
                }
                EntityKind::Head(head) => {
                    surface.draw_rect(entity.rect(self.cell_size), &head.body.block.options())?;
                }
                EntityKind::Controller(_) => {}
            }
        }

        Ok(())
    }
}

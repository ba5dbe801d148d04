use tracing::{debug, info};

use crate::entity::EntityId;
use crate::geometry::Rect;
use crate::scene::Scene;

/// Referee of the game: keeps the food placed and decides what the head ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    head: EntityId,
    food: Option<EntityId>,
}

impl Controller {
    pub fn new(head: EntityId) -> Self {
        Controller { head, food: None }
    }

    pub fn head(&self) -> EntityId {
        self.head
    }

    pub fn food(&self) -> Option<EntityId> {
        self.food
    }

    pub(crate) fn set_food(&mut self, food: EntityId) {
        self.food = Some(food);
    }

    /// Moves the food to a random grid cell inside the field.
    pub fn spawn(&self, scene: &mut Scene) {
        if let Some(food) = self.food {
            let cell = scene.random_cell();
            scene.get_mut(food).pos = cell;
        }
    }

    /// Runs after every entity has moved for this tick. Wall and self hits kill
    /// the snake before food is considered, so a dying snake never eats.
    pub fn post_delta_update(&self, scene: &mut Scene) {
        let cell = scene.cell_size();
        let head = scene.get(self.head);

        if head.as_segment().map_or(true, |segment| segment.is_dead()) {
            return;
        }

        let head_rect = head.rect(cell);

        for id in scene.chain(self.head).into_iter().skip(1) {
            if scene.get(id).collided(cell, &head_rect) {
                info!(x = head_rect.x, y = head_rect.y, "snake ran into itself");
                scene.kill(self.head);
                return;
            }
        }

        for strip in scene.boundary_strips().iter() {
            if head_rect.overlaps(strip) {
                info!(x = head_rect.x, y = head_rect.y, "snake hit the wall");
                scene.kill(self.head);
                return;
            }
        }

        let food = match self.food {
            Some(food) => food,
            None => return,
        };

        let food_pos = scene.get(food).pos;
        if head_rect.overlaps(&Rect::square(food_pos, cell)) {
            scene.append_segment(self.head, food_pos);
            self.spawn(scene);
            debug!(
                eaten_x = food_pos.x,
                eaten_y = food_pos.y,
                next_x = scene.get(food).pos.x,
                next_y = scene.get(food).pos.y,
                length = scene.chain(self.head).len(),
                "food eaten"
            );
        }
    }
}

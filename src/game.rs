use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{info, trace};

use crate::config::{GameConfig, DEFAULT_FRAME_RATE};
use crate::entity::{Entity, EntityId};
use crate::error::SurfaceError;
use crate::geometry::Point;
use crate::scene::Scene;
use crate::snake::Direction;
use crate::surface::{FrameStatus, RenderSurface};

/// Which keys are currently held, by canonical token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    pressed: HashMap<String, bool>,
}

impl KeyState {
    pub fn press(&mut self, key: &str) {
        self.pressed.insert(key.to_string(), true);
    }

    pub fn release(&mut self, key: &str) {
        self.pressed.insert(key.to_string(), false);
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.get(key).copied().unwrap_or(false)
    }
}

/// Owns the scene and drives it one frame at a time.
///
/// Input is read every frame, the simulation only advances when a full tick
/// interval has passed, and everything is drawn every frame either way.
pub struct GameLoop {
    scene: Scene,
    keys: Rc<RefCell<KeyState>>,
    required_dt: Duration,
    last_tick: Instant,
}

impl GameLoop {
    pub fn new(config: &GameConfig) -> Self {
        GameLoop::with_scene(Scene::new(config))
    }

    pub fn with_scene(scene: Scene) -> Self {
        let mut game = GameLoop {
            scene,
            keys: Rc::new(RefCell::new(KeyState::default())),
            required_dt: Duration::default(),
            last_tick: Instant::now(),
        };
        game.set_frame_rate(DEFAULT_FRAME_RATE);
        game
    }

    /// The stock game: background, a three long snake heading right from the
    /// top-left corner, a controller and its food.
    pub fn standard(config: &GameConfig) -> Self {
        let mut game = GameLoop::new(config);
        game.set_frame_rate(config.tick_rate);
        game.populate(config.cell_size);
        game
    }

    pub(crate) fn populate(&mut self, cell_size: i32) {
        self.add(Entity::background());

        let head = self.add(Entity::head(Point::new(cell_size * 2, 0), Direction::Right));
        let head = self.scene.append_segment(head, Point::new(cell_size, 0));
        self.scene.append_segment(head, Point::new(0, 0));

        let controller = self.add(Entity::controller(head));
        self.scene.add_food(controller, Entity::food(Point::default()));
    }

    /// Ticks per second the simulation advances at.
    pub fn set_frame_rate(&mut self, rate: u32) {
        self.required_dt = Duration::from_secs_f64(1.0 / f64::from(rate.max(1)));
    }

    pub fn tick_interval(&self) -> Duration {
        self.required_dt
    }

    pub fn add(&mut self, entity: Entity) -> EntityId {
        self.scene.add(entity)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn keys(&self) -> KeyState {
        self.keys.borrow().clone()
    }

    /// Sizes the surface, subscribes to its keys and runs frames until the
    /// host closes.
    pub fn initialize(&mut self, surface: &mut dyn RenderSurface) -> Result<(), SurfaceError> {
        surface.set_frame_size(self.scene.width(), self.scene.height());
        self.subscribe(surface);

        info!(
            width = self.scene.width(),
            height = self.scene.height(),
            cell = self.scene.cell_size(),
            tick_ms = self.required_dt.as_millis() as u64,
            "game loop started"
        );

        self.last_tick = Instant::now();
        loop {
            match surface.wait_for_frame()? {
                FrameStatus::Ready => {
                    self.frame(surface, Instant::now())?;
                }
                FrameStatus::Closed => {
                    info!("host closed, stopping");
                    return Ok(());
                }
            }
        }
    }

    /// Routes the surface's key events into the shared key map.
    fn subscribe(&self, surface: &mut dyn RenderSurface) {
        let down = Rc::clone(&self.keys);
        surface.on_key_down(Box::new(move |key: &str| down.borrow_mut().press(key)));
        let up = Rc::clone(&self.keys);
        surface.on_key_up(Box::new(move |key: &str| up.borrow_mut().release(key)));
    }

    /// Runs one frame as of `now`. Returns whether the simulation ticked.
    pub fn frame(&mut self, surface: &mut dyn RenderSurface, now: Instant) -> Result<bool, SurfaceError> {
        let keys = self.keys();
        self.scene.update(&keys);

        let ticked = now.saturating_duration_since(self.last_tick) > self.required_dt;
        if ticked {
            self.last_tick = now;
            trace!("tick");
            self.scene.tick();
        }

        self.scene.draw(surface)?;
        surface.present()?;
        Ok(ticked)
    }
}

use std::time::{Duration, Instant};

use gridsnake::surface::KeyCallback;
use gridsnake::{
    Direction, Entity, EntityId, GameConfig, GameLoop, KeyState, Point, RenderSurface, Scene, SurfaceError,
};

fn scene() -> Scene {
    Scene::with_seed(&GameConfig::default(), 42)
}

/// Head at `head` plus body segments at `body`, in chain order.
fn snake(scene: &mut Scene, head: Point, direction: Direction, body: &[Point]) -> EntityId {
    let id = scene.add(Entity::head(head, direction));
    for &pos in body {
        scene.append_segment(id, pos);
    }
    id
}

fn positions(scene: &Scene, head: EntityId) -> Vec<Point> {
    scene.chain(head).into_iter().map(|id| scene.get(id).pos).collect()
}

fn is_dead(scene: &Scene, id: EntityId) -> bool {
    scene.get(id).as_segment().map_or(false, |s| s.is_dead())
}

fn steer(scene: &mut Scene, key: &str) {
    let mut keys = KeyState::default();
    keys.press(key);
    scene.update(&keys);
}

#[test]
fn three_segment_snake_advances_one_cell() {
    let mut scene = scene();
    let head = snake(&mut scene, Point::new(64, 0), Direction::Right, &[Point::new(32, 0), Point::new(0, 0)]);

    scene.tick();

    assert_eq!(positions(&scene, head), vec![Point::new(96, 0), Point::new(64, 0), Point::new(32, 0)]);
}

#[test]
fn segments_trail_predecessor_by_exactly_one_tick() {
    let mut scene = scene();
    let head = snake(
        &mut scene,
        Point::new(128, 64),
        Direction::Right,
        &[Point::new(96, 64), Point::new(64, 64), Point::new(32, 64)],
    );

    let turns = [None, Some("down"), None, Some("left"), None, Some("down"), Some("right"), None];
    let mut history = vec![positions(&scene, head)];

    for turn in turns.iter() {
        if let Some(key) = turn {
            steer(&mut scene, key);
        }
        scene.tick();
        history.push(positions(&scene, head));
    }

    for t in 1..history.len() {
        for seg in 1..history[t].len() {
            assert_eq!(history[t][seg], history[t - 1][seg - 1], "tick {} segment {}", t, seg);
        }
    }
}

#[test]
fn leaving_through_the_left_wall_kills() {
    let mut scene = scene();
    let head = snake(&mut scene, Point::new(0, 0), Direction::Left, &[]);
    scene.add(Entity::controller(head));

    scene.tick();

    assert_eq!(scene.get(head).pos, Point::new(-32, 0));
    assert!(is_dead(&scene, head));
}

#[test]
fn eating_grows_at_food_position_and_respawns() {
    let mut scene = scene();
    let head = snake(&mut scene, Point::new(96, 128), Direction::Right, &[]);
    let controller = scene.add(Entity::controller(head));
    let food = scene.add_food(controller, Entity::food(Point::default()));
    scene.get_mut(food).pos = Point::new(128, 128);

    scene.tick();

    let chain = scene.chain(head);
    assert_eq!(chain.len(), 2);
    assert_eq!(scene.get(chain[1]).pos, Point::new(128, 128));

    let respawned = scene.get(food).pos;
    assert!(respawned.x >= 0 && respawned.x < 960 && respawned.x % 32 == 0);
    assert!(respawned.y >= 0 && respawned.y < 960 && respawned.y % 32 == 0);
}

#[test]
fn chain_grows_by_one_per_meal() {
    let mut scene = scene();
    let head = snake(&mut scene, Point::new(0, 480), Direction::Right, &[Point::new(-32, 480)]);
    let controller = scene.add(Entity::controller(head));
    let food = scene.add_food(controller, Entity::food(Point::default()));

    let meals = 6;
    for _ in 0..meals {
        let ahead = scene.get(head).pos.offset(32, 0);
        scene.get_mut(food).pos = ahead;
        scene.tick();

        let tail = *scene.chain(head).last().expect("chain has a tail");
        assert_eq!(scene.get(tail).pos, ahead);
    }

    assert_eq!(scene.chain(head).len(), 2 + meals);
    assert!(!is_dead(&scene, head));
}

#[test]
fn biting_the_body_kills_every_segment() {
    let mut scene = scene();
    let head = snake(
        &mut scene,
        Point::new(128, 0),
        Direction::Right,
        &[Point::new(96, 0), Point::new(64, 0), Point::new(32, 0), Point::new(0, 0)],
    );
    scene.add(Entity::controller(head));

    scene.tick();
    steer(&mut scene, "down");
    scene.tick();
    steer(&mut scene, "left");
    scene.tick();
    steer(&mut scene, "up");
    scene.tick();

    assert_eq!(scene.get(head).pos, Point::new(128, 0));
    assert!(scene.chain(head).into_iter().all(|id| is_dead(&scene, id)));
}

#[test]
fn dead_snake_stays_put_and_cannot_eat() {
    let mut scene = scene();
    let head = snake(&mut scene, Point::new(96, 128), Direction::Right, &[Point::new(64, 128)]);
    let controller = scene.add(Entity::controller(head));
    let food = scene.add_food(controller, Entity::food(Point::default()));

    scene.kill(head);
    let before = positions(&scene, head);

    scene.get_mut(food).pos = Point::new(96, 128);
    steer(&mut scene, "up");
    for _ in 0..5 {
        scene.tick();
    }

    assert_eq!(positions(&scene, head), before);
    assert_eq!(scene.get(food).pos, Point::new(96, 128));
    assert_eq!(scene.chain(head).len(), 2);
}

/// Provides frame size and keys but neither drawing nor frame pacing.
struct Headless {
    size: (i32, i32),
}

impl RenderSurface for Headless {
    fn set_frame_size(&mut self, width: i32, height: i32) {
        self.size = (width, height);
    }

    fn frame_size(&self) -> (i32, i32) {
        self.size
    }

    fn on_key_down(&mut self, _callback: KeyCallback) {}

    fn on_key_up(&mut self, _callback: KeyCallback) {}
}

#[test]
fn surface_without_drawing_fails_the_first_frame() {
    let mut game = GameLoop::standard(&GameConfig::default());
    let mut surface = Headless { size: (0, 0) };

    let err = game.frame(&mut surface, Instant::now() + Duration::from_secs(1));
    assert!(matches!(err, Err(SurfaceError::NotImplemented { capability: "draw_rect" })));

    let err = game.initialize(&mut surface);
    assert!(matches!(err, Err(SurfaceError::NotImplemented { capability: "wait_for_frame" })));
    assert_eq!(surface.frame_size(), (960, 960));
}

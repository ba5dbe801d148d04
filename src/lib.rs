//! Grid snake on a swappable render surface.
//!
//! [`game::GameLoop`] owns a [`scene::Scene`] of entities and drives it one
//! frame at a time against any [`surface::RenderSurface`]: input every frame,
//! simulation at a fixed tick rate, drawing every frame.

pub mod color;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod game;
pub mod geometry;
pub mod scene;
pub mod snake;
pub mod surface;
pub mod term;

pub use config::GameConfig;
pub use entity::{Entity, EntityId, EntityKind};
pub use error::SurfaceError;
pub use game::{GameLoop, KeyState};
pub use geometry::{Point, Rect};
pub use scene::Scene;
pub use snake::Direction;
pub use surface::RenderSurface;

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives through `tick`/`frame` deltas
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies
//!
//! Coordinates are "ground space": x grows right from the game area's left
//! edge, y grows up from the ground line.

pub mod collision;
pub mod difficulty;
pub mod geometry;
pub mod obstacles;
pub mod runner;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionHit, HitShape, RunnerHitbox, check_obstacle_collisions};
pub use difficulty::Difficulty;
pub use geometry::{Aabb, Rect, SpikeDirection, polygons_overlap};
pub use obstacles::{Obstacle, ObstacleField, ObstacleVariant};
pub use runner::{Bounds, Runner};
pub use snapshot::{RenderSnapshot, RunnerView};
pub use state::{GamePhase, GameState, StopReason, TickEvents};
pub use tick::{frame, start_run, stop_run, tick};
pub use world::{TrackLayout, Viewport, WorldScroll};

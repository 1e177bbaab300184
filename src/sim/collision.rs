//! Collision detection between the runner and obstacles
//!
//! The tricky part of the runner: the body spins mid-jump, so its hitbox is
//! a rotated rectangle, while spikes are triangles. Both are convex, so every
//! pair is resolved with a separating-axis test after cheap box rejection.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, polygons_overlap, rotated_body_corners, spike_triangle};
use super::obstacles::Obstacle;
use super::runner::Runner;
use crate::tuning::Tuning;

/// Which part of an obstacle was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitShape {
    Base,
    Spike,
}

/// First collision found in a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionHit {
    pub obstacle_id: u32,
    pub shape: HitShape,
}

/// The runner's hitbox on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerHitbox {
    pub corners: [DVec2; 4],
    pub aabb: Aabb,
}

impl RunnerHitbox {
    /// Hitbox for the runner as it is drawn this frame
    ///
    /// The body is rotated about its bottom-center by the visual rotation,
    /// lifted so no corner dips below the ground, and placed at the runner's
    /// screen position.
    pub fn compute(runner: &Runner, tuning: &Tuning) -> Self {
        let rotation = runner.visual_rotation();
        let lift = runner.visual_lift(tuning);
        let pivot = DVec2::new(
            runner_left(runner, tuning) + tuning.runner_width / 2.0,
            runner.y + lift,
        );
        let corners =
            rotated_body_corners(tuning.runner_width, tuning.runner_height, rotation).map(|c| c + pivot);
        Self {
            corners,
            aabb: Aabb::from_points(&corners),
        }
    }
}

/// Runner's left edge on screen (unrotated)
#[inline]
pub fn runner_left(runner: &Runner, tuning: &Tuning) -> f64 {
    tuning.runner_base_left + runner.x
}

/// Test the runner against one obstacle's shapes
pub fn runner_obstacle_collision(hitbox: &RunnerHitbox, obstacle: &Obstacle, min_overlap: f64) -> Option<HitShape> {
    if !hitbox.aabb.overlaps(&obstacle.bounds()) {
        return None;
    }

    let origin = obstacle.origin();

    for base in &obstacle.bases {
        let rect = base.translated(origin);
        if !hitbox.aabb.overlaps(&rect.aabb()) {
            continue;
        }
        if polygons_overlap(&hitbox.corners, &rect.corners(), min_overlap) {
            return Some(HitShape::Base);
        }
    }

    let spike_rect = obstacle.spike.rect.translated(origin);
    if !hitbox.aabb.overlaps(&spike_rect.aabb()) {
        return None;
    }
    let triangle = spike_triangle(&spike_rect, obstacle.spike.direction);
    polygons_overlap(&hitbox.corners, &triangle, min_overlap).then_some(HitShape::Spike)
}

/// Find the first obstacle the runner collides with, if any
///
/// Stops at the first hit.
pub fn check_obstacle_collisions<'a>(
    runner: &Runner,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
    tuning: &Tuning,
) -> Option<CollisionHit> {
    let mut obstacles = obstacles.into_iter().peekable();
    obstacles.peek()?;

    let hitbox = RunnerHitbox::compute(runner, tuning);
    obstacles.find_map(|obstacle| {
        runner_obstacle_collision(&hitbox, obstacle, tuning.collision_min_overlap).map(|shape| CollisionHit {
            obstacle_id: obstacle.id,
            shape,
        })
    })
}

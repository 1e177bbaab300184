//! Obstacle generation, scrolling, scoring and retirement
//!
//! Obstacles sit on the same tile grid as the track. A spawn cursor walks
//! ahead of the visible window and drops one obstacle every
//! `1 + obstacle_gap_tiles` tiles, so spacing never depends on frame rate.

use std::collections::VecDeque;

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Rect, SpikeDirection};
use super::world::{Viewport, WorldScroll, start_spawn_tile};
use crate::consts::*;
use crate::tuning::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleVariant {
    /// Spike on the ground
    Ground1,
    /// Spike on top of a block
    Ground2,
    /// Downward spike under a bar, hanging above the ground
    Ceiling,
}

/// The triangular part of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    /// Box the triangle is inscribed in
    pub rect: Rect,
    pub direction: SpikeDirection,
}

/// An obstacle on the track
///
/// Shape rectangles are relative to the obstacle's left edge and the ground
/// line; add `screen_x` to get the on-screen position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// World tile column (never changes after spawning)
    pub tile_x: i64,
    /// Tile row of the obstacle's lowest point above the ground
    pub tile_y: u32,
    pub variant: ObstacleVariant,
    /// Left edge on screen, refreshed every tick
    pub screen_x: f64,
    /// Already counted toward the score
    pub scored: bool,
    /// Solid rectangles (blocks and bars)
    pub bases: Vec<Rect>,
    pub spike: Spike,
}

impl Obstacle {
    /// Build an obstacle's shapes for its variant
    pub fn new(id: u32, tile_x: i64, variant: ObstacleVariant, tile_y: u32, tuning: &Tuning) -> Self {
        let w = tuning.runner_width;
        let h = tuning.runner_height;
        let tile = tuning.tile_size;
        let bottom = tile_y as f64 * tile;

        let (bases, spike) = match variant {
            ObstacleVariant::Ground1 => (
                Vec::new(),
                Spike {
                    rect: Rect::new(0.0, bottom, w, h),
                    direction: SpikeDirection::Up,
                },
            ),
            ObstacleVariant::Ground2 => (
                vec![Rect::new(0.0, bottom, w, h)],
                Spike {
                    rect: Rect::new(0.0, bottom + h, w, h),
                    direction: SpikeDirection::Up,
                },
            ),
            ObstacleVariant::Ceiling => (
                vec![Rect::new(0.0, bottom + tile, w, tile)],
                Spike {
                    rect: Rect::new(0.0, bottom, w, tile),
                    direction: SpikeDirection::Down,
                },
            ),
        };

        Self {
            id,
            tile_x,
            tile_y,
            variant,
            screen_x: 0.0,
            scored: false,
            bases,
            spike,
        }
    }

    /// Offset from shape-local space to screen space
    #[inline]
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.screen_x, 0.0)
    }

    /// Bounding box of every shape, on screen
    pub fn bounds(&self) -> Aabb {
        let offset = self.origin();
        self.bases
            .iter()
            .chain(std::iter::once(&self.spike.rect))
            .map(|r| r.translated(offset).aabb())
            .reduce(|a, b| Aabb {
                min: a.min.min(b.min),
                max: a.max.max(b.max),
            })
            .unwrap_or(Aabb {
                min: offset,
                max: offset,
            })
    }
}

/// Inclusive range of rows a ceiling spike tip may use
///
/// The configured range is capped so the tip never sits higher than
/// `ceiling_max_offset_px` above the ground.
pub fn ceiling_tip_rows(tuning: &Tuning) -> (u32, u32) {
    let (min_row, max_row) = tuning.ceiling_spike_tip_rows;
    let max_safe_row = (tuning.ceiling_max_offset_px / tuning.tile_size).floor().max(0.0) as u32;
    let upper = max_row.min(max_safe_row);
    let lower = min_row.min(upper);
    (lower, upper)
}

/// Pick a variant and row for the next obstacle
pub fn roll_obstacle(rng: &mut Pcg32, tuning: &Tuning) -> (ObstacleVariant, u32) {
    if rng.random::<f64>() < tuning.ceiling_obstacle_chance {
        let (lower, upper) = ceiling_tip_rows(tuning);
        let row = rng.random_range(lower..=upper);
        return (ObstacleVariant::Ceiling, row);
    }

    let variant = if rng.random::<f64>() < TWO_BLOCK_CHANCE {
        ObstacleVariant::Ground2
    } else {
        ObstacleVariant::Ground1
    };
    (variant, 0)
}

/// Live obstacles plus the spawn cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Ordered by `tile_x` (oldest first)
    pub obstacles: VecDeque<Obstacle>,
    /// Tile column the next obstacle will be spawned at
    pub next_spawn_tile: i64,
    /// Total obstacles spawned this run (also the next id)
    pub spawned: u32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: VecDeque::new(),
            next_spawn_tile: 0,
            spawned: 0,
        }
    }

    /// Drop every obstacle; safe to call repeatedly
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Clear and rewind the cursor to just past the right edge
    pub fn reset(&mut self, viewport: &Viewport, tuning: &Tuning) {
        self.clear();
        self.spawned = 0;
        self.next_spawn_tile = start_spawn_tile(viewport, tuning);
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Place a specific obstacle at `tile_x`, outside the cursor
    pub fn spawn_at(
        &mut self,
        tile_x: i64,
        variant: ObstacleVariant,
        tile_y: u32,
        world: &WorldScroll,
        tuning: &Tuning,
    ) -> &Obstacle {
        let mut obstacle = Obstacle::new(self.spawned, tile_x, variant, tile_y, tuning);
        obstacle.screen_x = world.screen_x(tile_x, tuning.tile_size);
        self.spawned += 1;

        // Keep tile order so retirement can pop from the front
        let index = self.obstacles.partition_point(|o| o.tile_x <= tile_x);
        self.obstacles.insert(index, obstacle);
        &self.obstacles[index]
    }

    /// Spawn every obstacle that has come within the lookahead window
    pub fn spawn_ahead(&mut self, world: &WorldScroll, viewport: &Viewport, tuning: &Tuning, rng: &mut Pcg32) {
        let tile = tuning.tile_size;
        let right_edge_px = world.scroll_px + viewport.width + tile * SPAWN_LOOKAHEAD_TILES;
        let right_edge_tile = (right_edge_px / tile).ceil() as i64;

        while self.next_spawn_tile <= right_edge_tile {
            let (variant, row) = roll_obstacle(rng, tuning);
            let tile_x = self.next_spawn_tile;
            self.spawn_at(tile_x, variant, row, world, tuning);
            log::debug!("Spawned {:?} at tile {} (row {})", variant, tile_x, row);

            // Exactly `gap` empty tiles between any two obstacles
            self.next_spawn_tile += 1 + tuning.obstacle_gap_tiles as i64;
        }
    }

    /// Scroll obstacles, award passed ones and retire those far off-screen
    ///
    /// `runner_left` is the runner's left edge on screen. An obstacle scores
    /// once its own trailing edge is behind it. Returns the points earned
    /// this tick.
    pub fn advance(&mut self, world: &WorldScroll, runner_left: f64, tuning: &Tuning) -> u32 {
        let tile = tuning.tile_size;
        let mut points = 0;

        for obstacle in self.obstacles.iter_mut() {
            obstacle.screen_x = world.screen_x(obstacle.tile_x, tile);
            if !obstacle.scored && obstacle.bounds().max.x < runner_left {
                obstacle.scored = true;
                points += 1;
            }
        }

        let retire_x = -tile * RETIRE_TILES;
        while self
            .obstacles
            .front()
            .is_some_and(|o| o.screen_x < retire_x)
        {
            self.obstacles.pop_front();
        }

        points
    }

    /// Per-tick update: spawn ahead, then scroll/score/retire
    pub fn update(
        &mut self,
        world: &WorldScroll,
        viewport: &Viewport,
        runner_left: f64,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> u32 {
        self.spawn_ahead(world, viewport, tuning, rng);
        self.advance(world, runner_left, tuning)
    }
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self::new()
    }
}

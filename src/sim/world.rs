//! World scroll and the tile track
//!
//! The world is a single scroll offset. Tiles and obstacles keep fixed
//! world-space tile coordinates; their screen position is derived from it.

use serde::{Deserialize, Serialize};

use crate::clamp;
use crate::consts::*;
use crate::tuning::Tuning;

/// Play-area layout reported by the host page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Visible width of the game area (px)
    pub width: f64,
    /// Visible height of the game area (px)
    pub height: f64,
    /// Horizontal padding inside the game area (left + right, px)
    pub padding_x: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding_x: 0.0,
        }
    }
}

impl Viewport {
    /// Width available for the runner to move in
    pub fn usable_width(&self) -> f64 {
        (self.width - self.padding_x).max(0.0)
    }
}

/// Scroll state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldScroll {
    /// Total distance scrolled this run (px, never decreases)
    pub scroll_px: f64,
    /// Current scroll speed (px/sec)
    pub speed_px_per_sec: f64,
}

impl WorldScroll {
    pub fn new() -> Self {
        Self {
            scroll_px: 0.0,
            speed_px_per_sec: 0.0,
        }
    }

    /// Scroll speed for a game-speed multiplier
    pub fn set_game_speed(&mut self, game_speed: f64, tuning: &Tuning) {
        self.speed_px_per_sec = (tuning.base_world_speed() * game_speed).max(0.0);
    }

    /// Advance by one frame
    pub fn advance(&mut self, delta_ms: f64) {
        self.scroll_px += self.speed_px_per_sec * (delta_ms / 1000.0);
    }

    /// Screen X of a world tile column
    #[inline]
    pub fn screen_x(&self, tile_x: i64, tile_size: f64) -> f64 {
        tile_x as f64 * tile_size - self.scroll_px
    }
}

impl Default for WorldScroll {
    fn default() -> Self {
        Self::new()
    }
}

/// Tile column where a fresh world starts spawning obstacles
pub fn start_spawn_tile(viewport: &Viewport, tuning: &Tuning) -> i64 {
    (viewport.width / tuning.tile_size).ceil() as i64 + WORLD_START_BUFFER_TILES as i64
}

/// Tiles in one track strip; two strips leapfrog to cover the screen
pub fn tiles_per_strip(viewport: &Viewport, tuning: &Tuning) -> u32 {
    (viewport.width / tuning.tile_size).ceil().max(0.0) as u32 + 3
}

/// Where the host should draw the two track strips
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub strip_width: f64,
    /// Translation of the first strip; the second follows at `+strip_width`
    pub offset: f64,
    /// Seconds per loop of the decorative grid background
    pub grid_scroll_duration: f64,
}

impl TrackLayout {
    pub fn compute(world: &WorldScroll, game_speed: f64, viewport: &Viewport, tuning: &Tuning) -> Self {
        let strip_width = tiles_per_strip(viewport, tuning) as f64 * tuning.tile_size;
        let offset = if strip_width > 0.0 {
            -(world.scroll_px % strip_width)
        } else {
            0.0
        };
        let grid_scroll_duration = if game_speed > 0.0 {
            clamp(tuning.base_grid_scroll_duration / game_speed, 0.2, 30.0)
        } else {
            30.0
        };
        Self {
            strip_width,
            offset,
            grid_scroll_duration,
        }
    }
}

//! Data-driven game balance
//!
//! Every constant the host page may override lives in [`Tuning`]. Values are
//! normalized once, when a run is configured, so the simulation never has to
//! deal with an inconsistent configuration mid-tick.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_JUMP_AREA_FRACTION, MIN_MULTIPLIER_TIER_MS};

/// Game tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Runner ===
    /// Runner body width (px); also the default tile size
    pub runner_width: f64,
    /// Runner body height (px)
    pub runner_height: f64,
    /// Runner's fixed left offset inside the game area (px)
    pub runner_base_left: f64,
    /// Lateral offset the runner starts each run at (px)
    pub runner_start_x: f64,
    /// Lateral speed (px per step)
    pub lateral_speed: f64,
    /// Gravity (px per step²)
    pub gravity: f64,

    // === Jump ===
    /// Height of a tap jump and of a zero-charge jump (px)
    pub min_jump_height: f64,
    /// Height of a fully charged jump; also the ceiling for `y` (px)
    pub max_jump_height: f64,
    /// Hold duration that reaches a full charge (ms)
    pub charge_window_ms: f64,
    /// Pointer holds shorter than this are treated as a tap jump (ms)
    pub tap_threshold_ms: f64,

    // === Obstacles ===
    /// Empty tiles between consecutive obstacles
    pub obstacle_gap_tiles: u32,
    /// Probability that an obstacle hangs from the ceiling
    pub ceiling_obstacle_chance: f64,
    /// Inclusive range of rows the ceiling spike tip may sit at
    pub ceiling_spike_tip_rows: (u32, u32),
    /// Highest the ceiling spike tip may sit above the ground (px)
    pub ceiling_max_offset_px: f64,

    // === World ===
    /// Track tile width (px)
    pub tile_size: f64,
    /// Seconds for the track to scroll one tile at game speed 1
    pub base_track_scroll_duration: f64,
    /// Seconds for one loop of the decorative grid at game speed 1
    pub base_grid_scroll_duration: f64,

    // === Collision ===
    /// Overlap (px) that must be exceeded on every axis to count as a hit
    pub collision_min_overlap: f64,

    // === Difficulty ===
    /// Survival time per multiplier tier (ms)
    pub multiplier_tier_ms: f64,

    // === Particle trail (consumed by the presentation layer) ===
    pub particle_spawn_interval_ms: f64,
    pub particle_lifetime_ms: f64,
    pub particle_max_count: u32,
    pub particle_size_px: f64,
    pub particle_speed_scale: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            runner_width: 40.0,
            runner_height: 40.0,
            runner_base_left: 0.0,
            runner_start_x: 70.0,
            lateral_speed: 5.0,
            gravity: 1.0,

            // Tap vs full charge
            min_jump_height: 100.0,
            max_jump_height: 160.0,
            charge_window_ms: 1000.0,
            tap_threshold_ms: 160.0,

            obstacle_gap_tiles: 5,
            ceiling_obstacle_chance: 0.35,
            ceiling_spike_tip_rows: (3, 4),
            ceiling_max_offset_px: 70.0,

            tile_size: 40.0,
            base_track_scroll_duration: 0.28,
            base_grid_scroll_duration: 1.8,

            collision_min_overlap: 3.0,

            multiplier_tier_ms: crate::consts::MULTIPLIER_TIER_MS,

            particle_spawn_interval_ms: 20.0,
            particle_lifetime_ms: 1100.0,
            particle_max_count: 220,
            particle_size_px: 7.0,
            particle_speed_scale: 0.7,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    ///
    /// Tiles stay as wide as the runner unless `tile_size` is given.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tile_follows_runner = value.get("tile_size").is_none();
        let mut tuning: Self = serde_json::from_value(value)?;
        if tile_follows_runner {
            tuning.tile_size = tuning.runner_width;
        }
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Return a copy with every value forced into a usable range
    ///
    /// `area_height` is the play-area height; jumps are capped to a fraction
    /// of it so the runner stays on screen.
    pub fn normalized(&self, area_height: f64) -> Self {
        let defaults = Self::default();
        let mut t = self.clone();

        positive_or(&mut t.runner_width, defaults.runner_width, "runner_width");
        positive_or(&mut t.runner_height, defaults.runner_height, "runner_height");
        positive_or(&mut t.tile_size, t.runner_width, "tile_size");
        positive_or(&mut t.gravity, defaults.gravity, "gravity");
        positive_or(&mut t.charge_window_ms, defaults.charge_window_ms, "charge_window_ms");
        positive_or(&mut t.multiplier_tier_ms, defaults.multiplier_tier_ms, "multiplier_tier_ms");
        if t.multiplier_tier_ms < MIN_MULTIPLIER_TIER_MS {
            log::warn!(
                "Tuning multiplier_tier_ms = {} is too short, using {}",
                t.multiplier_tier_ms,
                MIN_MULTIPLIER_TIER_MS
            );
            t.multiplier_tier_ms = MIN_MULTIPLIER_TIER_MS;
        }
        positive_or(
            &mut t.base_track_scroll_duration,
            defaults.base_track_scroll_duration,
            "base_track_scroll_duration",
        );
        positive_or(
            &mut t.base_grid_scroll_duration,
            defaults.base_grid_scroll_duration,
            "base_grid_scroll_duration",
        );

        t.lateral_speed = finite_or(t.lateral_speed, defaults.lateral_speed).abs();
        t.runner_base_left = finite_or(t.runner_base_left, defaults.runner_base_left);
        t.runner_start_x = finite_or(t.runner_start_x, defaults.runner_start_x);
        t.tap_threshold_ms = finite_or(t.tap_threshold_ms, defaults.tap_threshold_ms).max(0.0);
        t.collision_min_overlap =
            finite_or(t.collision_min_overlap, defaults.collision_min_overlap).max(0.0);
        t.ceiling_max_offset_px =
            finite_or(t.ceiling_max_offset_px, defaults.ceiling_max_offset_px).max(0.0);
        t.ceiling_obstacle_chance =
            crate::clamp(finite_or(t.ceiling_obstacle_chance, 0.0), 0.0, 1.0);

        let (lo, hi) = t.ceiling_spike_tip_rows;
        if lo > hi {
            t.ceiling_spike_tip_rows = (hi, lo);
        }

        // Jump heights must fit inside the visible play area
        t.max_jump_height = finite_or(t.max_jump_height, defaults.max_jump_height).max(0.0);
        if area_height.is_finite() && area_height > 0.0 {
            t.max_jump_height = t.max_jump_height.min(area_height * MAX_JUMP_AREA_FRACTION);
        }
        t.min_jump_height = finite_or(t.min_jump_height, defaults.min_jump_height).max(0.0);
        if t.min_jump_height > t.max_jump_height {
            log::warn!(
                "min_jump_height {} exceeds max_jump_height {}, clamping",
                t.min_jump_height,
                t.max_jump_height
            );
            t.min_jump_height = t.max_jump_height;
        }

        t
    }

    /// Jump height for a charge ratio (linear between min and max)
    pub fn jump_height_for_ratio(&self, ratio: f64) -> f64 {
        let t = crate::clamp(ratio, 0.0, 1.0);
        crate::lerp(self.min_jump_height, self.max_jump_height, t)
    }

    /// Scroll speed at game speed 1 (px/sec): one tile per track duration
    pub fn base_world_speed(&self) -> f64 {
        self.tile_size / self.base_track_scroll_duration
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn positive_or(value: &mut f64, fallback: f64, name: &str) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("Tuning {} = {} is not positive, using {}", name, value, fallback);
        *value = fallback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_jump_clamped_to_max() {
        let tuning = Tuning {
            min_jump_height: 300.0,
            max_jump_height: 200.0,
            ..Default::default()
        };
        let t = tuning.normalized(1000.0);
        assert_eq!(t.max_jump_height, 200.0);
        assert_eq!(t.min_jump_height, 200.0);
    }

    #[test]
    fn test_max_jump_capped_by_area() {
        let t = Tuning::default().normalized(200.0);
        assert!((t.max_jump_height - 130.0).abs() < 1e-9);
        assert_eq!(t.min_jump_height, 100.0);

        let t = Tuning::default().normalized(100.0);
        assert!((t.max_jump_height - 65.0).abs() < 1e-9);
        assert!((t.min_jump_height - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_values_replaced() {
        let tuning = Tuning {
            tile_size: 0.0,
            runner_width: -4.0,
            gravity: f64::NAN,
            ceiling_obstacle_chance: 3.0,
            ceiling_spike_tip_rows: (5, 2),
            ..Default::default()
        };
        let t = tuning.normalized(400.0);
        assert_eq!(t.runner_width, 40.0);
        assert_eq!(t.tile_size, 40.0);
        assert_eq!(t.gravity, 1.0);
        assert_eq!(t.ceiling_obstacle_chance, 1.0);
        assert_eq!(t.ceiling_spike_tip_rows, (2, 5));
    }

    #[test]
    fn test_jump_height_for_ratio() {
        let t = Tuning::default();
        assert_eq!(t.jump_height_for_ratio(0.0), 100.0);
        assert_eq!(t.jump_height_for_ratio(1.0), 160.0);
        assert_eq!(t.jump_height_for_ratio(0.5), 130.0);
        assert_eq!(t.jump_height_for_ratio(7.0), 160.0);
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{"gravity": 2.0, "obstacle_gap_tiles": 3}"#).unwrap();
        assert_eq!(t.gravity, 2.0);
        assert_eq!(t.obstacle_gap_tiles, 3);
        assert_eq!(t.lateral_speed, 5.0);

        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_tile_size_follows_runner_width() {
        let t = Tuning::from_json(r#"{"runner_width": 30.0}"#).unwrap();
        assert_eq!(t.tile_size, 30.0);

        let t = Tuning::from_json(r#"{"runner_width": 30.0, "tile_size": 50.0}"#).unwrap();
        assert_eq!(t.tile_size, 50.0);
    }

    #[test]
    fn test_tier_floor() {
        let tuning = Tuning {
            multiplier_tier_ms: 1e-6,
            ..Default::default()
        };
        let t = tuning.normalized(400.0);
        assert_eq!(t.multiplier_tier_ms, MIN_MULTIPLIER_TIER_MS);

        let t = Tuning::default().normalized(400.0);
        assert_eq!(t.multiplier_tier_ms, 20_000.0);
    }
}

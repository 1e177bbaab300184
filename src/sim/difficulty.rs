//! Survival clock, score multiplier and speed ramp

use serde::{Deserialize, Serialize};

use crate::clamp;
use crate::consts::*;

/// Tier crossings worth compounding in one update
const MAX_STEPS: u32 = 64;

/// Difficulty progression for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Time survived this run (ms)
    pub survival_ms: f64,
    /// Tiers completed: floor(survival_ms / tier_ms)
    pub level: u32,
    /// Score multiplier: 1 + level * 0.5
    pub multiplier: f64,
    /// World speed multiplier, ×1.25 per tier
    pub game_speed: f64,
}

impl Difficulty {
    pub fn new() -> Self {
        Self {
            survival_ms: 0.0,
            level: 0,
            multiplier: 1.0,
            game_speed: 1.0,
        }
    }

    /// Multiplier tier and value for a survival time
    pub fn multiplier_for(survival_ms: f64, tier_ms: f64) -> (u32, f64) {
        let level = (survival_ms.max(0.0) / tier_ms).floor() as u32;
        (level, 1.0 + level as f64 * MULTIPLIER_PER_LEVEL)
    }

    /// Force the game speed (clamped to the allowed range)
    pub fn set_game_speed(&mut self, speed: f64) {
        self.game_speed = clamp(speed, MIN_GAME_SPEED, MAX_GAME_SPEED);
    }

    /// Accumulate survival time; returns how many tiers were crossed
    ///
    /// A stalled frame may cross several tiers at once; the speed step is
    /// applied once per crossed tier.
    pub fn update(&mut self, delta_ms: f64, tier_ms: f64) -> u32 {
        self.survival_ms += delta_ms;

        let previous = self.level;
        let (level, multiplier) = Self::multiplier_for(self.survival_ms, tier_ms);
        self.level = level;
        self.multiplier = multiplier;

        let crossed = level.saturating_sub(previous);
        if crossed > 0 {
            // Past MAX_STEPS the clamp has long since taken over
            let steps = crossed.min(MAX_STEPS) as i32;
            self.set_game_speed(self.game_speed * SPEED_STEP_FACTOR.powi(steps));
            log::info!(
                "Difficulty tier {} reached: multiplier {}x, speed {:.3}",
                level,
                multiplier,
                self.game_speed
            );
        }
        crossed
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIER: f64 = MULTIPLIER_TIER_MS;

    #[test]
    fn test_multiplier_steps() {
        assert_eq!(Difficulty::multiplier_for(0.0, TIER), (0, 1.0));
        assert_eq!(Difficulty::multiplier_for(19_999.0, TIER), (0, 1.0));
        assert_eq!(Difficulty::multiplier_for(20_000.0, TIER), (1, 1.5));
        assert_eq!(Difficulty::multiplier_for(65_000.0, TIER), (3, 2.5));
    }

    #[test]
    fn test_single_tier_crossing() {
        let mut d = Difficulty::new();
        assert_eq!(d.update(19_990.0, TIER), 0);
        assert_eq!(d.game_speed, 1.0);
        assert_eq!(d.update(16.0, TIER), 1);
        assert_eq!(d.multiplier, 1.5);
        assert_eq!(d.game_speed, 1.25);
    }

    #[test]
    fn test_stalled_frame_crosses_many_tiers() {
        let mut d = Difficulty::new();
        assert_eq!(d.update(3.0 * TIER + 1.0, TIER), 3);
        assert_eq!(d.level, 3);
        assert!((d.game_speed - 1.25f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_tier_crosses_many_at_once() {
        let mut d = Difficulty::new();
        let crossed = d.update(250.0, 1e-6);
        assert!(crossed >= 249_999_999, "crossed = {crossed}");
        assert_eq!(d.level, crossed);
        assert_eq!(d.game_speed, MAX_GAME_SPEED);
    }

    #[test]
    fn test_speed_clamped() {
        let mut d = Difficulty::new();
        d.update(100.0 * TIER, TIER);
        assert_eq!(d.game_speed, MAX_GAME_SPEED);

        d.set_game_speed(0.0);
        assert_eq!(d.game_speed, MIN_GAME_SPEED);
    }
}

//! HUD values derived from the survival clock
//!
//! Pure helpers; the host decides how to show them.

use serde::Serialize;

use crate::consts::TRACK_BLEND_MS;
use crate::{clamp, lerp, lerp_hex_color};

const NEUTRAL_A: &str = "#f0f4ff";
const NEUTRAL_B: &str = "#d6dce6";
const ACTIVE_A: &str = "#eafff4";
const ACTIVE_B: &str = "#6eff9c";

/// Tiers over which the hue sweeps from green to red
const HUE_RAMP_STEPS: u32 = 8;

/// "1", "1.5", "2"
pub fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Survival time as m:ss
pub fn format_time_compact(ms: f64) -> String {
    let total_seconds = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Hue rotation for a multiplier tier
///
/// Tiers 0 and 1 keep the base color, later tiers sweep up to 240°.
pub fn multiplier_hue_rotate_deg(level: u32) -> f64 {
    if level <= 1 {
        return 0.0;
    }
    let progress = clamp((level - 1) as f64 / (HUE_RAMP_STEPS - 1) as f64, 0.0, 1.0);
    progress * 240.0
}

/// How the track should be tinted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackStyle {
    pub color_a: String,
    pub color_b: String,
    /// None until the first blend starts
    pub hue_rotate_deg: Option<f64>,
}

/// Track tint for the current point in the run
///
/// During the last `TRACK_BLEND_MS` of each tier the hue eases toward the
/// next tier's. Before the first tier the colors also fade from neutral to
/// active.
pub fn track_style(survival_ms: f64, level: u32, tier_ms: f64) -> TrackStyle {
    let tier_progress = if tier_ms > 0.0 { survival_ms.max(0.0) % tier_ms } else { 0.0 };
    let blend_start = tier_ms - TRACK_BLEND_MS;
    let t = clamp((tier_progress - blend_start) / TRACK_BLEND_MS, 0.0, 1.0);
    let hue = lerp(
        multiplier_hue_rotate_deg(level),
        multiplier_hue_rotate_deg(level.saturating_add(1)),
        t,
    );

    if level == 0 {
        TrackStyle {
            color_a: lerp_hex_color(NEUTRAL_A, ACTIVE_A, t),
            color_b: lerp_hex_color(NEUTRAL_B, ACTIVE_B, t),
            hue_rotate_deg: (t > 0.0).then_some(hue),
        }
    } else {
        TrackStyle {
            color_a: ACTIVE_A.to_string(),
            color_b: ACTIVE_B.to_string(),
            hue_rotate_deg: Some(hue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MULTIPLIER_TIER_MS;

    #[test]
    fn test_format_multiplier() {
        assert_eq!(format_multiplier(1.0), "1");
        assert_eq!(format_multiplier(1.5), "1.5");
        assert_eq!(format_multiplier(3.0), "3");
    }

    #[test]
    fn test_format_time_compact() {
        assert_eq!(format_time_compact(0.0), "0:00");
        assert_eq!(format_time_compact(7_999.0), "0:07");
        assert_eq!(format_time_compact(65_000.0), "1:05");
        assert_eq!(format_time_compact(-5.0), "0:00");
    }

    #[test]
    fn test_hue_ramp() {
        assert_eq!(multiplier_hue_rotate_deg(0), 0.0);
        assert_eq!(multiplier_hue_rotate_deg(1), 0.0);
        assert!((multiplier_hue_rotate_deg(2) - 240.0 / 7.0).abs() < 1e-9);
        assert_eq!(multiplier_hue_rotate_deg(8), 240.0);
        assert_eq!(multiplier_hue_rotate_deg(50), 240.0);
    }

    #[test]
    fn test_track_neutral_at_start() {
        let style = track_style(0.0, 0, MULTIPLIER_TIER_MS);
        assert_eq!(style.color_a, NEUTRAL_A);
        assert_eq!(style.color_b, NEUTRAL_B);
        assert_eq!(style.hue_rotate_deg, None);
    }

    #[test]
    fn test_track_blends_before_first_tier() {
        let mid = track_style(15_000.0, 0, MULTIPLIER_TIER_MS);
        assert_ne!(mid.color_b, NEUTRAL_B);
        assert_ne!(mid.color_b, ACTIVE_B);
        assert_eq!(mid.hue_rotate_deg, Some(0.0));

        let later = track_style(25_000.0, 1, MULTIPLIER_TIER_MS);
        assert_eq!(later.color_b, ACTIVE_B);
        assert_eq!(later.hue_rotate_deg, Some(0.0));

        // Halfway through the blend toward tier 2
        let blending = track_style(35_000.0, 1, MULTIPLIER_TIER_MS);
        let half = multiplier_hue_rotate_deg(2) / 2.0;
        assert!((blending.hue_rotate_deg.unwrap_or(0.0) - half).abs() < 1e-9);
    }

    #[test]
    fn test_track_style_at_highest_level() {
        let style = track_style(19_000.0, u32::MAX, MULTIPLIER_TIER_MS);
        assert_eq!(style.color_a, ACTIVE_A);
        assert_eq!(style.hue_rotate_deg, Some(240.0));
    }
}

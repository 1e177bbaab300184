//! Spike Runner - A tile-track endless runner simulation core
//!
//! Core modules:
//! - `sim`: Simulation (runner physics, obstacles, collisions, difficulty)
//! - `input`: Input intent reducer and jump-input policies
//! - `tuning`: Data-driven game balance
//! - `hud`: HUD value helpers for the presentation layer
//! - `platform`: Browser bindings for the host page

pub mod hud;
pub mod input;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use input::{InputEvent, InputIntent, JumpPolicy};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length that one physics "step" represents (ms)
    pub const STEP_MS: f64 = 16.0;
    /// Longest frame the simulation will integrate in one tick (ms)
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Survival time per difficulty tier (ms)
    pub const MULTIPLIER_TIER_MS: f64 = 20_000.0;
    /// Shortest tier a tuning override may ask for (ms)
    pub const MIN_MULTIPLIER_TIER_MS: f64 = 1000.0;
    /// Window at the end of a tier over which the track hue blends (ms)
    pub const TRACK_BLEND_MS: f64 = 10_000.0;
    /// Score multiplier gained per tier
    pub const MULTIPLIER_PER_LEVEL: f64 = 0.5;
    /// Game speed factor applied once per crossed tier
    pub const SPEED_STEP_FACTOR: f64 = 1.25;
    /// Game speed limits
    pub const MIN_GAME_SPEED: f64 = 0.25;
    pub const MAX_GAME_SPEED: f64 = 6.0;

    /// Spin applied by every jump (degrees per second)
    pub const JUMP_SPIN_VELOCITY: f64 = 360.0;
    /// Degrees turned by every jump
    pub const JUMP_SPIN_DEGREES: f64 = 180.0;
    /// Remaining spin below which rotation snaps to the target (degrees)
    pub const SPIN_SNAP_DEGREES: f64 = 0.5;

    /// Probability that a ground obstacle is two blocks tall
    pub const TWO_BLOCK_CHANCE: f64 = 0.35;
    /// Tiles spawned ahead of the visible right edge
    pub const SPAWN_LOOKAHEAD_TILES: f64 = 6.0;
    /// Tiles beyond the right edge where a fresh world starts spawning
    pub const WORLD_START_BUFFER_TILES: f64 = 4.0;
    /// Obstacles this many tiles left of the viewport are retired
    pub const RETIRE_TILES: f64 = 4.0;

    /// Fraction of the usable width the runner may roam
    pub const ROAM_WIDTH_FRACTION: f64 = 0.9;
    /// Fraction of the runner width it may hang off the left edge
    pub const LEFT_OVERHANG_FRACTION: f64 = 0.25;
    /// Fraction of the play-area height a jump may reach
    pub const MAX_JUMP_AREA_FRACTION: f64 = 0.65;
    /// Minimum lateral movement that updates the facing direction (px)
    pub const FACING_DEADZONE_PX: f64 = 0.05;
}

/// Clamp `value` into `[min, max]`
///
/// Unlike `f64::clamp` this never panics when `min > max`; `max` wins.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Parse `#rgb` or `#rrggbb` into components
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some((
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

/// Format components as `#rrggbb`
pub fn rgb_to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Interpolate two hex colors channel by channel
///
/// Unparseable inputs fall back to the other color.
pub fn lerp_hex_color(a: &str, b: &str, t: f64) -> String {
    let (ca, cb) = match (hex_to_rgb(a), hex_to_rgb(b)) {
        (Some(ca), Some(cb)) => (ca, cb),
        (Some(c), None) | (None, Some(c)) => (c, c),
        (None, None) => return "#000000".to_string(),
    };
    let t = clamp(t, 0.0, 1.0);
    let channel = |x: u8, y: u8| lerp(x as f64, y as f64, t).round() as u8;
    rgb_to_hex((channel(ca.0, cb.0), channel(ca.1, cb.1), channel(ca.2, cb.2)))
}

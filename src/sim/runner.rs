//! Runner physics: lateral movement, jumps, gravity and spin
//!
//! Physics runs in "steps": one step is a nominal 16 ms frame, so a tick of
//! `delta_ms` advances `delta_ms / 16` steps. Speeds and gravity in
//! [`Tuning`] are per step; spin is in degrees per second.

use serde::{Deserialize, Serialize};

use super::geometry::ground_lift;
use crate::consts::*;
use crate::input::InputIntent;
use crate::tuning::Tuning;
use crate::{clamp, normalize_degrees};

/// Horizontal range the runner may occupy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Bounds for a game area with `usable_width` pixels inside its padding
    pub fn for_area(usable_width: f64, runner_width: f64) -> Self {
        Self {
            min: -runner_width * LEFT_OVERHANG_FRACTION,
            max: (usable_width.max(0.0) * ROAM_WIDTH_FRACTION - runner_width).max(0.0),
        }
    }
}

/// The player's runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    /// Lateral offset from the runner's base position (px)
    pub x: f64,
    /// Height above the ground (px); 0 means grounded
    pub y: f64,
    /// Vertical velocity (px per step, up is positive)
    pub vy: f64,
    /// Rotation in degrees, [0, 360)
    pub rotation: f64,
    /// Spin speed toward `spin_target` (deg/sec); 0 when not spinning
    pub spin_velocity: f64,
    pub spin_target: f64,
    /// Last horizontal direction moved: -1 or 1
    pub facing: i8,
}

impl Runner {
    pub fn new(start_x: f64) -> Self {
        Self {
            x: start_x,
            y: 0.0,
            vy: 0.0,
            rotation: 0.0,
            spin_velocity: 0.0,
            spin_target: 0.0,
            facing: 1,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.y == 0.0
    }

    /// Rotation as drawn: always upright on the ground
    pub fn visual_rotation(&self) -> f64 {
        if self.is_grounded() { 0.0 } else { self.rotation }
    }

    /// Lift applied to keep the rotated body above ground
    pub fn visual_lift(&self, tuning: &Tuning) -> f64 {
        if self.is_grounded() {
            return 0.0;
        }
        ground_lift(tuning.runner_width, tuning.runner_height, self.rotation)
    }

    /// Keep the runner inside new bounds after a layout change
    pub fn clamp_to(&mut self, bounds: &Bounds) {
        self.x = clamp(self.x, bounds.min, bounds.max);
    }
}

/// Launch velocity reaching `height` under `gravity` (v² = 2gh)
#[inline]
pub fn launch_velocity(gravity: f64, height: f64) -> f64 {
    (2.0 * gravity * height).sqrt()
}

/// Start a jump toward `target_height` and begin a half turn
///
/// The height is clamped to `[0, max_jump_height]`. Any charge or queued
/// jump is consumed.
pub fn perform_jump(runner: &mut Runner, input: &mut InputIntent, tuning: &Tuning, target_height: f64) {
    let height = clamp(target_height, 0.0, tuning.max_jump_height);
    runner.vy = launch_velocity(tuning.gravity, height);
    input.clear_charge();

    runner.spin_velocity = JUMP_SPIN_VELOCITY;
    runner.spin_target = normalize_degrees(runner.rotation + JUMP_SPIN_DEGREES);
    log::trace!("Jump: height={:.1} vy={:.3}", height, runner.vy);
}

/// Jump now if a released charge is waiting and the runner is grounded
///
/// Returns true if a jump started.
pub fn process_jump_queue(runner: &mut Runner, input: &mut InputIntent, tuning: &Tuning) -> bool {
    if !input.jump_queued || !runner.is_grounded() {
        return false;
    }
    let height = tuning.jump_height_for_ratio(input.charge_ratio);
    perform_jump(runner, input, tuning, height);
    true
}

/// Move left/right from held directions, clamped to `bounds`
pub fn apply_lateral_movement(
    runner: &mut Runner,
    input: &InputIntent,
    bounds: &Bounds,
    tuning: &Tuning,
    step: f64,
) {
    let prev_x = runner.x;
    let mut target_vx = 0.0;

    if input.left && runner.x > bounds.min {
        target_vx -= tuning.lateral_speed;
    }
    if input.right && runner.x < bounds.max {
        target_vx += tuning.lateral_speed;
    }

    runner.x = clamp(runner.x + target_vx * step, bounds.min, bounds.max);

    let dx = runner.x - prev_x;
    if dx > FACING_DEADZONE_PX {
        runner.facing = 1;
    } else if dx < -FACING_DEADZONE_PX {
        runner.facing = -1;
    }
}

/// Integrate gravity; landing stops dead with no bounce
pub fn apply_vertical_movement(runner: &mut Runner, tuning: &Tuning, step: f64) {
    if runner.y > 0.0 || runner.vy != 0.0 {
        runner.vy -= tuning.gravity * step;
    }

    runner.y = clamp(runner.y + runner.vy * step, 0.0, tuning.max_jump_height);

    if runner.y == 0.0 && runner.vy < 0.0 {
        runner.vy = 0.0;
    }
}

/// Turn toward the spin target while airborne; settle upright on the ground
pub fn update_spin(runner: &mut Runner, elapsed_secs: f64) {
    if runner.spin_velocity != 0.0 && runner.y > 0.0 {
        let remaining = runner.spin_target - runner.rotation;

        if remaining.abs() < SPIN_SNAP_DEGREES {
            finish_spin(runner);
            return;
        }

        let direction = remaining.signum();
        let delta_rot = direction * runner.spin_velocity * elapsed_secs;

        if delta_rot.abs() >= remaining.abs() {
            finish_spin(runner);
            return;
        }

        runner.rotation = normalize_degrees(runner.rotation + delta_rot);
        return;
    }

    if runner.y == 0.0 {
        runner.rotation = 0.0;
        runner.spin_velocity = 0.0;
        runner.spin_target = 0.0;
    }
}

fn finish_spin(runner: &mut Runner) {
    runner.rotation = runner.spin_target;
    runner.spin_velocity = 0.0;
}

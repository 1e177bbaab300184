//! Read-only view of the game for the presentation layer
//!
//! The host never reaches into [`GameState`]; it draws from a snapshot taken
//! after each tick.

use serde::Serialize;

use super::collision::{CollisionHit, runner_left};
use super::obstacles::Obstacle;
use super::state::{GamePhase, GameState};
use super::world::TrackLayout;

/// Runner as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerView {
    /// Left edge on screen, before rotation
    pub left: f64,
    /// Height above the ground
    pub y: f64,
    /// Clockwise rotation in degrees; 0 on the ground
    pub rotation: f64,
    /// Extra height keeping the rotated body above ground
    pub lift: f64,
    pub facing: i8,
    pub width: f64,
    pub height: f64,
    pub charging: bool,
    pub charge_ratio: f64,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub runner: RunnerView,
    pub world_scroll: f64,
    pub track: TrackLayout,
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub survival_ms: f64,
    pub multiplier: f64,
    pub multiplier_level: u32,
    pub game_speed: f64,
    pub last_crash: Option<CollisionHit>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let runner = &state.runner;
        let tuning = &state.tuning;

        Self {
            phase: state.phase,
            runner: RunnerView {
                left: runner_left(runner, tuning),
                y: runner.y,
                rotation: runner.visual_rotation(),
                lift: runner.visual_lift(tuning),
                facing: runner.facing,
                width: tuning.runner_width,
                height: tuning.runner_height,
                charging: state.input.charging,
                charge_ratio: state.input.charge_ratio,
            },
            world_scroll: state.world.scroll_px,
            track: TrackLayout::compute(&state.world, state.difficulty.game_speed, &state.viewport, tuning),
            obstacles: state.obstacles.iter().cloned().collect(),
            score: state.score,
            survival_ms: state.difficulty.survival_ms,
            multiplier: state.difficulty.multiplier,
            multiplier_level: state.difficulty.level,
            game_speed: state.difficulty.game_speed,
            last_crash: state.last_crash,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

//! Game state and run lifecycle types
//!
//! One [`GameState`] owns everything about the current run. Starting a new
//! run resets it in place; nothing is shared between runs.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionHit, runner_left};
use super::difficulty::Difficulty;
use super::obstacles::{Obstacle, ObstacleField};
use super::runner::{Bounds, Runner, perform_jump, process_jump_queue};
use super::snapshot::RenderSnapshot;
use super::world::{Viewport, WorldScroll};
use crate::input::{self, InputEvent, InputIntent, JumpAction, JumpPolicy, ReduceContext};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first run
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Stopped by the host (blur, start menu); progress kept for display
    Paused,
    /// Run ended on an obstacle
    Crashed,
}

/// Why a run is being stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Crashed,
    Paused,
}

impl StopReason {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crashed" | "crash" => Some(StopReason::Crashed),
            "paused" | "pause" => Some(StopReason::Paused),
            _ => None,
        }
    }
}

/// Events produced by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickEvents {
    /// Obstacles passed this tick
    pub scored: u32,
    /// Difficulty tiers crossed this tick
    pub tiers_crossed: u32,
    /// Set when the tick ended the run
    pub crash: Option<CollisionHit>,
}

/// Complete state of the game and its current run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Base seed; each run derives its own stream from it
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Tuning as supplied by the host
    pub(crate) base_tuning: Tuning,
    /// Tuning normalized for the current viewport
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub bounds: Bounds,
    pub policy: JumpPolicy,
    pub phase: GamePhase,
    pub runner: Runner,
    pub input: InputIntent,
    pub world: WorldScroll,
    pub obstacles: ObstacleField,
    pub difficulty: Difficulty,
    pub score: u64,
    /// Host clock (ms) as of the latest tick; input timestamps share it
    pub clock_ms: f64,
    /// Timestamp of the previous frame callback
    pub(crate) last_frame: Option<f64>,
    /// Ticks simulated this run
    pub time_ticks: u64,
    /// Runs started so far
    pub runs: u32,
    /// What ended the last run
    pub last_crash: Option<CollisionHit>,
}

impl GameState {
    /// Create a game with default tuning and viewport
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Viewport::default())
    }

    /// Create a game with host-supplied tuning and layout
    pub fn with_config(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let normalized = tuning.normalized(viewport.height);
        let bounds = Bounds::for_area(viewport.usable_width(), normalized.runner_width);
        let mut runner = Runner::new(normalized.runner_start_x);
        runner.clamp_to(&bounds);

        let mut world = WorldScroll::new();
        world.set_game_speed(1.0, &normalized);
        let mut obstacles = ObstacleField::new();
        obstacles.reset(&viewport, &normalized);

        Self {
            seed,
            rng: run_rng(seed, 0),
            base_tuning: tuning,
            tuning: normalized,
            viewport,
            bounds,
            policy: JumpPolicy::default(),
            phase: GamePhase::Idle,
            runner,
            input: InputIntent::default(),
            world,
            obstacles,
            difficulty: Difficulty::new(),
            score: 0,
            clock_ms: 0.0,
            last_frame: None,
            time_ticks: 0,
            runs: 0,
            last_crash: None,
        }
    }

    /// Swap in new tuning; applies from the next run, except layout limits
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.base_tuning = tuning;
        self.apply_layout();
    }

    /// React to a resized game area
    ///
    /// Bounds and jump limits follow immediately. When no run is active the
    /// world and spawn cursor are rebuilt for the new width; a live run keeps
    /// its scroll so obstacles do not jump.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.apply_layout();
        if self.phase != GamePhase::Running {
            self.reset_world();
        }
    }

    fn apply_layout(&mut self) {
        self.tuning = self.base_tuning.normalized(self.viewport.height);
        self.bounds = Bounds::for_area(self.viewport.usable_width(), self.tuning.runner_width);
        self.runner.clamp_to(&self.bounds);
        self.world.set_game_speed(self.difficulty.game_speed, &self.tuning);
    }

    /// Rewind the scroll and the spawn cursor
    pub(crate) fn reset_world(&mut self) {
        self.world.scroll_px = 0.0;
        self.obstacles.reset(&self.viewport, &self.tuning);
    }

    /// Fresh run state; used by `start_run`
    pub(crate) fn reset_run(&mut self) {
        self.input.reset_directional();
        self.runner = Runner::new(self.tuning.runner_start_x);
        self.runner.clamp_to(&self.bounds);
        self.score = 0;
        self.difficulty = Difficulty::new();
        self.difficulty.set_game_speed(1.0);
        self.world.set_game_speed(self.difficulty.game_speed, &self.tuning);
        self.reset_world();
        self.rng = run_rng(self.seed, self.runs);
        self.time_ticks = 0;
        self.last_frame = None;
        self.last_crash = None;
    }

    // === Accessors ===

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn runner_left(&self) -> f64 {
        runner_left(&self.runner, &self.tuning)
    }

    pub fn world_scroll(&self) -> f64 {
        self.world.scroll_px
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn survival_ms(&self) -> f64 {
        self.difficulty.survival_ms
    }

    pub fn multiplier(&self) -> f64 {
        self.difficulty.multiplier
    }

    pub fn game_speed(&self) -> f64 {
        self.difficulty.game_speed
    }

    /// Everything the presentation layer draws this frame
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }

    // === Input ===

    fn reduce_context(&self) -> ReduceContext {
        ReduceContext {
            policy: self.policy,
            grounded: self.runner.is_grounded(),
            charge_window_ms: self.tuning.charge_window_ms,
            tap_threshold_ms: self.tuning.tap_threshold_ms,
            tap_jump_height: self.tuning.min_jump_height,
        }
    }

    pub fn set_left(&mut self, held: bool) {
        self.input.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.input.right = held;
    }

    /// Start charging a jump (ignored mid-air or while already charging)
    pub fn begin_charge(&mut self, timestamp: f64) -> bool {
        self.input.begin_charge(timestamp, self.runner.is_grounded())
    }

    /// Release the jump control
    ///
    /// Under the unified policy a release shortly after the press is a tap
    /// and gives the fixed jump; otherwise the charge is queued and fires on
    /// the ground.
    pub fn release_charge(&mut self, timestamp: f64) {
        let cx = self.reduce_context();
        let allow_tap = self.policy == JumpPolicy::Unified;
        if let Some(action) = input::release_charge(&mut self.input, timestamp, &cx, allow_tap) {
            self.apply_jump(action);
        }
    }

    /// Jump to `height` right away if grounded and not charging
    pub fn trigger_fixed_jump(&mut self, height: f64) -> bool {
        self.apply_jump(JumpAction::Fixed(height))
    }

    /// Feed one decoded host event through the input reducer
    ///
    /// Control events start a run when none is active, before the event
    /// itself is applied.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if !self.is_running() && event.starts_run(self.policy) {
            super::tick::start_run(self);
        }
        let cx = self.reduce_context();
        if let Some(action) = input::reduce(&mut self.input, event, &cx) {
            self.apply_jump(action);
        }
    }

    fn apply_jump(&mut self, action: JumpAction) -> bool {
        if !self.is_running() {
            return false;
        }
        match action {
            JumpAction::Fixed(height) => {
                if !self.runner.is_grounded() || self.input.charging {
                    return false;
                }
                perform_jump(&mut self.runner, &mut self.input, &self.tuning, height);
                true
            }
            JumpAction::FlushQueue => process_jump_queue(&mut self.runner, &mut self.input, &self.tuning),
        }
    }
}

/// RNG for the `run`-th run of a seed
fn run_rng(seed: u64, run: u32) -> Pcg32 {
    let run_seed = seed ^ (run as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    Pcg32::seed_from_u64(run_seed)
}

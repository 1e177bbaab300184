//! Per-frame simulation tick and run lifecycle
//!
//! Variable timestep: the host reports the real time between frames and
//! every subsystem scales by it, so the game plays at the same speed at any
//! refresh rate.

use super::collision::check_obstacle_collisions;
use super::runner::{apply_lateral_movement, apply_vertical_movement, process_jump_queue, update_spin};
use super::state::{GamePhase, GameState, StopReason, TickEvents};
use crate::consts::*;

/// Advance the running game by `delta_ms` of host time
///
/// Does nothing unless a run is active. Non-finite or non-positive deltas
/// are ignored; long stalls are capped at `MAX_FRAME_MS` so obstacles cannot
/// tunnel through the runner.
pub fn tick(state: &mut GameState, delta_ms: f64) -> TickEvents {
    if !valid_delta(delta_ms) {
        return TickEvents::default();
    }
    state.clock_ms += delta_ms;
    step(state, delta_ms)
}

/// Frame callback: derive the delta from the host timestamp and tick
///
/// The first frame of a run only records the timestamp.
pub fn frame(state: &mut GameState, now_ms: f64) -> TickEvents {
    if !now_ms.is_finite() {
        return TickEvents::default();
    }
    let delta = state.last_frame.map(|last| now_ms - last).unwrap_or(0.0);
    state.last_frame = Some(now_ms);
    state.clock_ms = now_ms;

    if !valid_delta(delta) {
        return TickEvents::default();
    }
    step(state, delta)
}

#[inline]
fn valid_delta(delta_ms: f64) -> bool {
    delta_ms.is_finite() && delta_ms > 0.0
}

fn step(state: &mut GameState, delta_ms: f64) -> TickEvents {
    let mut events = TickEvents::default();
    if state.phase != GamePhase::Running {
        return events;
    }

    // A held charge counts real time, physics the capped step
    state
        .input
        .advance_charge(delta_ms, state.tuning.charge_window_ms);
    let delta_ms = delta_ms.min(MAX_FRAME_MS);
    let steps = delta_ms / STEP_MS;
    state.time_ticks += 1;

    // Runner
    apply_lateral_movement(&mut state.runner, &state.input, &state.bounds, &state.tuning, steps);
    process_jump_queue(&mut state.runner, &mut state.input, &state.tuning);
    apply_vertical_movement(&mut state.runner, &state.tuning, steps);
    update_spin(&mut state.runner, delta_ms / 1000.0);

    // World and obstacles
    state.world.advance(delta_ms);
    let runner_left = state.runner_left();
    events.scored = state.obstacles.update(
        &state.world,
        &state.viewport,
        runner_left,
        &state.tuning,
        &mut state.rng,
    );
    state.score += events.scored as u64;

    if let Some(hit) = check_obstacle_collisions(&state.runner, state.obstacles.iter(), &state.tuning) {
        log::info!(
            "Crashed into obstacle {} ({:?}) after {:.1}s, score {}",
            hit.obstacle_id,
            hit.shape,
            state.difficulty.survival_ms / 1000.0,
            state.score
        );
        state.last_crash = Some(hit);
        stop_run(state, StopReason::Crashed);
        events.crash = Some(hit);
        return events;
    }

    // Difficulty
    events.tiers_crossed = state
        .difficulty
        .update(delta_ms, state.tuning.multiplier_tier_ms);
    if events.tiers_crossed > 0 {
        state
            .world
            .set_game_speed(state.difficulty.game_speed, &state.tuning);
    }

    events
}

/// Begin a fresh run; no-op while one is already running
///
/// Works from Idle, Crashed and Paused alike: runner, input, score,
/// difficulty, world and obstacles are all reset.
pub fn start_run(state: &mut GameState) -> bool {
    if state.phase == GamePhase::Running {
        return false;
    }
    state.reset_run();
    state.runs += 1;
    state.phase = GamePhase::Running;
    log::info!("Run {} started (seed {})", state.runs, state.seed);
    true
}

/// End the current run; no-op unless running
///
/// A crash clears the track. A pause keeps score, survival time and the
/// frozen obstacles for display and only drops held controls.
pub fn stop_run(state: &mut GameState, reason: StopReason) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    state.input.reset_directional();
    state.last_frame = None;
    match reason {
        StopReason::Crashed => {
            state.obstacles.clear();
            state.phase = GamePhase::Crashed;
        }
        StopReason::Paused => {
            state.phase = GamePhase::Paused;
        }
    }
    log::debug!("Run stopped: {:?}", reason);
    true
}

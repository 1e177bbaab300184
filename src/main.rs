//! Spike Runner entry point
//!
//! On the web the host page drives `WebRunner`; this only installs logging.
//! Natively it plays a few headless runs with a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    spike_runner::platform::web::init_logging();
    log::info!("Spike Runner wasm module loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(spike_runner::platform::default_seed);
    log::info!("Spike Runner (native) starting, seed {}", seed);

    let mut state = spike_runner::sim::GameState::new(seed);
    for _ in 0..3 {
        autopilot::play_run(&mut state, 120_000.0);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use spike_runner::sim::{GamePhase, GameState, ObstacleVariant, start_run, tick};

    /// Distance to a ground obstacle at which the autopilot jumps (px)
    const JUMP_GAP_PX: f64 = 30.0;
    /// Where the runner returns to between obstacles
    const HOME_X: f64 = 70.0;

    /// Play one run for at most `limit_ms` of simulated time
    pub fn play_run(state: &mut GameState, limit_ms: f64) {
        start_run(state);
        // 60 Hz with a little jitter, like a real display
        let deltas = [16.0, 17.0, 16.5, 17.5];
        let mut frame = 0;

        while state.phase == GamePhase::Running && state.survival_ms() < limit_ms {
            steer(state);
            tick(state, deltas[frame % deltas.len()]);
            frame += 1;
        }

        let outcome = match state.last_crash {
            Some(hit) => format!("crashed into {:?}", hit.shape),
            None => "survived".to_string(),
        };
        log::info!(
            "Run {} {}: score {}, {:.1}s, multiplier {}x, speed {:.2}",
            state.runs,
            outcome,
            state.score,
            state.survival_ms() / 1000.0,
            state.multiplier(),
            state.game_speed()
        );
    }

    fn steer(state: &mut GameState) {
        let width = state.tuning.runner_width;
        let left = state.runner_left();
        let right = left + width;

        // Nearest ground obstacle the runner has not cleared yet
        let threat = state
            .obstacles()
            .filter(|o| o.variant != ObstacleVariant::Ceiling)
            .filter(|o| o.bounds().max.x > left)
            .map(|o| o.screen_x)
            .reduce(f64::min);

        if state.runner.is_grounded() {
            if let Some(x) = threat.filter(|x| *x - right < JUMP_GAP_PX) {
                log::debug!("Autopilot jump, obstacle {:.1}px ahead", x - right);
                let height = state.tuning.max_jump_height;
                state.trigger_fixed_jump(height);
            }
            // Drift back home between obstacles
            state.set_right(state.runner.x < HOME_X - 2.0);
            state.set_left(state.runner.x > HOME_X + 2.0);
        } else {
            // Carry over the obstacle, then stop pushing
            state.set_left(false);
            state.set_right(threat.is_some_and(|x| x < right + JUMP_GAP_PX));
        }
    }
}

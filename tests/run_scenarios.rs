//! End-to-end runs through the public API

use spike_runner::input::{InputEvent, JumpPolicy, Key, PointerZone};
use spike_runner::sim::{
    GamePhase, GameState, HitShape, ObstacleField, ObstacleVariant, StopReason, Viewport, WorldScroll, frame,
    start_run, stop_run, tick,
};
use spike_runner::tuning::Tuning;

/// Only ceiling obstacles, hung well above the runner
fn ceiling_only() -> Tuning {
    Tuning {
        ceiling_obstacle_chance: 1.0,
        ceiling_max_offset_px: 1000.0,
        ..Default::default()
    }
}

fn running(seed: u64, tuning: Tuning) -> GameState {
    let mut state = GameState::with_config(seed, tuning, Viewport::default());
    assert!(start_run(&mut state));
    state
}

#[test]
fn test_first_tier_after_twenty_seconds() {
    let mut state = running(11, ceiling_only());
    for _ in 0..1249 {
        tick(&mut state, 16.0);
    }
    assert_eq!(state.multiplier(), 1.0);
    assert_eq!(state.game_speed(), 1.0);

    tick(&mut state, 16.0);
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.survival_ms(), 20_000.0);
    assert_eq!(state.multiplier(), 1.5);
    assert_eq!(state.game_speed(), 1.25);
}

#[test]
fn test_obstacles_score_and_respect_spacing() {
    let mut state = running(5, ceiling_only());
    let mut tiles = Vec::new();
    for _ in 0..3000 {
        tick(&mut state, 16.0);
        for o in state.obstacles() {
            if tiles.last().is_none_or(|&last| o.tile_x > last) {
                tiles.push(o.tile_x);
            }
        }
    }
    assert_eq!(state.phase, GamePhase::Running);
    assert!(state.score > 5, "score = {}", state.score);
    let stride = 1 + state.tuning.obstacle_gap_tiles as i64;
    for pair in tiles.windows(2) {
        assert_eq!(pair[1] - pair[0], stride);
    }
}

#[test]
fn test_score_independent_of_frame_pacing() {
    let tuning = Tuning::default();
    let viewport = Viewport::default();
    let run = |deltas: &[f64]| {
        let mut field = ObstacleField::new();
        field.reset(&viewport, &tuning);
        let mut world = WorldScroll::new();
        world.set_game_speed(1.0, &tuning);
        for tile in [3, 9, 15, 21] {
            field.spawn_at(tile, ObstacleVariant::Ground1, 0, &world, &tuning);
        }
        let mut score = 0;
        let mut elapsed = 0.0;
        let mut i = 0;
        while elapsed < 8000.0 {
            let delta = deltas[i % deltas.len()];
            world.advance(delta);
            score += field.advance(&world, 70.0, &tuning);
            elapsed += delta;
            i += 1;
        }
        score
    };

    let uniform = run(&[16.0]);
    let irregular = run(&[3.0, 41.0, 16.0, 9.5, 100.0, 7.0]);
    assert_eq!(uniform, 4);
    assert_eq!(uniform, irregular);
}

#[test]
fn test_tap_gives_fixed_jump_not_charge() {
    let mut state = running(2, ceiling_only());
    state.handle_event(&InputEvent::PointerDown {
        pointer_id: 7,
        zone: PointerZone::Center,
        timestamp: 100.0,
    });
    assert!(state.input.charging);
    state.handle_event(&InputEvent::PointerUp {
        pointer_id: 7,
        timestamp: 200.0,
    });
    assert!(!state.input.charging);
    assert!(!state.input.jump_queued);
    assert!((state.runner.vy - (2.0 * state.tuning.min_jump_height).sqrt()).abs() < 1e-9);
}

#[test]
fn test_split_controls() {
    let mut state = running(2, ceiling_only());
    state.policy = JumpPolicy::Split;

    // Space jumps immediately, no charge
    state.handle_event(&InputEvent::KeyDown {
        key: Key::Space,
        repeat: false,
        timestamp: 0.0,
    });
    assert!(state.runner.vy > 0.0);
    assert!(!state.input.charging);

    // ArrowUp mid-air cannot charge
    tick(&mut state, 16.0);
    state.handle_event(&InputEvent::KeyDown {
        key: Key::Up,
        repeat: false,
        timestamp: 16.0,
    });
    assert!(!state.input.charging);
}

#[test]
fn test_control_key_starts_run() {
    let mut state = GameState::new(8);
    state.handle_event(&InputEvent::KeyDown {
        key: Key::Other,
        repeat: false,
        timestamp: 0.0,
    });
    assert_eq!(state.phase, GamePhase::Idle);

    state.handle_event(&InputEvent::KeyDown {
        key: Key::Left,
        repeat: false,
        timestamp: 0.0,
    });
    assert_eq!(state.phase, GamePhase::Running);
    assert!(state.input.left);
}

#[test]
fn test_block_under_runner_crashes() {
    let mut state = running(3, Tuning::default());
    let tuning = state.tuning.clone();
    state
        .obstacles
        .spawn_at(2, ObstacleVariant::Ground2, 0, &state.world, &tuning);

    let events = tick(&mut state, 16.0);
    let hit = events.crash.expect("crash");
    assert_eq!(hit.shape, HitShape::Base);
    assert_eq!(state.phase, GamePhase::Crashed);

    // A second stop changes nothing
    let snapshot = state.snapshot();
    assert!(!stop_run(&mut state, StopReason::Crashed));
    assert_eq!(state.snapshot(), snapshot);

    // Restart from a crash
    assert!(start_run(&mut state));
    assert_eq!(state.score, 0);
    assert_eq!(state.last_crash, None);
}

#[test]
fn test_blur_drops_held_direction() {
    let mut state = running(4, ceiling_only());
    state.handle_event(&InputEvent::KeyDown {
        key: Key::Right,
        repeat: false,
        timestamp: 0.0,
    });
    tick(&mut state, 16.0);
    let x = state.runner.x;
    assert!(x > 70.0);

    state.handle_event(&InputEvent::Blur);
    tick(&mut state, 16.0);
    assert_eq!(state.runner.x, x);
    assert_eq!(state.phase, GamePhase::Running);
}

#[test]
fn test_frame_loop_matches_tick_loop() {
    let mut by_tick = running(21, ceiling_only());
    let mut by_frame = running(21, ceiling_only());

    frame(&mut by_frame, 5000.0);
    let mut now = 5000.0;
    for i in 0..500 {
        let delta = if i % 2 == 0 { 16.0 } else { 18.0 };
        tick(&mut by_tick, delta);
        now += delta;
        frame(&mut by_frame, now);
    }
    assert_eq!(by_tick.score, by_frame.score);
    assert_eq!(by_tick.world_scroll(), by_frame.world_scroll());
    assert_eq!(by_tick.survival_ms(), by_frame.survival_ms());
}

#[test]
fn test_same_seed_same_run() {
    let play = |seed| {
        let mut state = running(seed, Tuning::default());
        for _ in 0..4000 {
            tick(&mut state, 16.0);
            if !state.is_running() {
                break;
            }
        }
        let tiles: Vec<_> = state.obstacles().map(|o| (o.tile_x, o.variant, o.tile_y)).collect();
        (state.score, state.time_ticks, tiles, state.last_crash)
    };
    assert_eq!(play(77), play(77));
}

#[test]
fn test_tiny_tier_override_is_floored() {
    let tuning = Tuning {
        multiplier_tier_ms: 1e-6,
        ..ceiling_only()
    };
    let mut state = running(6, tuning);
    let mut crossed = 0;
    for _ in 0..125 {
        crossed += tick(&mut state, 16.0).tiers_crossed;
    }
    // 2000 ms at the 1000 ms floor
    assert_eq!(crossed, 2);
    assert_eq!(state.multiplier(), 2.0);
    assert!((state.game_speed() - 1.5625).abs() < 1e-12);
}

#[test]
fn test_pause_twice_keeps_state() {
    let mut state = running(12, ceiling_only());
    for _ in 0..300 {
        tick(&mut state, 16.0);
    }
    assert!(stop_run(&mut state, StopReason::Paused));
    let snapshot = state.snapshot();
    assert!(!stop_run(&mut state, StopReason::Paused));
    assert_eq!(state.snapshot(), snapshot);
    assert_eq!(state.phase, GamePhase::Paused);
}

//! Browser bindings
//!
//! `WebRunner` mirrors the `sim` API for the host page. The page owns the
//! DOM, the animation frame loop and raw event listeners; it forwards
//! decoded values here and draws from `snapshot_json()`.

use std::sync::Once;

use wasm_bindgen::prelude::*;

use crate::hud;
use crate::input::{InputEvent, JumpPolicy, Key, PointerZone};
use crate::sim::{self, GameState, StopReason, Viewport};
use crate::tuning::Tuning;

static LOGGER: Once = Once::new();

/// Install the panic hook and console logger (safe to call repeatedly)
pub fn init_logging() {
    LOGGER.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }
    });
}

/// Current `performance.now()`, falling back to the wall clock
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[wasm_bindgen]
pub struct WebRunner {
    state: GameState,
}

#[wasm_bindgen]
impl WebRunner {
    /// Create a game for a play area of the given size
    ///
    /// `tuning_json` may override any tunable; unreadable JSON is logged and
    /// the defaults are used.
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>, width: f64, height: f64, padding_x: f64) -> WebRunner {
        init_logging();

        let tuning = match tuning_json.as_deref() {
            Some(json) => Tuning::from_json(json).unwrap_or_else(|e| {
                log::warn!("Failed to parse tuning, using defaults: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };
        let viewport = Viewport {
            width,
            height,
            padding_x,
        };
        let seed = super::default_seed();
        log::info!("Spike Runner ready (seed {})", seed);

        WebRunner {
            state: GameState::with_config(seed, tuning, viewport),
        }
    }

    /// Choose the jump scheme: split puts the fixed jump on Space and the
    /// charge on ArrowUp
    pub fn set_split_controls(&mut self, split: bool) {
        self.state.policy = if split {
            JumpPolicy::Split
        } else {
            JumpPolicy::Unified
        };
    }

    pub fn set_viewport(&mut self, width: f64, height: f64, padding_x: f64) {
        self.state.set_viewport(Viewport {
            width,
            height,
            padding_x,
        });
    }

    // === Loop ===

    pub fn start_run(&mut self) -> bool {
        sim::start_run(&mut self.state)
    }

    /// Stop with "crashed" or "paused"; anything else pauses
    pub fn stop_run(&mut self, reason: &str) -> bool {
        let reason = StopReason::parse(reason).unwrap_or_else(|| {
            log::warn!("Unknown stop reason {:?}, pausing", reason);
            StopReason::Paused
        });
        sim::stop_run(&mut self.state, reason)
    }

    /// Advance by an explicit delta (ms); returns true if the run crashed
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        sim::tick(&mut self.state, delta_ms).crash.is_some()
    }

    /// Animation frame callback with its timestamp; returns true on crash
    pub fn frame(&mut self, now_ms: f64) -> bool {
        sim::frame(&mut self.state, now_ms).crash.is_some()
    }

    /// Animation frame using `performance.now()`
    pub fn frame_now(&mut self) -> bool {
        self.frame(now_ms())
    }

    // === Raw events ===

    pub fn key_down(&mut self, code: &str, key: &str, repeat: bool, timestamp: f64) -> bool {
        let key = Key::from_dom(code, key);
        self.state.handle_event(&InputEvent::KeyDown {
            key,
            repeat,
            timestamp,
        });
        // Tell the page whether to preventDefault
        key.is_control(self.state.policy)
    }

    pub fn key_up(&mut self, code: &str, key: &str, timestamp: f64) -> bool {
        let key = Key::from_dom(code, key);
        self.state.handle_event(&InputEvent::KeyUp { key, timestamp });
        key.is_control(self.state.policy)
    }

    /// Pointer pressed at `x` inside a game area `width` pixels wide
    pub fn pointer_down(&mut self, pointer_id: i32, x: f64, width: f64, timestamp: f64) {
        self.state.handle_event(&InputEvent::PointerDown {
            pointer_id,
            zone: PointerZone::from_position(x, width),
            timestamp,
        });
    }

    /// Pointer released or cancelled
    pub fn pointer_up(&mut self, pointer_id: i32, timestamp: f64) {
        self.state
            .handle_event(&InputEvent::PointerUp { pointer_id, timestamp });
    }

    /// Window blur or tab hidden
    pub fn blur(&mut self) {
        self.state.handle_event(&InputEvent::Blur);
    }

    // === Direct input ===

    pub fn set_left(&mut self, held: bool) {
        self.state.set_left(held);
    }

    pub fn set_right(&mut self, held: bool) {
        self.state.set_right(held);
    }

    pub fn begin_charge(&mut self, timestamp: f64) -> bool {
        self.state.begin_charge(timestamp)
    }

    pub fn release_charge(&mut self, timestamp: f64) {
        self.state.release_charge(timestamp);
    }

    pub fn trigger_fixed_jump(&mut self, height: f64) -> bool {
        self.state.trigger_fixed_jump(height)
    }

    // === Accessors ===

    /// Full render snapshot as JSON ("{}" if it cannot be encoded)
    pub fn snapshot_json(&self) -> String {
        self.state.snapshot().to_json().unwrap_or_else(|e| {
            log::warn!("Failed to encode snapshot: {}", e);
            "{}".to_string()
        })
    }

    /// Normalized tuning in effect, including the particle-trail values the
    /// page uses for cosmetics
    pub fn tuning_json(&self) -> String {
        self.state.tuning.to_json().unwrap_or_else(|e| {
            log::warn!("Failed to encode tuning: {}", e);
            "{}".to_string()
        })
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.state.phase).to_lowercase()
    }

    pub fn score(&self) -> f64 {
        self.state.score as f64
    }

    pub fn survival_ms(&self) -> f64 {
        self.state.survival_ms()
    }

    pub fn multiplier(&self) -> f64 {
        self.state.multiplier()
    }

    pub fn game_speed(&self) -> f64 {
        self.state.game_speed()
    }

    pub fn world_scroll(&self) -> f64 {
        self.state.world_scroll()
    }

    // === HUD ===

    pub fn multiplier_text(&self) -> String {
        hud::format_multiplier(self.state.multiplier())
    }

    pub fn time_text(&self) -> String {
        hud::format_time_compact(self.state.survival_ms())
    }

    pub fn multiplier_hue_deg(&self) -> f64 {
        hud::multiplier_hue_rotate_deg(self.state.difficulty.level)
    }

    /// Track colors and hue filter as JSON
    pub fn track_style_json(&self) -> String {
        let style = hud::track_style(
            self.state.survival_ms(),
            self.state.difficulty.level,
            self.state.tuning.multiplier_tier_ms,
        );
        serde_json::to_string(&style).unwrap_or_else(|e| {
            log::warn!("Failed to encode track style: {}", e);
            "{}".to_string()
        })
    }
}

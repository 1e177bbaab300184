//! Input intent and the event reducer
//!
//! The host page turns raw keyboard/pointer events into [`InputEvent`]s.
//! [`reduce`] maps each one onto a transition of [`InputIntent`]; the
//! simulation reads the intent once per tick and never sees an event.
//!
//! Two jump schemes exist and are kept side by side as [`JumpPolicy`]
//! variants:
//! - `Unified`: Space taps for a small jump, holds to charge, releases to jump
//! - `Split`: Space always does the fixed jump, ArrowUp holds to charge
//!
//! Pointer input is the same under both: left third moves left, right third
//! moves right, center taps or holds to jump.

use serde::{Deserialize, Serialize};

/// Which keys drive the jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPolicy {
    #[default]
    Unified,
    Split,
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Space,
    Up,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent` (`code`, `key`) pair
    pub fn from_dom(code: &str, key: &str) -> Self {
        match code {
            "ArrowLeft" | "KeyA" => return Key::Left,
            "ArrowRight" | "KeyD" => return Key::Right,
            "Space" => return Key::Space,
            "ArrowUp" => return Key::Up,
            _ => {}
        }
        match key.to_lowercase().as_str() {
            "arrowleft" | "a" => Key::Left,
            "arrowright" | "d" => Key::Right,
            " " | "spacebar" => Key::Space,
            "arrowup" => Key::Up,
            _ => Key::Other,
        }
    }

    /// Keys whose default browser action is suppressed and which start a run
    pub fn is_control(&self, policy: JumpPolicy) -> bool {
        match self {
            Key::Left | Key::Right | Key::Space => true,
            Key::Up => policy == JumpPolicy::Split,
            Key::Other => false,
        }
    }
}

/// Horizontal third of the game area a pointer landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerZone {
    Left,
    Center,
    Right,
}

impl PointerZone {
    /// Zone for a pointer at `x` inside an area `width` pixels wide
    pub fn from_position(x: f64, width: f64) -> Self {
        let t = if width > 0.0 { x / width } else { 0.5 };
        if t < 0.33 {
            PointerZone::Left
        } else if t > 0.66 {
            PointerZone::Right
        } else {
            PointerZone::Center
        }
    }
}

/// Input events, already decoded by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown { key: Key, repeat: bool, timestamp: f64 },
    KeyUp { key: Key, timestamp: f64 },
    PointerDown { pointer_id: i32, zone: PointerZone, timestamp: f64 },
    /// Pointer released or cancelled
    PointerUp { pointer_id: i32, timestamp: f64 },
    /// Window blur or tab hidden; key-up events may never arrive
    Blur,
}

impl InputEvent {
    /// Whether this event should start a run when none is active
    pub fn starts_run(&self, policy: JumpPolicy) -> bool {
        match self {
            InputEvent::KeyDown { key, repeat, .. } => !repeat && key.is_control(policy),
            InputEvent::PointerDown { .. } => true,
            _ => false,
        }
    }
}

/// Pointer ids currently holding each control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerSlots {
    pub left_id: Option<i32>,
    pub right_id: Option<i32>,
    pub charge_id: Option<i32>,
}

/// What the player currently wants the runner to do
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub charging: bool,
    /// Host timestamp the current charge began at (ms)
    pub charge_start: Option<f64>,
    /// Simulated time the control has been held (ms), advanced per tick
    pub charge_held_ms: f64,
    /// Charge progress in [0, 1]
    pub charge_ratio: f64,
    /// A released charge waiting for the runner to touch the ground
    pub jump_queued: bool,
    pub pointers: PointerSlots,
}

impl InputIntent {
    /// Drop every held control; used on blur, pause and run reset
    pub fn reset_directional(&mut self) {
        *self = Self::default();
    }

    /// Forget any charge in progress or queued
    pub fn clear_charge(&mut self) {
        self.jump_queued = false;
        self.charging = false;
        self.charge_start = None;
        self.charge_held_ms = 0.0;
        self.charge_ratio = 0.0;
    }

    /// Start charging at `timestamp`; only allowed on the ground and when not
    /// already charging
    pub fn begin_charge(&mut self, timestamp: f64, grounded: bool) -> bool {
        if !grounded || self.charging {
            return false;
        }
        self.charging = true;
        self.charge_start = Some(timestamp);
        self.charge_held_ms = 0.0;
        self.charge_ratio = 0.0;
        true
    }

    /// Add one tick's elapsed time to the charge and refresh the ratio
    ///
    /// Independent of the epoch of the press timestamp.
    pub fn advance_charge(&mut self, delta_ms: f64, charge_window_ms: f64) {
        if !self.charging || !(delta_ms.is_finite() && delta_ms > 0.0) {
            return;
        }
        self.charge_held_ms += delta_ms;
        self.charge_ratio = charge_ratio(self.charge_held_ms, charge_window_ms);
    }

    /// Turn the charge into a queued jump; false if nothing was charging
    pub fn finalize_charge(&mut self, now: f64, charge_window_ms: f64) -> bool {
        if !self.charging {
            return false;
        }
        // Press and release share the host's clock; fall back to ticked time
        // if they disagree
        let elapsed = self
            .charge_start
            .map(|start| now - start)
            .filter(|e| e.is_finite() && *e >= 0.0)
            .unwrap_or(self.charge_held_ms);
        self.charge_ratio = charge_ratio(elapsed, charge_window_ms);
        self.jump_queued = true;
        self.charging = false;
        self.charge_start = None;
        true
    }
}

/// Normalized charge progress, clamped to [0, 1]
pub fn charge_ratio(elapsed_ms: f64, charge_window_ms: f64) -> f64 {
    if !(charge_window_ms > 0.0) {
        return 1.0;
    }
    crate::clamp(elapsed_ms / charge_window_ms, 0.0, 1.0)
}

/// Jump requested by an input transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpAction {
    /// Jump this high right away (caller checks the runner is grounded)
    Fixed(f64),
    /// A charge was released; flush the jump queue
    FlushQueue,
}

/// Facts about the simulation the reducer needs
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext {
    pub policy: JumpPolicy,
    pub grounded: bool,
    pub charge_window_ms: f64,
    pub tap_threshold_ms: f64,
    pub tap_jump_height: f64,
}

/// Apply one event to the intent
pub fn reduce(intent: &mut InputIntent, event: &InputEvent, cx: &ReduceContext) -> Option<JumpAction> {
    match *event {
        InputEvent::KeyDown { repeat: true, .. } => None,
        InputEvent::KeyDown { key, timestamp, .. } => match (key, cx.policy) {
            (Key::Left, _) => {
                intent.left = true;
                None
            }
            (Key::Right, _) => {
                intent.right = true;
                None
            }
            (Key::Space, JumpPolicy::Split) => {
                cx.grounded.then_some(JumpAction::Fixed(cx.tap_jump_height))
            }
            (Key::Space, JumpPolicy::Unified) | (Key::Up, JumpPolicy::Split) => {
                intent.begin_charge(timestamp, cx.grounded);
                None
            }
            _ => None,
        },
        InputEvent::KeyUp { key, timestamp } => match (key, cx.policy) {
            (Key::Left, _) => {
                intent.left = false;
                None
            }
            (Key::Right, _) => {
                intent.right = false;
                None
            }
            (Key::Space, JumpPolicy::Unified) => release_charge(intent, timestamp, cx, true),
            (Key::Up, JumpPolicy::Split) => release_charge(intent, timestamp, cx, false),
            _ => None,
        },
        InputEvent::PointerDown {
            pointer_id,
            zone,
            timestamp,
        } => {
            match zone {
                PointerZone::Left => {
                    intent.left = true;
                    intent.pointers.left_id = Some(pointer_id);
                }
                PointerZone::Right => {
                    intent.right = true;
                    intent.pointers.right_id = Some(pointer_id);
                }
                PointerZone::Center => {
                    if intent.begin_charge(timestamp, cx.grounded) {
                        intent.pointers.charge_id = Some(pointer_id);
                    }
                }
            }
            None
        }
        InputEvent::PointerUp {
            pointer_id,
            timestamp,
        } => {
            if intent.pointers.left_id == Some(pointer_id) {
                intent.left = false;
                intent.pointers.left_id = None;
            }
            if intent.pointers.right_id == Some(pointer_id) {
                intent.right = false;
                intent.pointers.right_id = None;
            }
            if intent.pointers.charge_id == Some(pointer_id) {
                intent.pointers.charge_id = None;
                return release_charge(intent, timestamp, cx, true);
            }
            None
        }
        InputEvent::Blur => {
            intent.reset_directional();
            None
        }
    }
}

/// Release the jump control; quick taps become the fixed jump when allowed
pub fn release_charge(
    intent: &mut InputIntent,
    timestamp: f64,
    cx: &ReduceContext,
    allow_tap: bool,
) -> Option<JumpAction> {
    let elapsed = intent
        .charge_start
        .map(|start| timestamp - start)
        .unwrap_or(0.0);

    if allow_tap && intent.charging && elapsed > 0.0 && elapsed < cx.tap_threshold_ms && cx.grounded {
        intent.clear_charge();
        return Some(JumpAction::Fixed(cx.tap_jump_height));
    }

    intent
        .finalize_charge(timestamp, cx.charge_window_ms)
        .then_some(JumpAction::FlushQueue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cx(policy: JumpPolicy) -> ReduceContext {
        ReduceContext {
            policy,
            grounded: true,
            charge_window_ms: 1000.0,
            tap_threshold_ms: 160.0,
            tap_jump_height: 100.0,
        }
    }

    fn key_down(key: Key, timestamp: f64) -> InputEvent {
        InputEvent::KeyDown {
            key,
            repeat: false,
            timestamp,
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft", "ArrowLeft"), Key::Left);
        assert_eq!(Key::from_dom("", "d"), Key::Right);
        assert_eq!(Key::from_dom("Space", " "), Key::Space);
        assert_eq!(Key::from_dom("", "Spacebar"), Key::Space);
        assert_eq!(Key::from_dom("KeyQ", "q"), Key::Other);
    }

    #[test]
    fn test_pointer_zones() {
        assert_eq!(PointerZone::from_position(10.0, 300.0), PointerZone::Left);
        assert_eq!(PointerZone::from_position(150.0, 300.0), PointerZone::Center);
        assert_eq!(PointerZone::from_position(290.0, 300.0), PointerZone::Right);
        assert_eq!(PointerZone::from_position(5.0, 0.0), PointerZone::Center);
    }

    #[test]
    fn test_unified_tap_is_fixed_jump() {
        let mut intent = InputIntent::default();
        let cx = cx(JumpPolicy::Unified);
        assert_eq!(reduce(&mut intent, &key_down(Key::Space, 1000.0), &cx), None);
        assert!(intent.charging);

        let action = reduce(
            &mut intent,
            &InputEvent::KeyUp {
                key: Key::Space,
                timestamp: 1080.0,
            },
            &cx,
        );
        assert_eq!(action, Some(JumpAction::Fixed(100.0)));
        assert!(!intent.charging);
        assert!(!intent.jump_queued);
    }

    #[test]
    fn test_unified_hold_queues_charged_jump() {
        let mut intent = InputIntent::default();
        let cx = cx(JumpPolicy::Unified);
        reduce(&mut intent, &key_down(Key::Space, 0.0), &cx);
        let action = reduce(
            &mut intent,
            &InputEvent::KeyUp {
                key: Key::Space,
                timestamp: 500.0,
            },
            &cx,
        );
        assert_eq!(action, Some(JumpAction::FlushQueue));
        assert!(intent.jump_queued);
        assert!((intent.charge_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_split_space_and_arrow_up() {
        let mut intent = InputIntent::default();
        let cx = cx(JumpPolicy::Split);
        assert_eq!(
            reduce(&mut intent, &key_down(Key::Space, 0.0), &cx),
            Some(JumpAction::Fixed(100.0))
        );
        assert!(!intent.charging);

        reduce(&mut intent, &key_down(Key::Up, 0.0), &cx);
        assert!(intent.charging);
        // Arrow-up release never counts as a tap
        let action = reduce(
            &mut intent,
            &InputEvent::KeyUp {
                key: Key::Up,
                timestamp: 50.0,
            },
            &cx,
        );
        assert_eq!(action, Some(JumpAction::FlushQueue));
        assert!(intent.jump_queued);
    }

    #[test]
    fn test_split_space_airborne_does_nothing() {
        let mut intent = InputIntent::default();
        let cx = ReduceContext {
            grounded: false,
            ..cx(JumpPolicy::Split)
        };
        assert_eq!(reduce(&mut intent, &key_down(Key::Space, 0.0), &cx), None);
    }

    #[test]
    fn test_charge_requires_ground() {
        let mut intent = InputIntent::default();
        assert!(!intent.begin_charge(0.0, false));
        assert!(intent.begin_charge(0.0, true));
        // Already charging
        assert!(!intent.begin_charge(10.0, true));
        assert_eq!(intent.charge_start, Some(0.0));
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut intent = InputIntent::default();
        let event = InputEvent::KeyDown {
            key: Key::Left,
            repeat: true,
            timestamp: 0.0,
        };
        reduce(&mut intent, &event, &cx(JumpPolicy::Unified));
        assert!(!intent.left);
        assert!(!event.starts_run(JumpPolicy::Unified));
    }

    #[test]
    fn test_pointer_ownership() {
        let mut intent = InputIntent::default();
        let cx = cx(JumpPolicy::Unified);
        reduce(
            &mut intent,
            &InputEvent::PointerDown {
                pointer_id: 1,
                zone: PointerZone::Left,
                timestamp: 0.0,
            },
            &cx,
        );
        reduce(
            &mut intent,
            &InputEvent::PointerDown {
                pointer_id: 2,
                zone: PointerZone::Center,
                timestamp: 0.0,
            },
            &cx,
        );
        assert!(intent.left);
        assert!(intent.charging);

        // Releasing an unrelated pointer changes nothing
        reduce(
            &mut intent,
            &InputEvent::PointerUp {
                pointer_id: 9,
                timestamp: 10.0,
            },
            &cx,
        );
        assert!(intent.left);
        assert!(intent.charging);

        let action = reduce(
            &mut intent,
            &InputEvent::PointerUp {
                pointer_id: 2,
                timestamp: 100.0,
            },
            &cx,
        );
        assert_eq!(action, Some(JumpAction::Fixed(100.0)));
        assert!(intent.left);

        reduce(
            &mut intent,
            &InputEvent::PointerUp {
                pointer_id: 1,
                timestamp: 200.0,
            },
            &cx,
        );
        assert!(!intent.left);
        assert_eq!(intent.pointers, PointerSlots::default());
    }

    #[test]
    fn test_charge_ratio_ignores_timestamp_epoch() {
        let mut intent = InputIntent::default();
        intent.begin_charge(5000.0, true);
        for _ in 0..40 {
            intent.advance_charge(16.0, 1000.0);
        }
        assert!((intent.charge_ratio - 0.64).abs() < 1e-9);

        // Release timestamp on the press's clock decides the final ratio
        assert!(intent.finalize_charge(5500.0, 1000.0));
        assert!((intent.charge_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_falls_back_to_held_time() {
        let mut intent = InputIntent::default();
        intent.begin_charge(5000.0, true);
        intent.advance_charge(300.0, 1000.0);
        // Release stamped before the press
        assert!(intent.finalize_charge(100.0, 1000.0));
        assert!((intent.charge_ratio - 0.3).abs() < 1e-9);
        assert!(intent.jump_queued);
    }

    #[test]
    fn test_blur_resets_everything() {
        let mut intent = InputIntent {
            left: true,
            right: true,
            charging: true,
            charge_start: Some(5.0),
            charge_ratio: 0.4,
            jump_queued: true,
            ..Default::default()
        };
        reduce(&mut intent, &InputEvent::Blur, &cx(JumpPolicy::Unified));
        assert_eq!(intent, InputIntent::default());
    }

    proptest! {
        #[test]
        fn prop_charge_ratio_monotonic_and_clamped(
            start in 0.0f64..10_000.0,
            deltas in proptest::collection::vec(0.0f64..300.0, 1..40),
        ) {
            let mut intent = InputIntent::default();
            intent.begin_charge(start, true);
            let mut last = 0.0;
            for delta in deltas {
                intent.advance_charge(delta, 1000.0);
                prop_assert!(intent.charge_ratio >= last);
                prop_assert!((0.0..=1.0).contains(&intent.charge_ratio));
                last = intent.charge_ratio;
            }
        }
    }
}

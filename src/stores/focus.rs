//! Focus mode and shared layout.
//!
//! The teacher drives the layout; students mirror it. All four values use
//! both change-detection channels, so a student reflects teacher changes and
//! the teacher's own polling keeps split UI state from writing back stale
//! values.
//!
//! `split_percent` is nominally 0..=100 but is not clamped here.

#[cfg(test)]
#[path = "focus_test.rs"]
mod focus_test;

use crate::codec::{BoolCodec, NumberCodec};
use crate::keys;
use crate::role::RoleGate;
use crate::synced::{SyncEnv, SyncedValue, WritePolicy};

pub const DEFAULT_SPLIT_PERCENT: f64 = 40.0;

pub struct FocusStore {
    focus_mode: SyncedValue<bool>,
    split_percent: SyncedValue<f64>,
    content_scroll_position: SyncedValue<f64>,
    content_pane_width: SyncedValue<f64>,
}

impl FocusStore {
    #[must_use]
    pub fn new(env: &SyncEnv, gate: &RoleGate) -> Self {
        let policy = || WritePolicy::Privileged(gate.clone());
        let options = env.options();
        Self {
            focus_mode: SyncedValue::new(env, keys::FOCUS_MODE, false, BoolCodec, policy(), options),
            split_percent: SyncedValue::new(
                env,
                keys::SPLIT_PERCENT,
                DEFAULT_SPLIT_PERCENT,
                NumberCodec,
                policy(),
                options,
            ),
            content_scroll_position: SyncedValue::new(
                env,
                keys::CONTENT_SCROLL_POSITION,
                0.0,
                NumberCodec,
                policy(),
                options,
            ),
            content_pane_width: SyncedValue::new(env, keys::CONTENT_PANE_WIDTH, 0.0, NumberCodec, policy(), options),
        }
    }

    #[must_use]
    pub fn focus_mode(&self) -> bool {
        self.focus_mode.read()
    }

    /// Shared handle on the focus flag, for stores that gate on it.
    #[must_use]
    pub fn focus_mode_value(&self) -> SyncedValue<bool> {
        self.focus_mode.clone()
    }

    #[must_use]
    pub fn split_percent(&self) -> f64 {
        self.split_percent.read()
    }

    #[must_use]
    pub fn content_scroll_position(&self) -> f64 {
        self.content_scroll_position.read()
    }

    #[must_use]
    pub fn content_pane_width(&self) -> f64 {
        self.content_pane_width.read()
    }

    pub fn toggle_focus_mode(&self) {
        self.focus_mode.write(!self.focus_mode.read());
    }

    pub fn set_focus_mode(&self, value: bool) {
        self.focus_mode.write(value);
    }

    pub fn set_split_percent(&self, value: f64) {
        self.split_percent.write(value);
    }

    pub fn set_content_scroll_position(&self, value: f64) {
        self.content_scroll_position.write(value);
    }

    pub fn set_content_pane_width(&self, value: f64) {
        self.content_pane_width.write(value);
    }

    pub fn stop_polling(&self) {
        self.focus_mode.stop();
        self.split_percent.stop();
        self.content_scroll_position.stop();
        self.content_pane_width.stop();
    }
}

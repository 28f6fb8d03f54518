//! Teacher whiteboard, partitioned by lesson step.
//!
//! DESIGN
//! ======
//! Strokes persist as one mapping from step index to that step's ordered
//! strokes. Every mutation targets the bucket of the lesson store's current
//! step and leaves other buckets alone, so strokes drawn on step N are
//! invisible while viewing step M. `clear_all_paths` is the only operation
//! that crosses buckets.
//!
//! The in-progress stroke is a separate key that is replaced wholesale on
//! each update and removed when the stroke completes. It has no history.
//!
//! All mutations are teacher-only.

#[cfg(test)]
#[path = "whiteboard_test.rs"]
mod whiteboard_test;

use std::rc::Rc;

use tracing::{debug, info};

use crate::codec::{BoolCodec, JsonCodec, OptionalJsonCodec};
use crate::ids;
use crate::keys;
use crate::platform::Platform;
use crate::role::{RoleGate, allowed};
use crate::stores::lesson::LessonStore;
use crate::synced::{SyncEnv, SyncedValue, WritePolicy};
use crate::types::{PathsByStep, StrokeData, WhiteboardPath};

pub struct WhiteboardStore {
    gate: RoleGate,
    platform: Rc<dyn Platform>,
    current_step: SyncedValue<i64>,
    paths_by_step: SyncedValue<PathsByStep>,
    active: SyncedValue<bool>,
    current_drawing_path: SyncedValue<Option<StrokeData>>,
}

impl WhiteboardStore {
    #[must_use]
    pub fn new(env: &SyncEnv, gate: &RoleGate, lesson: &LessonStore) -> Self {
        let policy = || WritePolicy::Privileged(gate.clone());
        let options = env.options();
        Self {
            gate: gate.clone(),
            platform: Rc::clone(&env.platform),
            current_step: lesson.current_step_value(),
            paths_by_step: SyncedValue::new(
                env,
                keys::WHITEBOARD_PATHS,
                PathsByStep::new(),
                JsonCodec::new(),
                policy(),
                options,
            ),
            active: SyncedValue::new(env, keys::WHITEBOARD_ACTIVE, false, BoolCodec, policy(), options),
            current_drawing_path: SyncedValue::new(
                env,
                keys::CURRENT_DRAWING_PATH,
                None,
                OptionalJsonCodec::new(),
                policy(),
                options,
            ),
        }
    }

    /// Strokes for the current lesson step, or none.
    #[must_use]
    pub fn paths(&self) -> Vec<WhiteboardPath> {
        self.paths_for_step(self.current_step.read())
    }

    #[must_use]
    pub fn paths_for_step(&self, step: i64) -> Vec<WhiteboardPath> {
        self.paths_by_step.with(|map| map.get(&step).cloned().unwrap_or_default())
    }

    /// The whole step-to-strokes mapping.
    #[must_use]
    pub fn paths_by_step(&self) -> PathsByStep {
        self.paths_by_step.read()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.read()
    }

    #[must_use]
    pub fn current_drawing_path(&self) -> Option<StrokeData> {
        self.current_drawing_path.read()
    }

    /// Commit a stroke to the current step. Returns the stamped path.
    pub fn add_path(&self, stroke: StrokeData) -> Option<WhiteboardPath> {
        if !allowed(self.gate.require_privileged("add whiteboard path")) {
            return None;
        }
        let now = self.platform.now_ms();
        let path = stroke.into_path(ids::path_id(now), now);
        let step = self.current_step.read();
        let committed = path.clone();
        self.paths_by_step
            .update(move |map| map.entry(step).or_default().push(committed));
        debug!(step, path_id = %path.id, "whiteboard path added");
        Some(path)
    }

    /// Drop `path_id` from the current step's bucket. Other steps are untouched.
    pub fn remove_path(&self, path_id: &str) {
        if !allowed(self.gate.require_privileged("remove whiteboard path")) {
            return;
        }
        let step = self.current_step.read();
        self.paths_by_step.update(|map| {
            if let Some(bucket) = map.get_mut(&step) {
                bucket.retain(|p| p.id != path_id);
            }
        });
        debug!(step, path_id, "whiteboard path removed");
    }

    /// Empty the current step's bucket.
    pub fn clear_paths(&self) {
        if !allowed(self.gate.require_privileged("clear whiteboard paths")) {
            return;
        }
        let step = self.current_step.read();
        self.paths_by_step.update(|map| {
            map.insert(step, Vec::new());
        });
        info!(step, "whiteboard step cleared");
    }

    /// Empty every bucket.
    pub fn clear_all_paths(&self) {
        if !allowed(self.gate.require_privileged("clear all whiteboard paths")) {
            return;
        }
        self.paths_by_step.write(PathsByStep::new());
        info!("whiteboard cleared");
    }

    pub fn set_active(&self, active: bool) {
        self.active.write(active);
    }

    /// Replace the in-progress stroke; `None` marks it finished.
    pub fn update_current_drawing_path(&self, stroke: Option<StrokeData>) {
        self.current_drawing_path.write(stroke);
    }

    pub fn stop_polling(&self) {
        self.paths_by_step.stop();
        self.active.stop();
        self.current_drawing_path.stop();
    }
}

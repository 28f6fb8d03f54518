//! Shared classroom records as they appear in the store.
//!
//! Field names serialize in camelCase so every context, whatever it was
//! built with, reads the same JSON.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A registered student. Unique by `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
}

/// Editor cursor location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    #[serde(rename = "lineNumber")]
    pub line: u32,
    pub column: u32,
}

/// One sampled point of a stroke, in content-pane coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

/// A committed whiteboard stroke. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardPath {
    pub id: String,
    pub points: Vec<PathPoint>,
    pub color: String,
    pub width: f64,
    /// Vertical scroll offset of the content pane when the stroke was drawn.
    pub scroll_y: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Stroke data supplied by the drawing surface. Also the shape of the
/// in-progress stroke broadcast while drawing: no id, no timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeData {
    pub points: Vec<PathPoint>,
    pub color: String,
    pub width: f64,
    pub scroll_y: f64,
}

impl StrokeData {
    /// Stamp into a committed path.
    #[must_use]
    pub fn into_path(self, id: String, timestamp: i64) -> WhiteboardPath {
        WhiteboardPath {
            id,
            points: self.points,
            color: self.color,
            width: self.width,
            scroll_y: self.scroll_y,
            timestamp,
        }
    }
}

/// Lesson step index to the strokes drawn during that step.
pub type PathsByStep = BTreeMap<i64, Vec<WhiteboardPath>>;

/// A chat message. Immutable once created; ordered by insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    pub sender_id: String,
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub is_teacher: bool,
}

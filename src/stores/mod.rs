//! Domain stores. Each composes [`crate::synced::SyncedValue`]s with the
//! invariants of one slice of classroom state.
//!
//! Construction order follows the dependencies: role first, then focus,
//! then lesson (reads focus), then whiteboard (reads lesson). Code-share,
//! roster and chat depend only on the role gate.

pub mod chat;
pub mod code_share;
pub mod focus;
pub mod lesson;
pub mod roster;
pub mod whiteboard;

pub use chat::ChatStore;
pub use code_share::CodeShareStore;
pub use focus::FocusStore;
pub use lesson::{LessonCatalog, LessonStore};
pub use roster::RosterStore;
pub use whiteboard::WhiteboardStore;

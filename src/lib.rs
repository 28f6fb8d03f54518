//! Cross-context classroom state synchronization over a shared key-value store.
//!
//! Two or more independent execution contexts (a teacher tab and any number
//! of student tabs) share no server and no memory, only a persistent,
//! string-only key-value store. This crate turns that store into a set of
//! strongly-typed, role-gated values that converge across contexts through
//! two change-detection paths: external change notifications and interval
//! polling.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`platform`] | Store and timer/event capability traits, `Detached` no-op adapter |
//! | [`memory`] | Deterministic in-memory store and platform for tests and native hosts |
//! | [`channel`] | Prefix-namespaced typed access to the store |
//! | [`codec`] | Per-type serializer/deserializer strategies |
//! | [`synced`] | [`synced::SyncedValue`], the reactive mirror of one key |
//! | [`role`] | [`role::RoleGate`] predicate and the local role/identity store |
//! | [`stores`] | Focus, code-share, lesson, roster, whiteboard and chat stores |
//! | [`facade`] | [`facade::SyncFacade`] composition root with coordinated teardown |
//! | [`session`] | Student identity resolution from URL parameters |
//! | [`config`] | Prefix and polling configuration |
//! | [`types`] | Shared records: students, cursors, strokes, chat messages |
//! | `browser` | `localStorage` and window adapters (feature `browser`) |

pub mod channel;
pub mod codec;
pub mod config;
pub mod error;
pub mod facade;
pub mod ids;
pub mod keys;
pub mod memory;
pub mod platform;
pub mod role;
pub mod session;
pub mod stores;
pub mod synced;
pub mod types;

#[cfg(feature = "browser")]
pub mod browser;

pub use channel::StorageChannel;
pub use config::{SyncConfig, SyncOptions};
pub use error::{CodecError, SyncError};
pub use facade::SyncFacade;
pub use memory::{MemoryContext, MemoryStore};
pub use platform::{Detached, KeyValueStore, Platform, StorageEvent};
pub use role::{RoleGate, RoleStore};
pub use session::StudentSession;
pub use stores::LessonCatalog;
pub use synced::{SyncEnv, SyncedValue, WritePolicy};

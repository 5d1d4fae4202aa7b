// src/watch/mod.rs

//! Watch sessions and filesystem watchers.
//!
//! This module is responsible for:
//! - The per-pass [`WatchSession`] state machine (`Active` → `Invalidated` or
//!   `Closed`) and its single invalidation signal.
//! - Wiring up cross-platform filesystem watchers (`notify`) that turn
//!   file additions and removals matching a glob set into session
//!   invalidation.
//!
//! It does **not** know about entries or factories; it only turns filesystem
//! changes into a one-shot staleness signal.

pub mod session;
pub mod watcher;

pub use session::{SessionHandle, SessionStatus, WatchSession};
pub use watcher::{spawn_glob_watcher, WatcherHandle};

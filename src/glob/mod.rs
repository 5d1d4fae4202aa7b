// src/glob/mod.rs

//! Glob expansion for entry factories.
//!
//! This module is responsible for:
//! - Compiling one-or-many glob patterns into a `globset` matcher.
//! - Expanding patterns rooted at a directory into a lazy stream of matched
//!   relative paths, consumable either all-at-once or item-by-item.
//! - Registering a persistent watcher over the same patterns when the
//!   enclosing resolution pass runs in watch mode.
//!
//! It does **not** know about entries or the host lifecycle; it only turns
//! patterns into paths (and, in watch mode, into invalidation triggers).

pub mod query;

pub use query::{GlobPatterns, GlobQuery};

pub(crate) use query::compile_globset;

// src/host/mod.rs

//! Build-orchestrator integration.
//!
//! The host drives the resolver at fixed lifecycle points; this module makes
//! that lifecycle an explicit interface instead of ambient hook registration:
//!
//! 1. option declaration — static entries accepted verbatim
//! 2. pre-run — one plain resolution
//! 3. watch-run — close previous session, one watch resolution
//! 4. watch-close — cancel the current session
//! 5. compile — register every merged entry import against a [`Compilation`]
//!
//! The compilation itself (module resolution, bundling) stays on the host's
//! side of the [`Compilation`] trait.

pub mod compilation;
pub mod plugin;

pub use compilation::{Compilation, TracingCompilation};
pub use plugin::EntriesPlugin;

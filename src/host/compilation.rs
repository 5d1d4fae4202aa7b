// src/host/compilation.rs

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::entry::NormalizedEntry;

/// Host surface that entries are registered against during the compile
/// phase.
#[async_trait]
pub trait Compilation: Send + Sync {
    /// Register one import specifier as a build target scoped to `context`,
    /// carrying the owning entry's options.
    async fn add_entry(
        &self,
        context: &Path,
        specifier: &str,
        entry: &NormalizedEntry,
    ) -> anyhow::Result<()>;
}

/// Compilation that only logs registrations.
///
/// Used by the CLI runner, and handy as a stand-in host when wiring a real
/// orchestrator up incrementally.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCompilation;

#[async_trait]
impl Compilation for TracingCompilation {
    async fn add_entry(
        &self,
        context: &Path,
        specifier: &str,
        entry: &NormalizedEntry,
    ) -> anyhow::Result<()> {
        info!(
            entry = %entry.name,
            specifier = %specifier,
            context = %context.display(),
            "registering entry import"
        );
        Ok(())
    }
}

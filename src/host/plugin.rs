// src/host/plugin.rs

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::debug;

use crate::entry::{
    EntriesFactory, EntriesResolver, EntryValue, NormalizedEntry, Resolution, ResolveMode,
};
use crate::errors::{CompileError, RegistrationError, ResolveError, WatchClosedError};
use crate::host::compilation::Compilation;
use crate::watch::WatchSession;

/// Lifecycle driver sitting between the host orchestrator and the resolver.
///
/// Holds the statically declared entries for the life of the process, the
/// dynamic entries of the most recent pass, and the current watch session (at
/// most one).
pub struct EntriesPlugin<F> {
    resolver: EntriesResolver<F>,
    static_entries: Vec<NormalizedEntry>,
    dynamic_entries: Vec<NormalizedEntry>,
    session: Option<WatchSession>,
}

impl<F> EntriesPlugin<F> {
    pub fn new(context: impl Into<PathBuf>, factory: F) -> Self {
        Self {
            resolver: EntriesResolver::new(context, factory),
            static_entries: Vec::new(),
            dynamic_entries: Vec::new(),
            session: None,
        }
    }

    /// Option declaration: accept statically declared entries verbatim,
    /// bypassing the resolver. Retained for the life of the plugin.
    ///
    /// Returns `true` to tell the host the declaration was handled.
    pub fn on_option_declaration(
        &mut self,
        context: &Path,
        declared: impl IntoIterator<Item = (String, EntryValue)>,
    ) -> bool {
        for (name, value) in declared {
            self.static_entries
                .push(NormalizedEntry::from_spec(name, value.into_spec(), context));
        }
        debug!(count = self.static_entries.len(), "static entries declared");
        true
    }

    /// Watch-close: cancel the current session, if any. Idempotent.
    pub fn on_watch_close(&mut self) {
        if let Some(session) = &self.session {
            session.cancel();
        }
    }

    /// Union of static entries and the latest pass's dynamic entries, static
    /// first.
    pub fn entries(&self) -> impl Iterator<Item = &NormalizedEntry> {
        self.static_entries.iter().chain(self.dynamic_entries.iter())
    }
}

impl<F: EntriesFactory> EntriesPlugin<F> {
    /// Pre-run (one-shot build): resolve once in plain mode; the result
    /// becomes the current dynamic entry set.
    pub async fn on_pre_run(&mut self) -> Result<(), ResolveError> {
        let Resolution { entries, .. } = self.resolver.resolve(ResolveMode::Plain).await?;
        self.dynamic_entries = entries;
        Ok(())
    }

    /// Watch-run (start of every watch iteration): close the previous pass's
    /// session, then resolve in watch mode and store the new entries and
    /// session.
    pub async fn on_watch_run(&mut self) -> Result<(), ResolveError> {
        if let Some(previous) = self.session.take() {
            previous.cancel();
        }

        let Resolution { entries, session } = self.resolver.resolve(ResolveMode::Watch).await?;
        self.dynamic_entries = entries;
        self.session = session;
        Ok(())
    }

    /// Continuation for the host's watch loop: resolves `Ok(())` when the
    /// current entry set went stale (time for another watch-run) and
    /// `Err(WatchClosedError)` when the session was closed instead.
    pub async fn wait_invalidated(&mut self) -> Result<(), WatchClosedError> {
        match self.session.as_mut() {
            Some(session) => session.invalidated().await,
            None => Err(WatchClosedError),
        }
    }

    /// Compile: register every import specifier of every merged entry,
    /// scoped to that entry's context.
    ///
    /// All registrations are started together and none is cancelled when a
    /// sibling fails; the phase fails afterwards if at least one failed.
    pub async fn on_compile(&self, compilation: &dyn Compilation) -> Result<(), CompileError> {
        let mut registrations = Vec::new();
        for entry in self.entries() {
            for specifier in &entry.import {
                registrations.push(async move {
                    compilation
                        .add_entry(&entry.context, specifier, entry)
                        .await
                        .map_err(|source| RegistrationError {
                            entry: entry.name.clone(),
                            specifier: specifier.clone(),
                            source,
                        })
                });
            }
        }

        let total = registrations.len();
        let mut failures: Vec<RegistrationError> = join_all(registrations)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if failures.is_empty() {
            debug!(total, "all entry imports registered");
            Ok(())
        } else {
            Err(CompileError {
                failed: failures.len(),
                total,
                first: failures.remove(0),
            })
        }
    }
}

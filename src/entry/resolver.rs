// src/entry/resolver.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use tracing::debug;

use crate::entry::factory::{Entries, EntriesFactory, FactoryContext};
use crate::entry::normalized::{EntrySpec, NormalizedEntry};
use crate::errors::ResolveError;
use crate::watch::WatchSession;

/// Mode of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// One-shot build: no watchers, no session.
    Plain,
    /// Watch iteration: glob queries register watchers into a fresh session.
    Watch,
}

/// Outcome of one resolution pass.
#[derive(Debug)]
pub struct Resolution {
    /// Normalized entries in enumeration order, one per unique name.
    pub entries: Vec<NormalizedEntry>,
    /// Present in watch mode only. The caller owns it: awaiting
    /// `invalidated()` is the continuation into the next pass, `cancel()`
    /// (or dropping) closes the pass's watchers.
    pub session: Option<WatchSession>,
}

/// Runs resolution passes against one factory.
///
/// The resolver is stateless across passes; in particular it never closes a
/// previous pass's session. The orchestrator must close (or drop) the old
/// session before starting a new watch pass, otherwise its watchers keep
/// running and both sessions can signal.
pub struct EntriesResolver<F> {
    context: PathBuf,
    factory: F,
}

impl<F> EntriesResolver<F> {
    pub fn new(context: impl Into<PathBuf>, factory: F) -> Self {
        Self {
            context: context.into(),
            factory,
        }
    }

    pub fn context(&self) -> &Path {
        &self.context
    }
}

impl<F: EntriesFactory> EntriesResolver<F> {
    /// Run one resolution pass.
    ///
    /// Invokes the factory with `{ context, glob }`, normalizes its result
    /// (bare strings become one-element imports, duplicate names are
    /// last-write-wins with no field merge), and returns the mode-appropriate
    /// [`Resolution`].
    pub async fn resolve(&self, mode: ResolveMode) -> Result<Resolution, ResolveError> {
        let session = match mode {
            ResolveMode::Watch => Some(WatchSession::new()),
            ResolveMode::Plain => None,
        };
        let cx = FactoryContext::new(
            self.context.clone(),
            session.as_ref().map(WatchSession::handle),
        );

        debug!(?mode, context = ?self.context, "starting resolution pass");

        let result = self
            .factory
            .produce(cx)
            .await
            .map_err(ResolveError::Factory)?;

        let records = collect_records(result).await?;
        let entries: Vec<NormalizedEntry> = records
            .into_iter()
            .map(|(name, spec)| NormalizedEntry::from_spec(name, spec, &self.context))
            .collect();

        debug!(count = entries.len(), "resolution pass complete");

        Ok(Resolution { entries, session })
    }
}

/// Name-keyed collection preserving enumeration order: a duplicate name fully
/// replaces the earlier record's fields while keeping its original position.
struct Collector {
    records: Vec<(String, EntrySpec)>,
    index: HashMap<String, usize>,
}

impl Collector {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, name: String, spec: EntrySpec) -> Result<(), ResolveError> {
        if name.is_empty() {
            return Err(ResolveError::InvalidFactoryResult(
                "entry with empty name".to_string(),
            ));
        }
        match self.index.get(&name) {
            Some(&i) => self.records[i] = (name, spec),
            None => {
                self.index.insert(name.clone(), self.records.len());
                self.records.push((name, spec));
            }
        }
        Ok(())
    }
}

async fn collect_records(entries: Entries) -> Result<Vec<(String, EntrySpec)>, ResolveError> {
    let mut collector = Collector::new();
    match entries {
        Entries::Map(pairs) => {
            for (name, value) in pairs {
                collector.push(name, value.into_spec())?;
            }
        }
        Entries::List(records) => {
            for record in records {
                collector.push(record.name, record.spec)?;
            }
        }
        Entries::Stream(mut stream) => {
            while let Some(record) = stream.next().await {
                collector.push(record.name, record.spec)?;
            }
        }
    }
    Ok(collector.records)
}

// src/entry/factory.rs

use std::future::Future;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, Stream, StreamExt};

use crate::entry::normalized::{EntryValue, NamedEntrySpec};
use crate::errors::PatternError;
use crate::glob::{GlobPatterns, GlobQuery};
use crate::watch::SessionHandle;

/// The three recognized factory result shapes, as an explicit tagged union.
///
/// The original contract accepted a mapping, a synchronous iterable, or an
/// asynchronous iterable and probed which one applied; here each shape is a
/// constructor and the choice is made where the factory builds its result,
/// not sniffed downstream.
pub enum Entries {
    /// Mapping from entry name to a bare specifier string or full options.
    /// Enumeration order is the vector order; keys need not be unique (later
    /// wins, like any other duplicate name).
    Map(Vec<(String, EntryValue)>),
    /// Synchronous sequence of named records.
    List(Vec<NamedEntrySpec>),
    /// Asynchronous sequence of named records.
    Stream(BoxStream<'static, NamedEntrySpec>),
}

impl Entries {
    /// Convenience constructor boxing an arbitrary record stream.
    pub fn from_stream(stream: impl Stream<Item = NamedEntrySpec> + Send + 'static) -> Self {
        Entries::Stream(stream.boxed())
    }
}

impl std::fmt::Debug for Entries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entries::Map(pairs) => f.debug_tuple("Map").field(pairs).finish(),
            Entries::List(records) => f.debug_tuple("List").field(records).finish(),
            Entries::Stream(_) => f.debug_tuple("Stream").finish(),
        }
    }
}

/// Context handed to the factory for one resolution pass.
///
/// `glob()` constructs queries bound to this pass: in watch mode they carry
/// the pass's session handle and register watchers on first consumption; in
/// plain mode no watcher is ever created.
#[derive(Clone)]
pub struct FactoryContext {
    context: PathBuf,
    session: Option<SessionHandle>,
}

impl FactoryContext {
    /// Build a context rooted at `context`.
    ///
    /// The resolver does this internally; it is public so factories can be
    /// exercised directly in tests (pass `None` for plain-mode behaviour).
    pub fn new(context: impl Into<PathBuf>, session: Option<SessionHandle>) -> Self {
        Self {
            context: context.into(),
            session,
        }
    }

    /// Root context directory of the resolver.
    pub fn context(&self) -> &Path {
        &self.context
    }

    /// Expand glob patterns rooted at the resolver context.
    ///
    /// Malformed patterns fail here, synchronously.
    pub fn glob(&self, patterns: impl Into<GlobPatterns>) -> Result<GlobQuery, PatternError> {
        self.glob_in(patterns, self.context.clone())
    }

    /// Expand glob patterns rooted at an explicit directory.
    pub fn glob_in(
        &self,
        patterns: impl Into<GlobPatterns>,
        cwd: impl Into<PathBuf>,
    ) -> Result<GlobQuery, PatternError> {
        GlobQuery::new(patterns.into(), cwd.into(), self.session.clone())
    }
}

impl std::fmt::Debug for FactoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryContext")
            .field("context", &self.context)
            .field("watching", &self.session.is_some())
            .finish()
    }
}

/// User-supplied producer of the desired entry set.
///
/// Blanket-implemented for async closures, so
/// `|cx: FactoryContext| async move { ... }` is a factory.
pub trait EntriesFactory: Send + Sync {
    fn produce(&self, cx: FactoryContext) -> BoxFuture<'static, anyhow::Result<Entries>>;
}

impl<F, Fut> EntriesFactory for F
where
    F: Fn(FactoryContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Entries>> + Send + 'static,
{
    fn produce(&self, cx: FactoryContext) -> BoxFuture<'static, anyhow::Result<Entries>> {
        (self)(cx).boxed()
    }
}

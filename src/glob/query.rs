// src/glob/query.rs

use std::path::PathBuf;
use std::sync::Arc;

use async_walkdir::WalkDir;
use futures::stream::BoxStream;
use futures::StreamExt;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::errors::PatternError;
use crate::watch::watcher::relative_str;
use crate::watch::{spawn_glob_watcher, SessionHandle};

/// One or many glob pattern strings.
///
/// Factories usually pass a single `&str`; anything list-shaped converts via
/// `From` as well.
#[derive(Debug, Clone)]
pub struct GlobPatterns(Vec<String>);

impl GlobPatterns {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for GlobPatterns {
    fn from(pattern: &str) -> Self {
        Self(vec![pattern.to_string()])
    }
}

impl From<String> for GlobPatterns {
    fn from(pattern: String) -> Self {
        Self(vec![pattern])
    }
}

impl From<Vec<String>> for GlobPatterns {
    fn from(patterns: Vec<String>) -> Self {
        Self(patterns)
    }
}

impl From<Vec<&str>> for GlobPatterns {
    fn from(patterns: Vec<&str>) -> Self {
        Self(patterns.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for GlobPatterns {
    fn from(patterns: &[&str]) -> Self {
        Self(patterns.iter().map(|p| p.to_string()).collect())
    }
}

/// Compile patterns into a `GlobSet` matching relative paths.
///
/// `*` does not cross `/`; use `**` to match across directories.
pub(crate) fn compile_globset(patterns: &[String]) -> Result<GlobSet, PatternError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| PatternError {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| PatternError {
        pattern: patterns.join(", "),
        source,
    })
}

/// A single glob expansion over `(patterns, cwd)`.
///
/// The underlying traversal is created lazily on first consumption and is
/// single-use: a query is consumed exactly once, either fully drained with
/// [`GlobQuery::to_array`] or iterated with [`GlobQuery::into_stream`]. Both
/// take the query by value, so a second consumption does not compile.
///
/// When the query was constructed during a watch-mode pass, first consumption
/// also registers a persistent watcher over the same `(patterns, cwd)` with
/// the owning session; the first file addition or removal matching the
/// patterns invalidates that session. A watcher that fails to start closes
/// the session instead of leaving it waiting forever.
pub struct GlobQuery {
    patterns: GlobPatterns,
    set: GlobSet,
    cwd: PathBuf,
    session: Option<SessionHandle>,
}

impl std::fmt::Debug for GlobQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobQuery")
            .field("patterns", &self.patterns)
            .field("cwd", &self.cwd)
            .field("watching", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl GlobQuery {
    /// Compile `patterns` rooted at `cwd`. Malformed patterns fail here,
    /// synchronously, before anything touches the filesystem.
    pub(crate) fn new(
        patterns: GlobPatterns,
        cwd: PathBuf,
        session: Option<SessionHandle>,
    ) -> Result<Self, PatternError> {
        let set = compile_globset(patterns.as_slice())?;
        Ok(Self {
            patterns,
            set,
            cwd,
            session,
        })
    }

    /// Drain the whole expansion into a vector of matched relative paths.
    pub async fn to_array(self) -> Vec<String> {
        self.into_stream().collect().await
    }

    /// Consume the query as a stream, one matched relative path per item, in
    /// discovery order.
    pub fn into_stream(self) -> BoxStream<'static, String> {
        if let Some(session) = &self.session {
            match spawn_glob_watcher(&self.cwd, self.set.clone(), session.clone()) {
                Ok(handle) => session.register(handle),
                Err(err) => {
                    // A pass that cannot watch must not pretend it can; close
                    // the session so the orchestrator sees the failure
                    // instead of waiting on a signal that can never fire.
                    warn!(error = %err, cwd = ?self.cwd, patterns = ?self.patterns, "failed to start glob watcher, closing session");
                    session.cancel();
                }
            }
        }

        let cwd = Arc::new(self.cwd);
        let set = Arc::new(self.set);

        WalkDir::new(cwd.as_path().to_path_buf())
            .filter_map(move |item| {
                let cwd = Arc::clone(&cwd);
                let set = Arc::clone(&set);
                async move {
                    let entry = match item {
                        Ok(entry) => entry,
                        Err(err) => {
                            warn!(error = %err, "walk error during glob expansion");
                            return None;
                        }
                    };
                    match entry.file_type().await {
                        Ok(file_type) if file_type.is_file() => {}
                        Ok(_) => return None,
                        Err(err) => {
                            warn!(error = %err, path = ?entry.path(), "could not stat path during glob expansion");
                            return None;
                        }
                    }
                    let rel = relative_str(&cwd, &entry.path())?;
                    set.is_match(&rel).then_some(rel)
                }
            })
            .boxed()
    }
}

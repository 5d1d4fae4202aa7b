// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::GlobSet;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::watch::session::SessionHandle;

/// Handle for one filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as the owning session. Dropping this handle stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes `cwd` recursively and invalidates
/// `session` on the first file addition or removal whose path (relative to
/// `cwd`) matches `set`.
///
/// Modifications never invalidate, and nothing already on disk counts: only
/// create and remove events arriving after the watcher starts are considered.
pub fn spawn_glob_watcher(
    cwd: impl Into<PathBuf>,
    set: GlobSet,
    session: SessionHandle,
) -> Result<WatcherHandle> {
    let cwd = cwd.into();
    let root = cwd.canonicalize().unwrap_or_else(|_| cwd.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // The receiver disappears once the session settles; nothing
                // left to signal then.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                eprintln!("entrywatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    debug!(root = ?root, "glob watcher started");

    // Async task that consumes notify events and settles the session on the
    // first matching add/remove.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Remove(_)) {
                continue;
            }

            for path in &event.paths {
                let Some(rel) = relative_str(&root, path) else {
                    warn!(path = ?path, root = ?root, "event path outside watch root, ignoring");
                    continue;
                };
                if set.is_match(&rel) {
                    debug!(path = %rel, kind = ?event.kind, "watch match, invalidating session");
                    session.invalidate();
                    // The signal fires at most once per session; this
                    // watcher has nothing further to report.
                    return;
                }
            }
        }

        debug!("glob watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
pub(crate) fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}

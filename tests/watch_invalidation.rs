use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use entrywatch::entry::{
    Entries, EntriesFactory, EntriesResolver, EntrySpec, FactoryContext, NamedEntrySpec, OneOrMany,
    ResolveMode,
};
use entrywatch::errors::WatchClosedError;
use entrywatch::watch::{SessionStatus, WatchSession};
use tokio::time::{sleep, timeout};

type TestResult = Result<(), Box<dyn Error>>;

const SETTLE: Duration = Duration::from_millis(250);
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Factory matching `src/*.entry.js`, one entry per match named by file stem.
fn entry_factory() -> impl EntriesFactory {
    |cx: FactoryContext| async move {
        let paths = cx.glob("src/*.entry.js")?.to_array().await;
        let records = paths
            .into_iter()
            .map(|path| NamedEntrySpec {
                name: stem(&path),
                spec: EntrySpec {
                    import: Some(OneOrMany::One(path)),
                    ..EntrySpec::default()
                },
            })
            .collect();
        anyhow::Ok(Entries::List(records))
    }
}

fn stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn project() -> Result<(tempfile::TempDir, PathBuf), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::write(dir.path().join("src/a.entry.js"), "")?;
    let root = dir.path().canonicalize()?;
    Ok((dir, root))
}

#[tokio::test]
async fn file_addition_resolves_invalidation_once() -> TestResult {
    let (_dir, root) = project()?;
    let resolver = EntriesResolver::new(root.clone(), entry_factory());

    let mut resolution = resolver.resolve(ResolveMode::Watch).await?;
    assert_eq!(resolution.entries.len(), 1);
    assert_eq!(resolution.entries[0].name, "a.entry");

    let mut session = resolution.session.take().expect("watch mode owns a session");
    assert_eq!(session.status(), SessionStatus::Active);

    sleep(SETTLE).await;
    fs::write(root.join("src/b.entry.js"), "")?;

    timeout(EVENT_TIMEOUT, session.invalidated()).await??;
    assert_eq!(session.status(), SessionStatus::Invalidated);

    // Further matching changes cannot re-arm the settled signal.
    fs::write(root.join("src/c.entry.js"), "")?;
    sleep(SETTLE).await;
    assert_eq!(session.status(), SessionStatus::Invalidated);
    assert_eq!(session.invalidated().await, Ok(()));
    Ok(())
}

#[tokio::test]
async fn file_removal_resolves_invalidation() -> TestResult {
    let (_dir, root) = project()?;
    let resolver = EntriesResolver::new(root.clone(), entry_factory());

    let mut resolution = resolver.resolve(ResolveMode::Watch).await?;
    let mut session = resolution.session.take().expect("watch mode owns a session");

    sleep(SETTLE).await;
    fs::remove_file(root.join("src/a.entry.js"))?;

    timeout(EVENT_TIMEOUT, session.invalidated()).await??;
    assert_eq!(session.status(), SessionStatus::Invalidated);
    Ok(())
}

#[tokio::test]
async fn non_matching_addition_does_not_invalidate() -> TestResult {
    let (_dir, root) = project()?;
    let resolver = EntriesResolver::new(root.clone(), entry_factory());

    let mut resolution = resolver.resolve(ResolveMode::Watch).await?;
    let session = resolution.session.take().expect("watch mode owns a session");

    sleep(SETTLE).await;
    fs::write(root.join("src/notes.md"), "")?;

    sleep(SETTLE).await;
    assert_eq!(session.status(), SessionStatus::Active);

    session.cancel();
    Ok(())
}

#[tokio::test]
async fn cancel_blocks_later_watcher_events() -> TestResult {
    let (_dir, root) = project()?;
    let resolver = EntriesResolver::new(root.clone(), entry_factory());

    let mut resolution = resolver.resolve(ResolveMode::Watch).await?;
    let mut session = resolution.session.take().expect("watch mode owns a session");

    session.cancel();
    assert_eq!(session.invalidated().await, Err(WatchClosedError));

    fs::write(root.join("src/b.entry.js"), "")?;
    sleep(SETTLE).await;
    assert_eq!(session.status(), SessionStatus::Closed);
    Ok(())
}

#[tokio::test]
async fn failed_watcher_spawn_closes_the_session() -> TestResult {
    let mut session = WatchSession::new();
    let cx = FactoryContext::new("/nonexistent/entrywatch-root", Some(session.handle()));

    // The traversal degrades to an empty result, but the session must not be
    // left waiting on a watcher that never started.
    let matches = cx.glob("src/*.entry.js")?.to_array().await;
    assert!(matches.is_empty());

    assert_eq!(session.status(), SessionStatus::Closed);
    assert_eq!(session.invalidated().await, Err(WatchClosedError));
    Ok(())
}

#[tokio::test]
async fn plain_mode_never_creates_a_session() -> TestResult {
    let (_dir, root) = project()?;
    let resolver = EntriesResolver::new(root.clone(), entry_factory());

    let resolution = resolver.resolve(ResolveMode::Plain).await?;
    assert!(resolution.session.is_none());
    assert_eq!(resolution.entries.len(), 1);
    Ok(())
}

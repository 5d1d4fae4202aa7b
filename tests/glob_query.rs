use std::error::Error;
use std::fs;

use entrywatch::entry::FactoryContext;
use futures::StreamExt;

type TestResult = Result<(), Box<dyn Error>>;

fn project_with_entries() -> Result<tempfile::TempDir, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("src/nested"))?;
    fs::write(dir.path().join("src/a.entry.js"), "")?;
    fs::write(dir.path().join("src/b.entry.js"), "")?;
    fs::write(dir.path().join("src/nested/c.entry.js"), "")?;
    fs::write(dir.path().join("src/readme.md"), "")?;
    Ok(dir)
}

#[tokio::test]
async fn to_array_and_stream_yield_the_same_set() -> TestResult {
    let dir = project_with_entries()?;
    let cx = FactoryContext::new(dir.path(), None);

    let mut collected_array = cx.glob("src/*.entry.js")?.to_array().await;
    collected_array.sort();

    let mut stream = cx.glob("src/*.entry.js")?.into_stream();
    let mut collected_stream = Vec::new();
    while let Some(path) = stream.next().await {
        collected_stream.push(path);
    }
    collected_stream.sort();

    assert_eq!(collected_array, collected_stream);
    assert_eq!(
        collected_array,
        vec!["src/a.entry.js".to_string(), "src/b.entry.js".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn single_star_does_not_cross_directories() -> TestResult {
    let dir = project_with_entries()?;
    let cx = FactoryContext::new(dir.path(), None);

    let flat = cx.glob("src/*.entry.js")?.to_array().await;
    assert!(!flat.iter().any(|p| p.contains("nested")));

    let mut deep = cx.glob("src/**/*.entry.js")?.to_array().await;
    deep.sort();
    assert_eq!(
        deep,
        vec![
            "src/a.entry.js".to_string(),
            "src/b.entry.js".to_string(),
            "src/nested/c.entry.js".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn multiple_patterns_union_their_matches() -> TestResult {
    let dir = project_with_entries()?;
    let cx = FactoryContext::new(dir.path(), None);

    let mut matches = cx
        .glob(vec!["src/*.entry.js", "src/*.md"])?
        .to_array()
        .await;
    matches.sort();
    assert_eq!(
        matches,
        vec![
            "src/a.entry.js".to_string(),
            "src/b.entry.js".to_string(),
            "src/readme.md".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn no_matches_yields_empty_array() -> TestResult {
    let dir = project_with_entries()?;
    let cx = FactoryContext::new(dir.path(), None);

    let matches = cx.glob("src/*.css")?.to_array().await;
    assert!(matches.is_empty());
    Ok(())
}

#[test]
fn malformed_pattern_fails_synchronously() {
    let cx = FactoryContext::new("/project", None);
    let err = cx.glob("src/[").expect_err("bad pattern must be rejected");
    assert_eq!(err.pattern, "src/[");
}

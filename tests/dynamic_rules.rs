use std::error::Error;
use std::fs;

use entrywatch::config::{entries_factory, DynamicRule};
use entrywatch::entry::{EntriesResolver, OneOrMany, ResolveMode};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn dynamic_rules_expand_into_entries() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::write(dir.path().join("src/app.entry.js"), "")?;
    fs::write(dir.path().join("src/admin.entry.js"), "")?;
    fs::write(dir.path().join("src/helper.js"), "")?;
    let root = dir.path().canonicalize()?;

    let factory = entries_factory(vec![DynamicRule {
        patterns: OneOrMany::One("src/*.entry.js".to_string()),
        cwd: None,
    }]);
    let resolver = EntriesResolver::new(root, factory);

    let resolution = resolver.resolve(ResolveMode::Plain).await?;
    let mut names: Vec<String> = resolution.entries.iter().map(|e| e.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["admin.entry".to_string(), "app.entry".to_string()]);

    let app = resolution
        .entries
        .iter()
        .find(|e| e.name == "app.entry")
        .expect("app entry resolved");
    assert_eq!(app.import, vec!["./src/app.entry.js".to_string()]);
    Ok(())
}

#[tokio::test]
async fn rule_cwd_scopes_the_expansion() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("frontend/pages"))?;
    fs::write(dir.path().join("frontend/pages/index.js"), "")?;
    fs::write(dir.path().join("frontend/pages/about.js"), "")?;
    let root = dir.path().canonicalize()?;

    let factory = entries_factory(vec![DynamicRule {
        patterns: OneOrMany::One("pages/*.js".to_string()),
        cwd: Some("frontend".into()),
    }]);
    let resolver = EntriesResolver::new(root, factory);

    let resolution = resolver.resolve(ResolveMode::Plain).await?;
    let mut names: Vec<String> = resolution.entries.iter().map(|e| e.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["about".to_string(), "index".to_string()]);
    Ok(())
}

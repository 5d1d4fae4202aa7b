// src/config/factory.rs

use std::path::Path;

use futures::StreamExt;

use crate::config::model::DynamicRule;
use crate::entry::{Entries, EntriesFactory, EntrySpec, FactoryContext, NamedEntrySpec, OneOrMany};

/// Build an entries factory from the config's `[[dynamic]]` rules.
///
/// Each rule expands its patterns through the pass's glob context (so watch
/// mode gets watchers for free) and yields one entry per matched file, named
/// after the file stem and importing the matched path. Name collisions
/// between rules resolve like any duplicate: the later rule wins.
pub fn entries_factory(rules: Vec<DynamicRule>) -> impl EntriesFactory {
    move |cx: FactoryContext| {
        let rules = rules.clone();
        async move {
            let mut records = Vec::new();

            for rule in rules {
                let patterns = rule.patterns.into_vec();
                let query = match rule.cwd {
                    Some(cwd) => cx.glob_in(patterns, cx.context().join(cwd))?,
                    None => cx.glob(patterns)?,
                };

                let mut matches = query.into_stream();
                while let Some(path) = matches.next().await {
                    records.push(NamedEntrySpec {
                        name: entry_name(&path),
                        spec: EntrySpec {
                            import: Some(OneOrMany::One(format!("./{path}"))),
                            ..EntrySpec::default()
                        },
                    });
                }
            }

            anyhow::Ok(Entries::List(records))
        }
    }
}

/// Entry name for a matched path: the file stem of its basename.
fn entry_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

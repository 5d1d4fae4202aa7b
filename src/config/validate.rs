// src/config/validate.rs

use anyhow::{bail, Context, Result};

use crate::config::model::ConfigFile;
use crate::glob::compile_globset;

/// Validate a loaded configuration.
///
/// Checks:
/// - static entry names are non-empty,
/// - every `[[dynamic]]` rule has at least one pattern,
/// - all declared patterns compile.
///
/// Pattern errors surface at load time rather than mid-pass, so a typo in
/// the config fails the run before anything is resolved.
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    for name in config.static_entries.keys() {
        if name.is_empty() {
            bail!("static entry with empty name");
        }
    }

    for (i, rule) in config.dynamic.iter().enumerate() {
        let patterns = rule.patterns.clone().into_vec();
        if patterns.is_empty() {
            bail!("dynamic rule #{i} has no patterns");
        }
        compile_globset(&patterns)
            .with_context(|| format!("compiling patterns for dynamic rule #{i}"))?;
    }

    Ok(())
}

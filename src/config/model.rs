// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::entry::{EntryValue, OneOrMany};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// context = "."
///
/// [static]
/// app = "./src/app.js"
///
/// [static.admin]
/// import = ["./src/admin.js"]
/// depend_on = "app"
///
/// [[dynamic]]
/// patterns = "src/*.entry.js"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Root context directory. Relative paths are resolved against the
    /// directory containing the config file, which is also the default.
    #[serde(default)]
    pub context: Option<PathBuf>,

    /// Statically declared entries from `[static]` / `[static.<name>]`.
    ///
    /// Keys are the entry names; a bare string value is sugar for
    /// `import = [value]`.
    #[serde(default, rename = "static")]
    pub static_entries: BTreeMap<String, EntryValue>,

    /// Glob-driven dynamic entry rules from `[[dynamic]]`.
    #[serde(default)]
    pub dynamic: Vec<DynamicRule>,
}

/// One `[[dynamic]]` rule: every file matching `patterns` becomes an entry
/// importing that file, named after its file stem.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicRule {
    /// Glob pattern(s), single string or list.
    pub patterns: OneOrMany,

    /// Directory the patterns are rooted at, relative to the root context.
    /// Defaults to the root context itself.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

// src/entry/normalized.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

/// One-or-many shorthand accepted wherever the entries contract allows a
/// single string instead of a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(s: String) -> Self {
        OneOrMany::One(s)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(v: Vec<String>) -> Self {
        OneOrMany::Many(v)
    }
}

/// Entry options as produced by a factory, before normalization.
///
/// Every field is optional; `context` falls back to the resolver root and
/// the one-or-many fields normalize to sequences. Fields the resolver does
/// not interpret land in `options` and pass through to registration
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntrySpec {
    #[serde(default)]
    pub context: Option<PathBuf>,

    #[serde(default)]
    pub import: Option<OneOrMany>,

    #[serde(default, alias = "dependOn")]
    pub depend_on: Option<OneOrMany>,

    /// Opaque passthrough bag.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// A record yielded by sequence-shaped factory results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedEntrySpec {
    pub name: String,

    #[serde(flatten)]
    pub spec: EntrySpec,
}

/// Mapping values: a bare module specifier is sugar for `import = [s]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Specifier(String),
    Options(EntrySpec),
}

impl EntryValue {
    pub fn into_spec(self) -> EntrySpec {
        match self {
            EntryValue::Specifier(specifier) => EntrySpec {
                import: Some(OneOrMany::One(specifier)),
                ..EntrySpec::default()
            },
            EntryValue::Options(spec) => spec,
        }
    }
}

/// Canonical record for one build entry.
///
/// Immutable once constructed; a resolution pass builds a fresh set and the
/// orchestrator discards the previous one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntry {
    /// Absolute base directory for this entry's imports.
    pub context: PathBuf,
    /// Unique within the result of one resolution pass.
    pub name: String,
    /// Module specifiers to start building from.
    pub import: Vec<String>,
    /// Names of entries this one depends on, if any.
    pub depend_on: Option<Vec<String>>,
    /// Passthrough options forwarded untouched to registration.
    pub options: Map<String, Value>,
}

impl NormalizedEntry {
    /// Normalize a spec: default `context` to `root`, expand one-or-many
    /// fields to sequences.
    pub fn from_spec(name: String, spec: EntrySpec, root: &Path) -> Self {
        Self {
            context: spec.context.unwrap_or_else(|| root.to_path_buf()),
            name,
            import: spec.import.map(OneOrMany::into_vec).unwrap_or_default(),
            depend_on: spec.depend_on.map(OneOrMany::into_vec),
            options: spec.options,
        }
    }
}

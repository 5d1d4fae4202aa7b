// src/errors.rs

//! Crate-wide error types.
//!
//! The resolution protocol has a small, fixed taxonomy: everything that can
//! go wrong during a pass either aborts the pass (`ResolveError`), settles
//! the invalidation signal (`WatchClosedError`), or fails the compile phase
//! (`RegistrationError` / `CompileError`). Nothing here is retried
//! internally; the orchestrator decides what a failure means for the build.

use thiserror::Error;

/// Failure of one resolution pass. No entries are produced when this is
/// returned.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The entries factory returned an error (or its future failed).
    #[error("entries factory failed")]
    Factory(#[source] anyhow::Error),

    /// The factory result violates the entries contract, e.g. a record or
    /// mapping key with an empty name.
    #[error("entries factory produced an invalid result: {0}")]
    InvalidFactoryResult(String),
}

/// The watch session was closed before any invalidation arrived.
///
/// This only ever surfaces through the invalidation future, never from
/// `resolve()` itself, and is the expected outcome of an intentional
/// `cancel()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("watch session closed before invalidation")]
pub struct WatchClosedError;

/// A glob pattern handed to the factory context could not be compiled.
///
/// Surfaced synchronously from the call that constructs the query.
#[derive(Debug, Error)]
#[error("invalid glob pattern: {pattern}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: globset::Error,
}

/// The host failed to register a single import specifier for an entry.
#[derive(Debug, Error)]
#[error("failed to register import {specifier:?} for entry {entry:?}")]
pub struct RegistrationError {
    pub entry: String,
    pub specifier: String,
    #[source]
    pub source: anyhow::Error,
}

/// Aggregate failure of the compile phase.
///
/// All registrations are attempted; if any fail, the phase as a whole fails
/// with the failure count and the first underlying cause.
#[derive(Debug, Error)]
#[error("{failed} of {total} entry registrations failed")]
pub struct CompileError {
    pub failed: usize,
    pub total: usize,
    #[source]
    pub first: RegistrationError,
}

// src/entry/mod.rs

//! Entry data model, the factory contract, and the resolver.
//!
//! This module is responsible for:
//! - The canonical [`NormalizedEntry`] record and the pre-normalization
//!   shapes factories produce (`EntryValue`, `EntrySpec`, `NamedEntrySpec`).
//! - The [`Entries`] union covering the three recognized factory result
//!   shapes (mapping, synchronous sequence, asynchronous sequence).
//! - [`EntriesResolver`], which runs one resolution pass: invoke the factory,
//!   normalize its result, and (in watch mode) own the pass's watch session.

pub mod factory;
pub mod normalized;
pub mod resolver;

pub use factory::{Entries, EntriesFactory, FactoryContext};
pub use normalized::{EntrySpec, EntryValue, NamedEntrySpec, NormalizedEntry, OneOrMany};
pub use resolver::{EntriesResolver, Resolution, ResolveMode};

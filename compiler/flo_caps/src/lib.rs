//! Capabilities for the Flo runtime.
//!
//! A [`CapabilityTable`] is built once, before a program runs, from the
//! on-disk capability file (or programmatically), optionally with some
//! entries forced off. It is never mutated afterwards and is shared by
//! reference between the evaluator and every strand.
//!
//! The only way to obtain a [`CapabilityToken`] is [`CapabilityTable::grant`].
//! Effectful calls present the token together with the [`ScopeClaim`]s the
//! call would exercise, and [`CapabilityTable::authorize`] decides.
//!
//! # Layout
//!
//! - `kind`: the closed set of capability names
//! - `entry`: per-capability enabled flag and allowlists
//! - `claim`: what a single call wants to touch
//! - `file`: JSON capability file loader
//! - `table` / `token`: the table and the tokens it mints

mod claim;
mod entry;
mod file;
mod kind;
mod table;
mod token;

pub use claim::ScopeClaim;
pub use entry::CapabilityEntry;
pub use file::{CapabilityFile, CapabilityFileError};
pub use kind::{CapabilityKind, UnknownCapability};
pub use table::{CapabilityDenial, CapabilityTable};
pub use token::CapabilityToken;

#[cfg(test)]
mod tests;

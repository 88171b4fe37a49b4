//! Capability tokens.

use std::fmt;
use std::sync::Arc;

use crate::{CapabilityEntry, CapabilityKind};

/// Proof that a `request cap` succeeded against a specific table.
///
/// Fields are private and there is no public constructor: the only source
/// of tokens is [`CapabilityTable::grant`](crate::CapabilityTable::grant).
/// A token carries the id of the table that minted it, so tokens from one
/// table are rejected by another.
#[derive(Clone)]
pub struct CapabilityToken {
    kind: CapabilityKind,
    table_id: u64,
    attrs: Arc<CapabilityEntry>,
}

impl CapabilityToken {
    pub(crate) fn mint(kind: CapabilityKind, table_id: u64, attrs: CapabilityEntry) -> Self {
        CapabilityToken {
            kind,
            table_id,
            attrs: Arc::new(attrs),
        }
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Id of the minting table.
    pub fn table_id(&self) -> u64 {
        self.table_id
    }

    /// Snapshot of the entry at grant time.
    pub fn attrs(&self) -> &CapabilityEntry {
        &self.attrs
    }
}

impl PartialEq for CapabilityToken {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.table_id == other.table_id
    }
}

impl Eq for CapabilityToken {}

impl fmt::Debug for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityToken({}#{})", self.kind, self.table_id)
    }
}

//! The capability table and the enforcement decision.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    CapabilityEntry, CapabilityFile, CapabilityFileError, CapabilityKind, CapabilityToken,
    ScopeClaim,
};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Why a grant or an effectful call was refused.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum CapabilityDenial {
    #[error("unknown capability `{0}`")]
    Unknown(String),

    #[error("capability `{0}` is not configured")]
    NotConfigured(CapabilityKind),

    #[error("capability `{0}` is disabled")]
    Disabled(CapabilityKind),

    #[error("`{required}` call presented a `{presented}` token")]
    WrongCapability {
        required: CapabilityKind,
        presented: CapabilityKind,
    },

    #[error("`{0}` token was not issued by this runtime")]
    ForeignToken(CapabilityKind),

    #[error("{claim} is outside the `{kind}` allowlist")]
    OutOfScope {
        kind: CapabilityKind,
        claim: ScopeClaim,
    },
}

/// Immutable snapshot of granted capabilities.
///
/// Built before a run starts; reads need no synchronisation. Every table
/// gets a process-unique id, including tables derived with
/// [`CapabilityTable::deny`].
#[derive(Debug)]
pub struct CapabilityTable {
    id: u64,
    entries: BTreeMap<CapabilityKind, CapabilityEntry>,
}

impl CapabilityTable {
    pub fn new(entries: BTreeMap<CapabilityKind, CapabilityEntry>) -> Self {
        CapabilityTable {
            id: next_table_id(),
            entries,
        }
    }

    /// A table granting nothing.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Every capability enabled with no allowlists. Development use only.
    pub fn permissive() -> Self {
        Self::new(
            CapabilityKind::ALL
                .into_iter()
                .map(|kind| (kind, CapabilityEntry::enabled()))
                .collect(),
        )
    }

    pub fn from_file(file: CapabilityFile) -> Result<Self, CapabilityFileError> {
        let table = Self::new(file.into_entries()?);
        tracing::debug!(
            table = table.id,
            entries = table.entries.len(),
            "capability table loaded"
        );
        Ok(table)
    }

    pub fn from_json(text: &str) -> Result<Self, CapabilityFileError> {
        Self::from_file(CapabilityFile::parse(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, CapabilityFileError> {
        Self::from_file(CapabilityFile::load(path)?)
    }

    /// Builder step: add or replace one entry.
    #[must_use]
    pub fn with_entry(mut self, kind: CapabilityKind, entry: CapabilityEntry) -> Self {
        self.entries.insert(kind, entry);
        self.id = next_table_id();
        self
    }

    /// Builder step: force `kinds` to disabled. Configured allowlists are
    /// kept so the entry still reads the same in diagnostics.
    #[must_use]
    pub fn deny(mut self, kinds: impl IntoIterator<Item = CapabilityKind>) -> Self {
        for kind in kinds {
            tracing::debug!(capability = %kind, "capability denied by configuration");
            self.entries.entry(kind).or_default().enabled = false;
        }
        self.id = next_table_id();
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn entry(&self, kind: CapabilityKind) -> Option<&CapabilityEntry> {
        self.entries.get(&kind)
    }

    pub fn is_enabled(&self, kind: CapabilityKind) -> bool {
        self.entry(kind).is_some_and(|entry| entry.enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CapabilityKind, &CapabilityEntry)> {
        self.entries.iter().map(|(kind, entry)| (*kind, entry))
    }

    /// Mint a token for `name`, or refuse.
    pub fn grant(&self, name: &str) -> Result<CapabilityToken, CapabilityDenial> {
        let kind: CapabilityKind = name
            .parse()
            .map_err(|_| CapabilityDenial::Unknown(name.to_owned()))?;
        let entry = self
            .entries
            .get(&kind)
            .ok_or(CapabilityDenial::NotConfigured(kind))?;
        if !entry.enabled {
            return Err(CapabilityDenial::Disabled(kind));
        }
        Ok(CapabilityToken::mint(kind, self.id, entry.clone()))
    }

    /// The enforcement checkpoint for one effectful call.
    ///
    /// Checks run against this table's current entry, not the token's
    /// snapshot.
    pub fn authorize(
        &self,
        token: &CapabilityToken,
        required: CapabilityKind,
        claims: &[ScopeClaim],
    ) -> Result<(), CapabilityDenial> {
        if token.table_id() != self.id {
            return Err(CapabilityDenial::ForeignToken(token.kind()));
        }
        if token.kind() != required {
            return Err(CapabilityDenial::WrongCapability {
                required,
                presented: token.kind(),
            });
        }
        let entry = self
            .entries
            .get(&required)
            .ok_or(CapabilityDenial::NotConfigured(required))?;
        if !entry.enabled {
            return Err(CapabilityDenial::Disabled(required));
        }
        match claims.iter().find(|claim| !entry.permits(claim)) {
            Some(claim) => Err(CapabilityDenial::OutOfScope {
                kind: required,
                claim: claim.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::empty()
    }
}

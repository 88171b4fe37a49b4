//! JSON capability file.
//!
//! ```json
//! {
//!   "capabilities": {
//!     "db":  { "enabled": true, "adapters": ["postgres"] },
//!     "net": { "enabled": true, "hosts": ["api.example.com", "*.internal"] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CapabilityEntry, CapabilityKind, UnknownCapability};

/// Errors loading a capability file.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityFileError {
    #[error("cannot read capability file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed capability file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownCapability(#[from] UnknownCapability),
}

/// Parsed, not yet validated, capability file.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CapabilityFile {
    #[serde(default)]
    pub capabilities: BTreeMap<String, CapabilityEntry>,
}

impl CapabilityFile {
    pub fn parse(text: &str) -> Result<Self, CapabilityFileError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, CapabilityFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| CapabilityFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Resolve entry names, rejecting any that are not known capabilities.
    pub fn into_entries(self) -> Result<BTreeMap<CapabilityKind, CapabilityEntry>, CapabilityFileError> {
        self.capabilities
            .into_iter()
            .map(|(name, entry)| Ok((name.parse::<CapabilityKind>()?, entry)))
            .collect()
    }
}

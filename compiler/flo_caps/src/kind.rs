//! Capability names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of capabilities a program can request.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Db,
    Net,
    Ai,
    Email,
    /// Encrypted secrets store.
    Mnstor,
    Fs,
    Env,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 7] = [
        CapabilityKind::Db,
        CapabilityKind::Net,
        CapabilityKind::Ai,
        CapabilityKind::Email,
        CapabilityKind::Mnstor,
        CapabilityKind::Fs,
        CapabilityKind::Env,
    ];

    /// Name as written in source and in the capability file.
    pub const fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Db => "db",
            CapabilityKind::Net => "net",
            CapabilityKind::Ai => "ai",
            CapabilityKind::Email => "email",
            CapabilityKind::Mnstor => "mnstor",
            CapabilityKind::Fs => "fs",
            CapabilityKind::Env => "env",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability name outside [`CapabilityKind::ALL`].
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("unknown capability `{0}`")]
pub struct UnknownCapability(pub String);

impl FromStr for CapabilityKind {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapabilityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_owned()))
    }
}

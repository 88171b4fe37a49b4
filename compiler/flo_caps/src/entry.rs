//! Per-capability configuration.

use serde::{Deserialize, Serialize};

use crate::ScopeClaim;

/// One capability's enabled flag and allowlists.
///
/// An allowlist that is absent does not restrict its dimension; a present
/// but empty allowlist permits nothing.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CapabilityEntry {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smtp_hosts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<Vec<String>>,
}

impl CapabilityEntry {
    /// An enabled entry with no allowlists.
    pub fn enabled() -> Self {
        CapabilityEntry {
            enabled: true,
            ..Self::default()
        }
    }

    /// A disabled entry.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The allowlist a claim is checked against, if configured.
    pub fn allowlist(&self, claim: &ScopeClaim) -> Option<&[String]> {
        let list = match claim {
            ScopeClaim::Adapter(_) => &self.adapters,
            ScopeClaim::Host(_) => &self.hosts,
            ScopeClaim::Domain(_) => &self.allowed_domains,
            ScopeClaim::Provider(_) => &self.providers,
            ScopeClaim::SmtpHost(_) => &self.smtp_hosts,
            ScopeClaim::File(_) => &self.files,
            ScopeClaim::EnvVar(_) => &self.vars,
        };
        list.as_deref()
    }

    /// Whether `claim` falls inside this entry's allowlists.
    ///
    /// Ignores `enabled`; the table checks that separately.
    pub fn permits(&self, claim: &ScopeClaim) -> bool {
        match self.allowlist(claim) {
            None => true,
            Some(patterns) => patterns
                .iter()
                .any(|pattern| pattern_matches(pattern, claim)),
        }
    }
}

fn pattern_matches(pattern: &str, claim: &ScopeClaim) -> bool {
    if pattern == "*" {
        return true;
    }
    let value = claim.value();
    if claim.is_hostname() {
        let value = value.to_ascii_lowercase();
        let pattern = pattern.to_ascii_lowercase();
        return match pattern.strip_prefix("*.") {
            Some(suffix) => value
                .strip_suffix(suffix)
                .is_some_and(|head| head.len() > 1 && head.ends_with('.')),
            None => value == pattern,
        };
    }
    if let ScopeClaim::File(_) = claim {
        if let Some(dir) = pattern.strip_suffix("/*") {
            return value
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1);
        }
    }
    value == pattern
}

//! Scope claims: what one effectful call wants to touch.

use std::fmt;

/// One resource a provider call would exercise.
///
/// Each variant is checked against one allowlist of the capability entry.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeClaim {
    /// Database adapter (`adapters`).
    Adapter(String),
    /// Network host (`hosts`).
    Host(String),
    /// E-mail recipient domain (`allowed_domains`).
    Domain(String),
    /// AI provider (`providers`).
    Provider(String),
    /// SMTP relay (`smtp_hosts`).
    SmtpHost(String),
    /// Filesystem path (`files`).
    File(String),
    /// Environment variable (`vars`).
    EnvVar(String),
}

impl ScopeClaim {
    /// Name of the allowlist this claim is checked against.
    pub const fn allowlist_name(&self) -> &'static str {
        match self {
            ScopeClaim::Adapter(_) => "adapters",
            ScopeClaim::Host(_) => "hosts",
            ScopeClaim::Domain(_) => "allowed_domains",
            ScopeClaim::Provider(_) => "providers",
            ScopeClaim::SmtpHost(_) => "smtp_hosts",
            ScopeClaim::File(_) => "files",
            ScopeClaim::EnvVar(_) => "vars",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ScopeClaim::Adapter(v)
            | ScopeClaim::Host(v)
            | ScopeClaim::Domain(v)
            | ScopeClaim::Provider(v)
            | ScopeClaim::SmtpHost(v)
            | ScopeClaim::File(v)
            | ScopeClaim::EnvVar(v) => v,
        }
    }

    /// Whether allowlist entries for this claim are host-like and accept
    /// `*.suffix` wildcards.
    pub const fn is_hostname(&self) -> bool {
        matches!(
            self,
            ScopeClaim::Host(_) | ScopeClaim::Domain(_) | ScopeClaim::SmtpHost(_)
        )
    }
}

impl fmt::Display for ScopeClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.allowlist_name(), self.value())
    }
}

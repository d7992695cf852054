//! Outlet authorization boundary.
//!
//! The engine trusts an externally supplied "authorized for this outlet"
//! flag and performs no authentication itself. For the CLI that collaborator
//! is the `OUTLET_GRANTS` environment variable: unset or `*` grants every
//! outlet (trusted local operator), anything else is a comma-separated
//! allowlist of outlet names. An empty allowlist denies everything.

use std::{collections::HashSet, env};

use anyhow::{Result, bail};

pub const GRANTS_ENV_VAR: &str = "OUTLET_GRANTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    All,
    Outlets(HashSet<String>),
}

impl Grant {
    pub fn from_env() -> Self {
        match env::var(GRANTS_ENV_VAR) {
            Ok(raw) => Self::from_list(&raw),
            Err(_) => Grant::All,
        }
    }

    pub fn from_list(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            return Grant::All;
        }
        Grant::Outlets(
            raw.split(',')
                .map(|outlet| outlet.trim().to_string())
                .filter(|outlet| !outlet.is_empty())
                .collect(),
        )
    }

    pub fn allows(&self, outlet: &str) -> bool {
        match self {
            Grant::All => true,
            Grant::Outlets(outlets) => outlets.contains(outlet),
        }
    }

    pub fn allows_all(&self) -> bool {
        matches!(self, Grant::All)
    }

    /// Gate called before any load, search, or aggregation. `None` means the
    /// request spans every outlet.
    pub fn ensure(&self, outlet: Option<&str>) -> Result<()> {
        match outlet {
            Some(name) if !self.allows(name) => {
                bail!("not authorized for outlet '{name}' (set {GRANTS_ENV_VAR})")
            }
            None if !self.allows_all() => {
                bail!("not authorized for all outlets (set {GRANTS_ENV_VAR}=*)")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_grants_everything() {
        let grant = Grant::from_list("*");
        assert!(grant.allows_all());
        assert!(grant.allows("Main Street"));
    }

    #[test]
    fn allowlist_is_exact_per_outlet() {
        let grant = Grant::from_list("Main Street, Depot");
        assert!(grant.allows("Main Street"));
        assert!(grant.allows("Depot"));
        assert!(!grant.allows("Harbor"));
        assert!(!grant.allows_all());
    }

    #[test]
    fn empty_allowlist_denies_everything() {
        let grant = Grant::from_list("");
        assert!(!grant.allows("Main Street"));
        assert!(grant.ensure(Some("Main Street")).is_err());
        assert!(grant.ensure(None).is_err());
    }
}

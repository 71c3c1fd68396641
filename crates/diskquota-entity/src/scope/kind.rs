//! Scope kind enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use diskquota_core::error::AppError;

/// The kind of ownership boundary a quota applies to.
///
/// The declaration order is the check order: account scopes are always
/// evaluated before collection scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// An individual account (the asset owner).
    Account,
    /// A collection ("site") assets are published through.
    Collection,
}

impl ScopeKind {
    /// Lowercase name used in keys, routes and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "account" | "user" => Ok(Self::Account),
            "collection" | "site" => Ok(Self::Collection),
            other => Err(AppError::validation(format!(
                "Unknown scope kind '{other}' (expected 'account' or 'collection')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("account".parse::<ScopeKind>().unwrap(), ScopeKind::Account);
        assert_eq!("User".parse::<ScopeKind>().unwrap(), ScopeKind::Account);
        assert_eq!("site".parse::<ScopeKind>().unwrap(), ScopeKind::Collection);
        assert!("global".parse::<ScopeKind>().is_err());
    }

    #[test]
    fn test_check_order() {
        assert!(ScopeKind::Account < ScopeKind::Collection);
    }
}

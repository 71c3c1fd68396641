//! Scope value object.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use diskquota_core::keys;
use diskquota_core::result::AppResult;
use diskquota_core::types::id::{AccountId, CollectionId};

use super::kind::ScopeKind;

/// A quota boundary: a view over a host-owned account or collection.
///
/// `Ord` sorts accounts before collections, then by id. Admission uses
/// this order both for deterministic checks and for lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Scope {
    /// An account scope.
    Account(AccountId),
    /// A collection scope.
    Collection(CollectionId),
}

impl Scope {
    /// Build a scope from a kind and a raw host identifier.
    pub fn from_parts(kind: ScopeKind, id: Uuid) -> Self {
        match kind {
            ScopeKind::Account => Self::Account(AccountId::from_uuid(id)),
            ScopeKind::Collection => Self::Collection(CollectionId::from_uuid(id)),
        }
    }

    /// Parse `kind` and `id` path segments.
    pub fn parse(kind: &str, id: &str) -> AppResult<Self> {
        let kind: ScopeKind = kind.parse()?;
        let id = Uuid::parse_str(id).map_err(|e| {
            diskquota_core::AppError::validation(format!("Invalid {kind} id '{id}': {e}"))
        })?;
        Ok(Self::from_parts(kind, id))
    }

    /// The scope kind.
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Account(_) => ScopeKind::Account,
            Self::Collection(_) => ScopeKind::Collection,
        }
    }

    /// The raw host identifier.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Account(id) => id.into_uuid(),
            Self::Collection(id) => id.into_uuid(),
        }
    }

    /// Settings key holding this scope's override.
    pub fn override_key(&self) -> String {
        match self {
            Self::Account(id) => keys::account_limit(*id),
            Self::Collection(id) => keys::collection_limit(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

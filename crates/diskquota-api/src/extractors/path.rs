//! Typed path parameter helpers.

use serde::Deserialize;

use diskquota_core::error::AppError;
use diskquota_core::types::id::ReservationId;
use diskquota_entity::scope::Scope;

/// `{kind}/{id}` path segments naming a scope.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopePath {
    /// Scope kind (`account`, `collection`, or the `user`/`site` aliases).
    pub kind: String,
    /// Scope identifier.
    pub id: String,
}

impl ScopePath {
    /// Parse into a [`Scope`].
    pub fn scope(&self) -> Result<Scope, AppError> {
        Scope::parse(&self.kind, &self.id)
    }
}

/// Parses a reservation id from a path segment.
pub fn parse_reservation_id(s: &str) -> Result<ReservationId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid reservation id: {s}")))
}

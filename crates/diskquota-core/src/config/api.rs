//! HTTP API configuration.

use serde::{Deserialize, Serialize};

/// Settings for the HTTP adapter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Shared secret presented in `x-admin-token` by the host's admin UI.
    ///
    /// Empty disables every admin endpoint.
    #[serde(default)]
    pub admin_token: String,
}

impl ApiConfig {
    /// Whether the admin endpoints can ever be authorized.
    pub fn admin_enabled(&self) -> bool {
        !self.admin_token.is_empty()
    }
}

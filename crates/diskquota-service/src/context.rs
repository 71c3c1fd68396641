//! Admin capability handed in by the host.

use serde::{Deserialize, Serialize};

use diskquota_core::error::AppError;

/// Capability proving the caller may change quota settings.
///
/// The host decides whether the capability is granted; services only
/// check the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminContext {
    /// Who is acting, for audit logs.
    pub actor: String,
    /// Whether the host granted the admin capability.
    pub authorized: bool,
}

impl AdminContext {
    /// An authorized admin context.
    pub fn authorized(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            authorized: true,
        }
    }

    /// A context without the admin capability.
    pub fn unauthorized(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            authorized: false,
        }
    }

    /// Fail with an authorization error unless the capability is held.
    pub fn require_authorized(&self) -> Result<(), AppError> {
        if self.authorized {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "'{}' is not allowed to change quota settings",
                self.actor
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskquota_core::error::ErrorKind;

    #[test]
    fn test_require_authorized() {
        assert!(AdminContext::authorized("ops").require_authorized().is_ok());
        let err = AdminContext::unauthorized("guest")
            .require_authorized()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}

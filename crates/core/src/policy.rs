//! Authorization policy.
//!
//! Every service entry point calls [`authorize`] with the operation's
//! [`Capability`] before touching any provider.

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: DbId,
    /// Role name from the access token (e.g. `"admin"`, `"user"`).
    pub role: String,
    /// Whether the `creator` claim is set on the account.
    pub creator: bool,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    GenerateIdea,
    /// Read one's own quota and claims.
    ViewOwnAccount,
    StartCheckout,
    GrantCreatorRole,
    ManageSubscriptions,
}

impl Capability {
    fn requires_admin(self) -> bool {
        matches!(
            self,
            Capability::GrantCreatorRole | Capability::ManageSubscriptions
        )
    }
}

/// Check that `caller` may perform `capability`.
///
/// - No caller: [`CoreError::Unauthorized`].
/// - Admin-only capability and a non-admin caller: [`CoreError::Forbidden`].
pub fn authorize(caller: Option<&Caller>, capability: Capability) -> Result<&Caller, CoreError> {
    let caller = caller.ok_or_else(|| {
        CoreError::Unauthorized("The function must be called while authenticated.".into())
    })?;

    if capability.requires_admin() && !caller.is_admin() {
        return Err(CoreError::Forbidden("Admin role required".into()));
    }

    Ok(caller)
}

//! Granting the `creator` capability to an account.

use std::sync::Arc;

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::policy::{authorize, Caller, Capability};
use crate::providers::IdentityProvider;
use crate::roles::CLAIM_CREATOR;

/// Message returned to callers when identity lookup or claim writes fail.
const GRANT_FAILED: &str = "An error occurred while setting the user role.";

pub struct RoleAuthority {
    identity: Arc<dyn IdentityProvider>,
}

impl RoleAuthority {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Set the `creator` claim on the account registered under `target_email`.
    ///
    /// Only admins may call this. Granting twice has no further effect.
    pub async fn grant_creator_role(
        &self,
        caller: Option<&Caller>,
        target_email: Option<&str>,
    ) -> Result<String, CoreError> {
        let caller = authorize(caller, Capability::GrantCreatorRole)?;

        let email = target_email.map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err(CoreError::Validation(
                "The function must be called with an 'email' argument.".into(),
            ));
        }
        if !email.validate_email() {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        let user_id = match self.identity.resolve_by_email(email).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::error!(admin_id = caller.user_id, email, "Creator grant: no such user");
                return Err(CoreError::Internal(GRANT_FAILED.into()));
            }
            Err(e) => {
                tracing::error!(admin_id = caller.user_id, email, error = %e, "Creator grant: lookup failed");
                return Err(CoreError::Internal(GRANT_FAILED.into()));
            }
        };

        self.identity
            .set_claim(user_id, CLAIM_CREATOR, true)
            .await
            .map_err(|e| {
                tracing::error!(admin_id = caller.user_id, user_id, error = %e, "Creator grant: claim write failed");
                CoreError::Internal(GRANT_FAILED.into())
            })?;

        tracing::info!(admin_id = caller.user_id, user_id, "Creator role granted");
        Ok(format!("Success! {email} has been made a creator."))
    }
}

use std::sync::Arc;

use crate::errors::internal::RegistrationError;
use crate::providers::IdentityProvider;
use crate::stores::{InviteLedger, ProfileRepository};
use crate::types::db::profile;

/// Undo action for one completed saga step. Recorded as steps succeed and
/// executed in reverse order when a later step fails.
enum Compensation {
    UnburnInvite { code: String },
    DeleteAccount { subject_id: String },
}

/// Orchestrates account provisioning across the invite ledger, the
/// identity provider, and the profile store.
///
/// Steps run strictly in sequence; each step's success is a precondition
/// for the next. On failure every prior step is compensated, newest first,
/// and the primary error is returned untouched regardless of how the
/// compensations fare.
pub struct RegistrationService {
    invites: Arc<dyn InviteLedger>,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl RegistrationService {
    pub fn new(
        invites: Arc<dyn InviteLedger>,
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            invites,
            identity,
            profiles,
        }
    }

    /// Provision a new account or fail with no orphaned side effects.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        invite_code: &str,
    ) -> Result<profile::Model, RegistrationError> {
        // Step 1: consume the invite. The conditional burn is the mutual
        // exclusion point for concurrent registrations on the same code;
        // rejecting here must never touch the identity provider.
        self.invites.burn_if_unburned(invite_code).await?;

        let mut undo = vec![Compensation::UnburnInvite {
            code: invite_code.to_string(),
        }];

        // Step 2: create the external account, then set its password.
        let subject_id = match self.identity.create_account(username, email, true).await {
            Ok(subject_id) => subject_id,
            Err(err) => {
                tracing::error!(error = %err, "identity provider refused to create the account");
                self.unwind(undo).await;
                return Err(err.into());
            }
        };
        undo.push(Compensation::DeleteAccount {
            subject_id: subject_id.clone(),
        });

        if let Err(err) = self.identity.set_password(&subject_id, password).await {
            tracing::error!(error = %err, subject_id, "password could not be set on the new account");
            self.unwind(undo).await;
            return Err(err.into());
        }

        // Step 3: create the local profile keyed by the subject id.
        match self.profiles.insert(&subject_id).await {
            Ok(created) => Ok(created),
            Err(err) => {
                tracing::error!(error = %err, subject_id, "profile was not inserted");
                self.unwind(undo).await;
                Err(err.into())
            }
        }
    }

    /// Run recorded compensations newest-first. Failures are logged and
    /// swallowed: they must never mask the primary error the caller is
    /// about to receive.
    async fn unwind(&self, mut undo: Vec<Compensation>) {
        while let Some(step) = undo.pop() {
            match step {
                Compensation::UnburnInvite { code } => {
                    if let Err(err) = self.invites.unburn(&code).await {
                        tracing::error!(error = %err, code, "compensation failed: invite was not unburned");
                    }
                }
                Compensation::DeleteAccount { subject_id } => {
                    if let Err(err) = self.identity.delete_account(&subject_id).await {
                        tracing::error!(error = %err, subject_id, "compensation failed: account was not removed from the identity provider");
                    }
                }
            }
        }
    }
}

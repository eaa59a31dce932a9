use std::sync::Arc;

use url::Url;

use crate::errors::internal::LoginFlowError;
use crate::providers::IdentityProvider;
use crate::services::auth_state::AuthStateTracker;
use crate::types::internal::auth::{IdTokenClaims, TokenPair};

/// Result of a fully verified authorization-code callback
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    pub claims: IdTokenClaims,
    pub tokens: TokenPair,
}

/// Drives the redirect-based login flow: issues state+nonce into the
/// outbound authorize URL, then redeems, exchanges and verifies on
/// callback.
pub struct LoginFlowService {
    tracker: AuthStateTracker,
    identity: Arc<dyn IdentityProvider>,
    authorize_url: Url,
    client_id: String,
    redirect_url: String,
}

impl LoginFlowService {
    pub fn new(
        tracker: AuthStateTracker,
        identity: Arc<dyn IdentityProvider>,
        authorize_url: Url,
        client_id: String,
        redirect_url: String,
    ) -> Self {
        Self {
            tracker,
            identity,
            authorize_url,
            client_id,
            redirect_url,
        }
    }

    /// Mint a state token and nonce for a fresh attempt and build the
    /// authorize redirect target carrying both.
    pub fn begin_login(&self) -> String {
        let issued = self.tracker.issue();

        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("scope", "openid")
            .append_pair("state", &issued.state)
            .append_pair("nonce", &issued.nonce);

        url.to_string()
    }

    /// Redeem the callback's state token (exactly once), exchange the
    /// authorization code, and verify the identity token's nonce against
    /// the one minted for this attempt.
    ///
    /// Every failure is terminal for the presented state token; the client
    /// must restart from `begin_login`.
    pub async fn complete_login(
        &self,
        state: &str,
        code: &str,
    ) -> Result<CallbackOutcome, LoginFlowError> {
        let pending = self
            .tracker
            .redeem(state)
            .ok_or(LoginFlowError::InvalidState)?;

        let tokens = self.identity.exchange_code(code).await?;

        let raw_id_token = tokens
            .id_token
            .as_deref()
            .ok_or(LoginFlowError::MissingIdToken)?;

        let claims = self.identity.verify_identity_token(raw_id_token).await?;

        if claims.nonce.as_deref() != Some(pending.nonce.as_str()) {
            return Err(LoginFlowError::NonceMismatch);
        }

        Ok(CallbackOutcome { claims, tokens })
    }
}

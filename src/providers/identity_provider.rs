use async_trait::async_trait;

use crate::errors::internal::IdentityProviderError;
use crate::types::internal::auth::{Account, IdTokenClaims, TokenPair};

/// Capability interface over the external identity provider.
///
/// The registration saga and login flow depend only on this trait; the
/// HTTP client behind it ([`KeycloakProvider`](super::KeycloakProvider))
/// owns per-call timeouts and surfaces them as
/// `IdentityProviderError::Unreachable` so compensation logic still runs.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an external account and return its subject id. The password
    /// is set in a separate call; see `set_password`.
    async fn create_account(
        &self,
        username: &str,
        email: &str,
        enabled: bool,
    ) -> Result<String, IdentityProviderError>;

    async fn set_password(
        &self,
        subject_id: &str,
        password: &str,
    ) -> Result<(), IdentityProviderError>;

    /// Compensating action for `create_account`.
    async fn delete_account(&self, subject_id: &str) -> Result<(), IdentityProviderError>;

    async fn get_account(&self, subject_id: &str) -> Result<Account, IdentityProviderError>;

    async fn password_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, IdentityProviderError>;

    /// Exchange an authorization code for a token pair.
    async fn exchange_code(&self, code: &str) -> Result<TokenPair, IdentityProviderError>;

    /// Verify an identity token's signature and standard claims and return
    /// the decoded claims. Nonce comparison is the caller's job; the
    /// provider does not know which login attempt the token belongs to.
    async fn verify_identity_token(
        &self,
        raw: &str,
    ) -> Result<IdTokenClaims, IdentityProviderError>;

    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<TokenPair, IdentityProviderError>;
}

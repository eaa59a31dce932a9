use thiserror::Error;

use super::IdentityProviderError;

/// Failure classification for the redirect-based login flow.
///
/// Externally these all collapse into one generic rejection so callers
/// cannot probe which check failed; internally they stay distinct for
/// diagnostics.
#[derive(Error, Debug)]
pub enum LoginFlowError {
    /// Callback state token unknown, expired, or already redeemed.
    #[error("state token not found or already redeemed")]
    InvalidState,

    /// Identity token carried a nonce that does not match the one minted
    /// for this login attempt.
    #[error("identity token nonce does not match the login attempt")]
    NonceMismatch,

    /// The exchanged token response carried no identity token.
    #[error("token response did not include an identity token")]
    MissingIdToken,

    #[error("identity provider failure during login flow")]
    IdentityProvider(#[from] IdentityProviderError),
}

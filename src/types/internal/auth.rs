use serde::{Deserialize, Serialize};

/// Access/refresh token pair as returned by the identity provider's
/// token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Raw identity token, present on authorization-code exchanges.
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Claims decoded from a verified identity token.
///
/// `nonce` must match the value minted alongside the state token for the
/// same login attempt; the callback handler rejects the token otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
}

/// External account record as the identity provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

use poem_openapi::Object;

/// Password login form
#[derive(Object, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token pair returned after a successful login or refresh
#[derive(Object, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Refresh request carrying the refresh token to trade in
#[derive(Object, Debug, Clone)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Outcome of a completed authorization-code callback: the verified
/// identity claims plus the raw token pair for the session layer.
#[derive(Object, Debug, Clone)]
pub struct CallbackResponse {
    pub subject: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

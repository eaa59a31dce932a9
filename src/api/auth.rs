use std::sync::Arc;

use poem_openapi::{param::Query, payload::Json, ApiResponse, OpenApi, Tags};

use crate::errors::api::AuthApiError;
use crate::errors::internal::IdentityProviderError;
use crate::providers::IdentityProvider;
use crate::services::LoginFlowService;
use crate::types::dto::auth::{CallbackResponse, LoginRequest, RefreshRequest, TokenResponse};
use crate::types::internal::auth::TokenPair;

/// Authentication API endpoints
pub struct AuthApi {
    identity: Arc<dyn IdentityProvider>,
    login_flow: Arc<LoginFlowService>,
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Redirect into the identity provider's authorize endpoint
#[derive(ApiResponse)]
pub enum OidcLoginResponse {
    #[oai(status = 302)]
    Redirect(#[oai(header = "Location")] String),
}

impl AuthApi {
    pub fn new(identity: Arc<dyn IdentityProvider>, login_flow: Arc<LoginFlowService>) -> Self {
        Self {
            identity,
            login_flow,
        }
    }
}

fn token_response(pair: TokenPair) -> TokenResponse {
    TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: pair.expires_in,
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password against the identity provider
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthApiError> {
        let pair = self
            .identity
            .password_login(&body.username, &body.password)
            .await
            .map_err(|err| match err {
                IdentityProviderError::Rejected { .. } => {
                    tracing::warn!(username = %body.username, "password login rejected");
                    AuthApiError::invalid_credentials()
                }
                other => {
                    tracing::error!(error = %other, "identity provider failure during login");
                    AuthApiError::internal_error("Identity server could not be reached")
                }
            })?;

        Ok(Json(token_response(pair)))
    }

    /// Trade a refresh token for a fresh token pair
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(
        &self,
        body: Json<RefreshRequest>,
    ) -> Result<Json<TokenResponse>, AuthApiError> {
        let pair = self
            .identity
            .refresh_tokens(&body.refresh_token)
            .await
            .map_err(|err| match err {
                IdentityProviderError::Rejected { .. } => AuthApiError::refresh_rejected(),
                other => {
                    tracing::error!(error = %other, "identity provider failure during refresh");
                    AuthApiError::internal_error("Identity server could not be reached")
                }
            })?;

        Ok(Json(token_response(pair)))
    }

    /// Initiate the redirect-based login flow
    #[oai(path = "/oidc/login", method = "get", tag = "AuthTags::Authentication")]
    async fn oidc_login(&self) -> OidcLoginResponse {
        OidcLoginResponse::Redirect(self.login_flow.begin_login())
    }

    /// Authorization-code callback: redeem state, exchange the code, and
    /// verify the identity token's nonce
    #[oai(path = "/oidc/callback", method = "get", tag = "AuthTags::Authentication")]
    async fn oidc_callback(
        &self,
        state: Query<String>,
        code: Query<String>,
    ) -> Result<Json<CallbackResponse>, AuthApiError> {
        let outcome = self
            .login_flow
            .complete_login(&state.0, &code.0)
            .await
            .map_err(|err| {
                // Classified internally, generic externally
                tracing::warn!(error = %err, "oidc callback rejected");
                AuthApiError::from(err)
            })?;

        Ok(Json(CallbackResponse {
            subject: outcome.claims.sub,
            username: outcome.claims.preferred_username,
            email: outcome.claims.email,
            access_token: outcome.tokens.access_token,
            refresh_token: outcome.tokens.refresh_token,
            expires_in: outcome.tokens.expires_in,
        }))
    }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::IdpSettings;
use crate::errors::internal::IdentityProviderError;
use crate::providers::IdentityProvider;
use crate::types::internal::auth::{Account, IdTokenClaims, TokenPair};

/// Admin tokens are refreshed this many seconds before their stated expiry
const ADMIN_TOKEN_SLACK_SECS: u64 = 30;

const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Keycloak-style identity provider client.
///
/// Account lifecycle goes through the admin REST API with a cached admin
/// token; user-facing grants go through the realm's openid-connect token
/// endpoint. Identity tokens are verified against the realm's JWKS.
pub struct KeycloakProvider {
    http: reqwest::Client,
    settings: IdpSettings,
    admin_token: RwLock<Option<AdminToken>>,
    jwks: RwLock<Option<JwkSet>>,
}

struct AdminToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct GrantResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    id_token: Option<String>,
}

impl From<GrantResponse> for TokenPair {
    fn from(g: GrantResponse) -> Self {
        TokenPair {
            access_token: g.access_token,
            refresh_token: g.refresh_token,
            expires_in: g.expires_in,
            id_token: g.id_token,
        }
    }
}

impl KeycloakProvider {
    pub fn new(settings: IdpSettings) -> Result<Self, IdentityProviderError> {
        let http = reqwest::Client::builder()
            .timeout(CALL_TIMEOUT)
            .build()
            .map_err(|e| IdentityProviderError::protocol("client_init", e.to_string()))?;

        Ok(Self {
            http,
            settings,
            admin_token: RwLock::new(None),
            jwks: RwLock::new(None),
        })
    }

    fn realm_url(&self, suffix: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/{}",
            self.settings.address, self.settings.realm, suffix
        )
    }

    fn admin_url(&self, suffix: &str) -> String {
        format!(
            "{}/admin/realms/{}/{}",
            self.settings.address, self.settings.realm, suffix
        )
    }

    /// Issuer string as it appears in identity tokens minted by the realm
    pub fn issuer(&self) -> String {
        format!("{}/realms/{}", self.settings.address, self.settings.realm)
    }

    async fn admin_access_token(&self) -> Result<String, IdentityProviderError> {
        {
            let cached = self.admin_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let url = format!(
            "{}/realms/master/protocol/openid-connect/token",
            self.settings.address
        );
        let form = [
            ("grant_type", "password"),
            ("client_id", "admin-cli"),
            ("username", self.settings.admin_user.as_str()),
            ("password", self.settings.admin_pass.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable("admin_login", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::rejected(
                "admin_login",
                status.as_u16(),
                body,
            ));
        }

        let grant: GrantResponse = response
            .json()
            .await
            .map_err(|e| IdentityProviderError::protocol("admin_login", e.to_string()))?;

        let ttl = grant.expires_in.max(0) as u64;
        let expires_at =
            Instant::now() + Duration::from_secs(ttl.saturating_sub(ADMIN_TOKEN_SLACK_SECS));
        let access_token = grant.access_token.clone();

        let mut cached = self.admin_token.write().await;
        *cached = Some(AdminToken {
            access_token: grant.access_token,
            expires_at,
        });

        Ok(access_token)
    }

    /// Run a grant against the realm token endpoint and parse the pair
    async fn token_grant(
        &self,
        operation: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenPair, IdentityProviderError> {
        let response = self
            .http
            .post(self.realm_url("token"))
            .form(form)
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::rejected(
                operation,
                status.as_u16(),
                body,
            ));
        }

        let grant: GrantResponse = response
            .json()
            .await
            .map_err(|e| IdentityProviderError::protocol(operation, e.to_string()))?;

        Ok(grant.into())
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, IdentityProviderError> {
        let response = self
            .http
            .get(self.realm_url("certs"))
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable("fetch_jwks", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityProviderError::rejected(
                "fetch_jwks",
                status.as_u16(),
                "JWKS endpoint refused the request",
            ));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityProviderError::protocol("fetch_jwks", e.to_string()))
    }

    async fn signing_key(&self, kid: &str) -> Result<DecodingKey, IdentityProviderError> {
        {
            let cached = self.jwks.read().await;
            if let Some(set) = cached.as_ref() {
                if let Some(jwk) = set.find(kid) {
                    return DecodingKey::from_jwk(jwk).map_err(|e| {
                        IdentityProviderError::protocol("signing_key", e.to_string())
                    });
                }
            }
        }

        // Unknown kid: the realm may have rotated its keys, refetch once
        let fresh = self.fetch_jwks().await?;
        let key = match fresh.find(kid) {
            Some(jwk) => DecodingKey::from_jwk(jwk)
                .map_err(|e| IdentityProviderError::protocol("signing_key", e.to_string()))?,
            None => {
                return Err(IdentityProviderError::protocol(
                    "signing_key",
                    format!("no JWKS entry for kid {kid}"),
                ))
            }
        };

        let mut cached = self.jwks.write().await;
        *cached = Some(fresh);
        Ok(key)
    }
}

/// Extract the created user's id from a Keycloak 201 Location header
fn subject_id_from_location(location: &str) -> Option<String> {
    location
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
}

#[async_trait]
impl IdentityProvider for KeycloakProvider {
    async fn create_account(
        &self,
        username: &str,
        email: &str,
        enabled: bool,
    ) -> Result<String, IdentityProviderError> {
        let admin_token = self.admin_access_token().await?;

        let body = serde_json::json!({
            "username": username,
            "email": email,
            "enabled": enabled,
            "firstName": username,
        });

        let response = self
            .http
            .post(self.admin_url("users"))
            .bearer_auth(&admin_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable("create_account", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::rejected(
                "create_account",
                status.as_u16(),
                body,
            ));
        }

        // The subject id only appears in the Location header
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(subject_id_from_location)
            .ok_or_else(|| {
                IdentityProviderError::protocol(
                    "create_account",
                    "created-user response carried no usable Location header",
                )
            })
    }

    async fn set_password(
        &self,
        subject_id: &str,
        password: &str,
    ) -> Result<(), IdentityProviderError> {
        let admin_token = self.admin_access_token().await?;

        let body = serde_json::json!({
            "type": "password",
            "value": password,
            "temporary": false,
        });

        let response = self
            .http
            .put(self.admin_url(&format!("users/{subject_id}/reset-password")))
            .bearer_auth(&admin_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable("set_password", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::rejected(
                "set_password",
                status.as_u16(),
                body,
            ));
        }

        Ok(())
    }

    async fn delete_account(&self, subject_id: &str) -> Result<(), IdentityProviderError> {
        let admin_token = self.admin_access_token().await?;

        let response = self
            .http
            .delete(self.admin_url(&format!("users/{subject_id}")))
            .bearer_auth(&admin_token)
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable("delete_account", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::rejected(
                "delete_account",
                status.as_u16(),
                body,
            ));
        }

        Ok(())
    }

    async fn get_account(&self, subject_id: &str) -> Result<Account, IdentityProviderError> {
        let admin_token = self.admin_access_token().await?;

        let response = self
            .http
            .get(self.admin_url(&format!("users/{subject_id}")))
            .bearer_auth(&admin_token)
            .send()
            .await
            .map_err(|e| IdentityProviderError::unreachable("get_account", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityProviderError::rejected(
                "get_account",
                status.as_u16(),
                body,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityProviderError::protocol("get_account", e.to_string()))
    }

    async fn password_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, IdentityProviderError> {
        self.token_grant(
            "password_login",
            &[
                ("grant_type", "password"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("username", username),
                ("password", password),
                ("scope", "openid"),
            ],
        )
        .await
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenPair, IdentityProviderError> {
        self.token_grant(
            "exchange_code",
            &[
                ("grant_type", "authorization_code"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.settings.redirect_url.as_str()),
            ],
        )
        .await
    }

    async fn verify_identity_token(
        &self,
        raw: &str,
    ) -> Result<IdTokenClaims, IdentityProviderError> {
        let header = decode_header(raw)
            .map_err(|e| IdentityProviderError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| IdentityProviderError::InvalidToken("token has no kid".to_string()))?;

        let key = self.signing_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.settings.client_id.as_str()]);
        validation.set_issuer(&[self.issuer()]);

        let data = decode::<IdTokenClaims>(raw, &key, &validation)
            .map_err(|e| IdentityProviderError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }

    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<TokenPair, IdentityProviderError> {
        self.token_grant(
            "refresh_tokens",
            &[
                ("grant_type", "refresh_token"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }
}

use std::env;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(String),
}

/// Identity-provider and OAuth client configuration
#[derive(Debug, Clone)]
pub struct IdpSettings {
    /// Base URL of the identity provider, no trailing slash
    pub address: String,
    pub realm: String,
    pub admin_user: String,
    pub admin_pass: String,
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URL registered for the authorization-code flow
    pub redirect_url: String,
}

/// Top-level application settings loaded from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub idp: IdpSettings,
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://profiles.db?mode=rwc".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let idp = IdpSettings {
            address: required("IDP_ADDR")?.trim_end_matches('/').to_string(),
            realm: required("IDP_REALM")?,
            admin_user: required("IDP_USER")?,
            admin_pass: required("IDP_PASS")?,
            client_id: required("OIDC_CLIENT_ID")?,
            client_secret: required("OIDC_CLIENT_SECRET")?,
            redirect_url: required("OIDC_REDIRECT_URL")?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            idp,
        })
    }
}
